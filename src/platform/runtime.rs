use std::future::Future;
use std::time::Duration;

/// Spawns an async task that runs in the background, reusing the ambient
/// tokio runtime when one is available.
///
/// Outside any tokio context the task lands on a shared fallback runtime
/// driven by a dedicated thread, so timers and spawned futures still make
/// progress.
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    use std::sync::OnceLock;
    use tokio::runtime::{Builder, Handle};

    static BACKGROUND_RUNTIME: OnceLock<Handle> = OnceLock::new();

    if let Ok(handle) = Handle::try_current() {
        handle.spawn(future);
    } else {
        let handle = BACKGROUND_RUNTIME.get_or_init(|| {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build background tokio runtime");
            let handle = runtime.handle().clone();
            std::thread::spawn(move || {
                runtime.block_on(std::future::pending::<()>());
            });
            handle
        });
        let _ = handle.spawn(future);
    }
}

/// Asynchronously waits for the provided duration.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }

    tokio::time::sleep(duration).await;
}
