use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::platform::runtime;

/// One-shot deferred execution facility.
///
/// The force-fetch policy flip is the only consumer; the trait exists so the
/// policy transition can be driven manually in tests instead of waiting on
/// real time.
pub trait Scheduler: Send + Sync {
    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>);
}

/// Default scheduler backed by the async runtime. Works from synchronous
/// contexts too; without an ambient runtime the task runs on the shared
/// background runtime thread.
pub struct RuntimeScheduler;

impl Scheduler for RuntimeScheduler {
    fn schedule_once(&self, delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) {
        runtime::spawn_detached(async move {
            runtime::sleep(delay).await;
            task();
        });
    }
}

/// Process-wide force-fetch suppression flag.
///
/// Starts suppressed (`should_force_fetch == false`) when SSR mode is on or a
/// positive delay is configured; flips to permissive exactly once when the
/// scheduled delay elapses, and never reverts. Dispatch methods only read the
/// flag; nothing mutates it after the scheduled flip.
pub struct ForceFetchPolicy {
    should_force_fetch: Arc<AtomicBool>,
}

impl ForceFetchPolicy {
    pub(crate) fn from_config(
        ssr_mode: bool,
        ssr_force_fetch_delay: Duration,
        scheduler: &Arc<dyn Scheduler>,
    ) -> Self {
        let suppressed = ssr_mode || !ssr_force_fetch_delay.is_zero();
        let should_force_fetch = Arc::new(AtomicBool::new(!suppressed));

        if !ssr_force_fetch_delay.is_zero() {
            let flag = should_force_fetch.clone();
            scheduler.schedule_once(
                ssr_force_fetch_delay,
                Box::new(move || {
                    flag.store(true, Ordering::SeqCst);
                }),
            );
        }

        Self { should_force_fetch }
    }

    pub fn should_force_fetch(&self) -> bool {
        self.should_force_fetch.load(Ordering::SeqCst)
    }
}

/// Scheduler whose tasks fire only when the test says so.
#[cfg(test)]
pub(crate) struct ManualScheduler {
    tasks: std::sync::Mutex<Vec<Box<dyn FnOnce() + Send + 'static>>>,
}

#[cfg(test)]
impl ManualScheduler {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            tasks: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn fire_all(&self) {
        let tasks: Vec<_> = self.tasks.lock().unwrap().drain(..).collect();
        for task in tasks {
            task();
        }
    }

    pub(crate) fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }
}

#[cfg(test)]
impl Scheduler for ManualScheduler {
    fn schedule_once(&self, _delay: Duration, task: Box<dyn FnOnce() + Send + 'static>) {
        self.tasks.lock().unwrap().push(task);
    }
}
