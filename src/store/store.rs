use std::sync::{Arc, Mutex, RwLock};

use serde_json::Value;

use crate::store::actions::Action;
use crate::store::reducer::Reducer;

/// Unidirectional state container the client installs itself into.
///
/// State lives behind a mutex and only changes through [`HostStore::dispatch`]:
/// the action runs through the middleware chain, the innermost step reduces
/// and commits, and the action flows back out unchanged.
#[derive(Clone)]
pub struct HostStore {
    inner: Arc<HostStoreInner>,
}

struct HostStoreInner {
    state: Mutex<Value>,
    reducer: Reducer,
    layers: RwLock<Vec<Arc<dyn DispatchLayer>>>,
}

/// Per-action middleware hook: call `next` to continue the chain, then do any
/// post-commit work before returning.
pub trait DispatchLayer: Send + Sync {
    fn dispatch(&self, store: &HostStore, next: &dyn Fn(Action) -> Action, action: Action)
        -> Action;
}

/// A dispatch layer with an installation step that may reject the store.
pub trait Middleware: DispatchLayer + Sized + Send + Sync + 'static {
    type InstallError: std::error::Error;

    fn install(&self, store: &HostStore) -> Result<(), Self::InstallError>;
}

pub fn create_store(reducer: Reducer, initial_state: Value) -> HostStore {
    HostStore {
        inner: Arc::new(HostStoreInner {
            state: Mutex::new(initial_state),
            reducer,
            layers: RwLock::new(Vec::new()),
        }),
    }
}

impl HostStore {
    /// Snapshot of the current state tree.
    pub fn state(&self) -> Value {
        self.inner.state.lock().unwrap().clone()
    }

    pub fn dispatch(&self, action: Action) -> Action {
        let layers = self.inner.layers.read().unwrap().clone();
        self.dispatch_through(&layers, action)
    }

    /// Runs the middleware's install step, then adds it to the chain.
    /// Installation failure leaves the chain untouched.
    pub fn apply_middleware<M: Middleware>(&self, middleware: M) -> Result<(), M::InstallError> {
        middleware.install(self)?;
        self.inner
            .layers
            .write()
            .unwrap()
            .push(Arc::new(middleware));
        Ok(())
    }

    /// True when both handles refer to the same underlying store.
    pub fn same_store(&self, other: &HostStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn dispatch_through(&self, layers: &[Arc<dyn DispatchLayer>], action: Action) -> Action {
        match layers.split_first() {
            Some((layer, rest)) => {
                let next = |action: Action| self.dispatch_through(rest, action);
                layer.dispatch(self, &next, action)
            }
            None => self.commit(action),
        }
    }

    fn commit(&self, action: Action) -> Action {
        let mut state = self.inner.state.lock().unwrap();
        *state = (self.inner.reducer)(&state, &action);
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fmt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn appending_reducer() -> Reducer {
        Arc::new(|state: &Value, action: &Action| {
            let mut log = state.as_array().cloned().unwrap_or_default();
            log.push(json!(action.kind()));
            Value::Array(log)
        })
    }

    #[derive(Debug)]
    struct NeverError;

    impl fmt::Display for NeverError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "never")
        }
    }

    impl std::error::Error for NeverError {}

    struct TaggingLayer {
        seen: Arc<AtomicUsize>,
        fail_install: bool,
    }

    impl DispatchLayer for TaggingLayer {
        fn dispatch(
            &self,
            store: &HostStore,
            next: &dyn Fn(Action) -> Action,
            action: Action,
        ) -> Action {
            let action = next(action);
            // Post-commit: the state already reflects this action.
            let committed = store.state();
            assert_eq!(
                committed.as_array().map(|log| log.len()),
                Some(self.seen.load(Ordering::SeqCst) + 1)
            );
            self.seen.fetch_add(1, Ordering::SeqCst);
            action
        }
    }

    impl Middleware for TaggingLayer {
        type InstallError = NeverError;

        fn install(&self, _store: &HostStore) -> Result<(), NeverError> {
            if self.fail_install {
                return Err(NeverError);
            }
            Ok(())
        }
    }

    #[test]
    fn dispatch_reduces_and_returns_action() {
        let store = create_store(appending_reducer(), json!([]));
        let action = store.dispatch(Action::new("first", Value::Null));
        assert_eq!(action.kind(), "first");
        assert_eq!(store.state(), json!(["first"]));
    }

    #[test]
    fn middleware_observes_committed_state() {
        let store = create_store(appending_reducer(), json!([]));
        let seen = Arc::new(AtomicUsize::new(0));
        store
            .apply_middleware(TaggingLayer {
                seen: seen.clone(),
                fail_install: false,
            })
            .unwrap();
        store.dispatch(Action::new("a", Value::Null));
        store.dispatch(Action::new("b", Value::Null));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_install_leaves_chain_untouched() {
        let store = create_store(appending_reducer(), json!([]));
        let seen = Arc::new(AtomicUsize::new(0));
        assert!(store
            .apply_middleware(TaggingLayer {
                seen: seen.clone(),
                fail_install: true,
            })
            .is_err());
        store.dispatch(Action::new("a", Value::Null));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn same_store_compares_identity_not_contents() {
        let store = create_store(appending_reducer(), json!([]));
        let clone = store.clone();
        let other = create_store(appending_reducer(), json!([]));
        assert!(store.same_store(&clone));
        assert!(!store.same_store(&other));
    }
}
