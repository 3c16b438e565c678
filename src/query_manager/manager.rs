use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use serde_json::Value;

use crate::cache::{encode_query_key, read_query_from_cache, QUERIES_STATE_KEY};
use crate::document::{apply_query_transform, print_document, QueryTransform};
use crate::platform::runtime;
use crate::query_manager::{
    MutationOptions, MutationResult, QueryOptions, QueryResult, ResultSource,
};
use crate::store::{Action, HostStore};
use crate::transport::{GraphQlRequest, NetworkTransport, TransportError, TransportResult};

pub type QueryResultCallback = Arc<dyn Fn(&QueryResult) + Send + Sync + 'static>;
pub type QueryErrorCallback = Arc<dyn Fn(&TransportError) + Send + Sync + 'static>;

/// Observer-style callbacks for a watched query.
#[derive(Clone)]
pub struct QueryHandlers {
    pub on_next: QueryResultCallback,
    pub on_error: Option<QueryErrorCallback>,
}

impl QueryHandlers {
    pub fn new<F>(on_next: F) -> Self
    where
        F: Fn(&QueryResult) + Send + Sync + 'static,
    {
        Self {
            on_next: Arc::new(on_next),
            on_error: None,
        }
    }

    pub fn with_error<F>(mut self, on_error: F) -> Self
    where
        F: Fn(&TransportError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(on_error));
        self
    }
}

/// Guard returned when watching a query; dropping it unsubscribes.
pub struct WatchedQuery {
    manager: Arc<QueryManagerInner>,
    watcher_id: u64,
    closed: AtomicBool,
}

impl WatchedQuery {
    fn new(manager: Arc<QueryManagerInner>, watcher_id: u64) -> Self {
        Self {
            manager,
            watcher_id,
            closed: AtomicBool::new(false),
        }
    }

    pub fn unsubscribe(mut self) {
        self.close();
    }

    fn close(&mut self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.manager.remove_watcher(self.watcher_id);
        }
    }
}

impl Drop for WatchedQuery {
    fn drop(&mut self) {
        self.close();
    }
}

/// Dispatches operations against the transport and keeps watchers in sync
/// with the adopted store.
#[derive(Clone)]
pub struct QueryManager {
    inner: Arc<QueryManagerInner>,
}

impl QueryManager {
    pub fn new(
        transport: Arc<dyn NetworkTransport>,
        store: HostStore,
        root_key: impl Into<String>,
        query_transform: Option<QueryTransform>,
        should_batch: bool,
    ) -> Self {
        Self {
            inner: Arc::new(QueryManagerInner {
                transport,
                store,
                root_key: root_key.into(),
                query_transform,
                should_batch,
                watchers: Mutex::new(HashMap::new()),
                next_watcher_id: AtomicU64::new(1),
            }),
        }
    }

    /// One-shot query. Reads the cache first unless `force_fetch` is set;
    /// server results are dispatched into the store before returning.
    pub async fn query(&self, options: QueryOptions) -> TransportResult<QueryResult> {
        let document = apply_query_transform(&options.query, self.inner.query_transform.as_ref());

        if !options.force_fetch {
            let state = self.inner.client_state();
            if let Some(data) = read_query_from_cache(&state, &document, &options.variables) {
                return Ok(QueryResult {
                    data,
                    source: ResultSource::Cache,
                    fetch_time: SystemTime::now(),
                });
            }
        }

        let key = encode_query_key(&document, &options.variables);
        let data = self
            .inner
            .transport
            .execute(GraphQlRequest {
                query: print_document(&document),
                operation_name: document.operation_name().map(str::to_string),
                variables: options.variables.clone(),
            })
            .await?;

        self.inner
            .store
            .dispatch(Action::query_result(&key, data.clone()));

        Ok(QueryResult {
            data,
            source: ResultSource::Server,
            fetch_time: SystemTime::now(),
        })
    }

    /// Registers a watcher for the query. A cached result is delivered
    /// immediately; otherwise (or when `force_fetch` is set) an initial fetch
    /// runs detached and reaches the watcher through the broadcast path.
    pub fn watch_query(&self, options: QueryOptions, handlers: QueryHandlers) -> WatchedQuery {
        let document = apply_query_transform(&options.query, self.inner.query_transform.as_ref());
        let key = encode_query_key(&document, &options.variables);
        let watcher_id = self.inner.next_watcher_id.fetch_add(1, Ordering::SeqCst);

        let cached = read_query_from_cache(&self.inner.client_state(), &document, &options.variables);

        {
            let mut watchers = self.inner.watchers.lock().unwrap();
            watchers.insert(
                watcher_id,
                Watcher {
                    key,
                    handlers: handlers.clone(),
                    last_delivered: cached.clone(),
                },
            );
        }

        if let Some(data) = cached.clone() {
            (handlers.on_next)(&QueryResult {
                data,
                source: ResultSource::Cache,
                fetch_time: SystemTime::now(),
            });
        }

        if cached.is_none() || options.force_fetch {
            let manager = self.clone();
            runtime::spawn_detached(async move {
                if let Err(err) = manager.query(options.with_force_fetch(true)).await {
                    log::debug!("initial fetch for watched query failed: {err}");
                    if let Some(on_error) = &handlers.on_error {
                        on_error(&err);
                    }
                }
            });
        }

        WatchedQuery::new(self.inner.clone(), watcher_id)
    }

    /// Executes a mutation and folds its result behaviors into the store.
    pub async fn mutate(&self, options: MutationOptions) -> TransportResult<MutationResult> {
        let document = options.mutation;
        let data = self
            .inner
            .transport
            .execute(GraphQlRequest {
                query: print_document(&document),
                operation_name: document.operation_name().map(str::to_string),
                variables: options.variables.clone(),
            })
            .await?;

        self.inner
            .store
            .dispatch(Action::mutation_result(data.clone(), &options.result_behaviors));

        Ok(MutationResult {
            data,
            fetch_time: SystemTime::now(),
        })
    }

    /// Pushes the store's current query results to every watcher whose data
    /// changed since its last delivery. Called by the client middleware after
    /// each committed action.
    pub fn broadcast_queries(&self) {
        let state = self.inner.client_state();
        let queries = state.get(QUERIES_STATE_KEY).cloned().unwrap_or(Value::Null);

        let mut deliveries = Vec::new();
        {
            let mut watchers = self.inner.watchers.lock().unwrap();
            for watcher in watchers.values_mut() {
                let current = match queries.get(&watcher.key) {
                    Some(data) => data.clone(),
                    None => continue,
                };
                if watcher.last_delivered.as_ref() == Some(&current) {
                    continue;
                }
                watcher.last_delivered = Some(current.clone());
                deliveries.push((watcher.handlers.on_next.clone(), current));
            }
        }

        for (on_next, data) in deliveries {
            on_next(&QueryResult {
                data,
                source: ResultSource::Cache,
                fetch_time: SystemTime::now(),
            });
        }
    }

    pub fn batching_enabled(&self) -> bool {
        self.inner.should_batch
    }

    pub fn root_key(&self) -> &str {
        &self.inner.root_key
    }

    #[cfg(test)]
    pub(crate) fn same_manager(&self, other: &QueryManager) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

struct Watcher {
    key: String,
    handlers: QueryHandlers,
    last_delivered: Option<Value>,
}

struct QueryManagerInner {
    transport: Arc<dyn NetworkTransport>,
    store: HostStore,
    root_key: String,
    query_transform: Option<QueryTransform>,
    should_batch: bool,
    watchers: Mutex<HashMap<u64, Watcher>>,
    next_watcher_id: AtomicU64,
}

impl QueryManagerInner {
    fn client_state(&self) -> Value {
        self.store
            .state()
            .get(&self.root_key)
            .cloned()
            .unwrap_or(Value::Null)
    }

    fn remove_watcher(&self, watcher_id: u64) {
        self.watchers.lock().unwrap().remove(&watcher_id);
    }
}
