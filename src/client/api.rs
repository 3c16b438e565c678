use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::cache::create_client_reducer;
use crate::client::config::{ClientConfig, ClientOptions};
use crate::client::errors::{ClientError, ClientResult};
use crate::client::middleware::ClientMiddleware;
use crate::client::ssr::ForceFetchPolicy;
use crate::query_manager::{
    MutationOptions, MutationResult, QueryHandlers, QueryManager, QueryOptions, QueryResult,
    WatchedQuery,
};
use crate::store::{combine_reducers, create_store, HostStore, Reducer};

/// The composition root: wires a transport, a store slice, and a query
/// manager into one client with a stable public surface.
///
/// The client is cheap to clone; clones share configuration, the force-fetch
/// policy, and the adopted store.
#[derive(Clone)]
pub struct GraphQlClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    policy: ForceFetchPolicy,
    slot: Mutex<StoreSlot>,
}

/// "No store yet" is a distinct state, not a sentinel; only `ensure_store`
/// and `adopt` move the slot out of it.
enum StoreSlot {
    Vacant,
    Adopted {
        store: HostStore,
        query_manager: QueryManager,
    },
}

impl GraphQlClient {
    pub fn new(options: ClientOptions) -> ClientResult<Self> {
        let config = ClientConfig::resolve(options)?;
        let policy = ForceFetchPolicy::from_config(
            config.ssr_mode,
            config.ssr_force_fetch_delay,
            &config.scheduler,
        );
        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                policy,
                slot: Mutex::new(StoreSlot::Vacant),
            }),
        })
    }

    /// Eagerly creates the default store. Idempotent; calling it is never
    /// required, since every dispatch method ensures the store itself.
    pub fn init_store(&self) -> ClientResult<()> {
        self.ensure_store().map(|_| ())
    }

    /// Registers a watcher for the query after applying the force-fetch
    /// policy. Results stream through the returned handle's callbacks.
    pub fn watch_query(
        &self,
        options: QueryOptions,
        handlers: QueryHandlers,
    ) -> ClientResult<WatchedQuery> {
        let query_manager = self.ensure_store()?;
        Ok(query_manager.watch_query(self.effective_options(options), handlers))
    }

    /// One-shot query, with the force-fetch policy applied.
    pub async fn query(&self, options: QueryOptions) -> ClientResult<QueryResult> {
        let query_manager = self.ensure_store()?;
        let options = self.effective_options(options);
        query_manager.query(options).await.map_err(ClientError::from)
    }

    /// Mutation. No force-fetch concern applies; options pass through
    /// unchanged.
    pub async fn mutate(&self, options: MutationOptions) -> ClientResult<MutationResult> {
        let query_manager = self.ensure_store()?;
        query_manager.mutate(options).await.map_err(ClientError::from)
    }

    /// The reducer for this client's slice of host state, to be mounted at
    /// the root key when the caller builds their own store.
    pub fn reducer(&self) -> Reducer {
        create_client_reducer(
            self.inner.config.object_id_fn.clone(),
            self.inner.config.mutation_behavior_reducers.clone(),
        )
    }

    /// Packages the client as host-store middleware; installing it adopts the
    /// host store.
    pub fn middleware(&self) -> ClientMiddleware {
        ClientMiddleware::new(self.clone())
    }

    /// Whether per-call force-fetch requests are currently honored.
    pub fn should_force_fetch(&self) -> bool {
        self.inner.policy.should_force_fetch()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Lazily creates and adopts the default store, then hands back the
    /// query manager. Store-before-delegate: every dispatch method calls this
    /// synchronously before touching the query manager.
    ///
    /// The slot lock is held across the vacancy check and the adoption, so
    /// concurrent callers on clones of the same client all resolve to the one
    /// store the first caller created.
    fn ensure_store(&self) -> ClientResult<QueryManager> {
        let mut slot = self.inner.slot.lock().unwrap();
        if let StoreSlot::Adopted { query_manager, .. } = &*slot {
            return Ok(query_manager.clone());
        }

        let root_key = self.inner.config.root_key.clone();
        let reducer = combine_reducers(vec![(root_key.clone(), self.reducer())]);
        let initial_state = json!({ root_key: self.inner.config.initial_state.clone() });
        let store = create_store(reducer, initial_state);

        let query_manager = self.record_adoption(&mut *slot, store.clone())?;
        drop(slot);

        // Re-adoption of the same store inside install is a no-op, so the
        // middleware can be wired onto the store we just created.
        store.apply_middleware(self.middleware())?;
        Ok(query_manager)
    }

    /// Validates and records the store, constructing the query manager bound
    /// to it. Fails fast when the root-key sub-tree is missing, and when a
    /// different store is already adopted.
    pub(crate) fn adopt(&self, store: HostStore) -> ClientResult<QueryManager> {
        let mut slot = self.inner.slot.lock().unwrap();
        self.record_adoption(&mut *slot, store)
    }

    fn record_adoption(
        &self,
        slot: &mut StoreSlot,
        store: HostStore,
    ) -> ClientResult<QueryManager> {
        if let StoreSlot::Adopted {
            store: existing,
            query_manager,
        } = &*slot
        {
            if existing.same_store(&store) {
                return Ok(query_manager.clone());
            }
            return Err(ClientError::StoreAlreadyAdopted);
        }

        let root_key = &self.inner.config.root_key;
        if store.state().get(root_key).is_none() {
            return Err(ClientError::MisconfiguredStore {
                root_key: root_key.clone(),
            });
        }

        let query_manager = QueryManager::new(
            self.inner.config.transport.clone(),
            store.clone(),
            root_key.clone(),
            self.inner.config.query_transform.clone(),
            self.inner.config.should_batch,
        );
        *slot = StoreSlot::Adopted {
            store,
            query_manager: query_manager.clone(),
        };
        Ok(query_manager)
    }

    pub(crate) fn current_query_manager(&self) -> Option<QueryManager> {
        match &*self.inner.slot.lock().unwrap() {
            StoreSlot::Adopted { query_manager, .. } => Some(query_manager.clone()),
            StoreSlot::Vacant => None,
        }
    }

    /// Applies the force-fetch suppression window: a caller's `force_fetch`
    /// is overridden to `false` while the policy is suppressed, and left
    /// untouched otherwise.
    fn effective_options(&self, mut options: QueryOptions) -> QueryOptions {
        if !self.inner.policy.should_force_fetch() && options.force_fetch {
            options.force_fetch = false;
        }
        options
    }
}
