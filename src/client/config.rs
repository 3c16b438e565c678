use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{MutationBehaviorReducer, ObjectIdFn};
use crate::client::errors::{ClientError, ClientResult};
use crate::client::ssr::{RuntimeScheduler, Scheduler};
use crate::document::QueryTransform;
use crate::transport::{create_network_transport, NetworkTransport, DEFAULT_ENDPOINT};

/// State-tree key the client claims when the caller does not pick one.
pub const DEFAULT_ROOT_KEY: &str = "graphql";

/// Constructor inputs. Every field is optional; see [`ClientConfig`] for the
/// resolved defaults.
#[derive(Clone, Default)]
pub struct ClientOptions {
    pub transport: Option<Arc<dyn NetworkTransport>>,
    pub root_key: Option<String>,
    pub initial_state: Option<Value>,
    pub object_id_fn: Option<ObjectIdFn>,
    pub query_transform: Option<QueryTransform>,
    pub should_batch: Option<bool>,
    pub ssr_mode: Option<bool>,
    pub ssr_force_fetch_delay: Option<Duration>,
    pub mutation_behavior_reducers: HashMap<String, MutationBehaviorReducer>,
    pub scheduler: Option<Arc<dyn Scheduler>>,
}

/// Immutable policy the rest of the client reads. Produced once at
/// construction; nothing mutates it afterwards.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) transport: Arc<dyn NetworkTransport>,
    pub(crate) root_key: String,
    pub(crate) initial_state: Value,
    pub(crate) object_id_fn: Option<ObjectIdFn>,
    pub(crate) query_transform: Option<QueryTransform>,
    pub(crate) should_batch: bool,
    pub(crate) ssr_mode: bool,
    pub(crate) ssr_force_fetch_delay: Duration,
    pub(crate) mutation_behavior_reducers: HashMap<String, MutationBehaviorReducer>,
    pub(crate) scheduler: Arc<dyn Scheduler>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("root_key", &self.root_key)
            .field("initial_state", &self.initial_state)
            .field("should_batch", &self.should_batch)
            .field("ssr_mode", &self.ssr_mode)
            .field("ssr_force_fetch_delay", &self.ssr_force_fetch_delay)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    pub(crate) fn resolve(options: ClientOptions) -> ClientResult<Self> {
        let root_key = options
            .root_key
            .unwrap_or_else(|| DEFAULT_ROOT_KEY.to_string());
        if root_key.trim().is_empty() {
            return Err(ClientError::BadRootKey);
        }

        let transport = options
            .transport
            .unwrap_or_else(|| Arc::new(create_network_transport(DEFAULT_ENDPOINT)));

        Ok(Self {
            transport,
            root_key,
            initial_state: options
                .initial_state
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            object_id_fn: options.object_id_fn,
            query_transform: options.query_transform,
            should_batch: options.should_batch.unwrap_or(false),
            ssr_mode: options.ssr_mode.unwrap_or(false),
            ssr_force_fetch_delay: options.ssr_force_fetch_delay.unwrap_or(Duration::ZERO),
            mutation_behavior_reducers: options.mutation_behavior_reducers,
            scheduler: options
                .scheduler
                .unwrap_or_else(|| Arc::new(RuntimeScheduler)),
        })
    }

    pub fn root_key(&self) -> &str {
        &self.root_key
    }

    pub fn transport(&self) -> &Arc<dyn NetworkTransport> {
        &self.transport
    }
}
