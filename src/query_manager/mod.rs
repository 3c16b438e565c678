//! The query-dispatch engine the client delegates to.
//!
//! The manager owns the watcher registry and the cache-first read path. It is
//! constructed by the client once per adopted store and bound to the
//! transport, the root key, the query transform, and the batching flag.

mod manager;

use std::time::SystemTime;

use serde_json::Value;

use crate::document::OperationDocument;
use crate::store::MutationBehavior;

pub use manager::{QueryHandlers, QueryManager, WatchedQuery};

/// Indicates where a result originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultSource {
    Cache,
    Server,
}

/// Options for `query` and `watch_query`.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryOptions {
    pub query: OperationDocument,
    pub variables: Value,
    pub force_fetch: bool,
}

impl QueryOptions {
    pub fn new(query: OperationDocument) -> Self {
        Self {
            query,
            variables: Value::Null,
            force_fetch: false,
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_force_fetch(mut self, force_fetch: bool) -> Self {
        self.force_fetch = force_fetch;
        self
    }
}

/// Options for `mutate`.
#[derive(Clone, Debug, PartialEq)]
pub struct MutationOptions {
    pub mutation: OperationDocument,
    pub variables: Value,
    pub result_behaviors: Vec<MutationBehavior>,
}

impl MutationOptions {
    pub fn new(mutation: OperationDocument) -> Self {
        Self {
            mutation,
            variables: Value::Null,
            result_behaviors: Vec::new(),
        }
    }

    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_result_behavior(mut self, behavior: MutationBehavior) -> Self {
        self.result_behaviors.push(behavior);
        self
    }
}

/// Result of a one-shot or watched query.
#[derive(Clone, Debug)]
pub struct QueryResult {
    pub data: Value,
    pub source: ResultSource,
    pub fetch_time: SystemTime,
}

/// Result of a mutation.
#[derive(Clone, Debug)]
pub struct MutationResult {
    pub data: Value,
    pub fetch_time: SystemTime,
}
