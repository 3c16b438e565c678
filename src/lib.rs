//! A GraphQL client built around a host-owned state container.
//!
//! [`GraphQlClient`] is the composition root: it wires a network transport, a
//! cache slice of a unidirectional state store, and a query-dispatch engine
//! into one object. The store is created lazily on first use, or adopted from
//! a host application by installing [`GraphQlClient::middleware`] into its
//! store; queries and mutations always ensure the store exists before they
//! delegate.
//!
//! ```no_run
//! use graphql_rs_client::{ClientOptions, GraphQlClient, OperationDocument, QueryOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GraphQlClient::new(ClientOptions::default())?;
//! let document = OperationDocument::parse("query GetHero { hero { name } }")?;
//! let result = client.query(QueryOptions::new(document)).await?;
//! println!("{}", result.data["hero"]["name"]);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod document;
pub mod platform;
pub mod query_manager;
pub mod store;
pub mod transport;

pub use cache::{
    create_client_reducer, read_fragment_from_cache, read_query_from_cache,
    write_fragment_to_cache, write_query_to_cache, MutationBehaviorReducer, ObjectIdFn,
};
pub use client::{
    ClientError, ClientMiddleware, ClientOptions, ClientResult, GraphQlClient, RuntimeScheduler,
    Scheduler, DEFAULT_ROOT_KEY,
};
pub use document::{
    apply_query_transform, print_document, OperationDocument, OperationKind, QueryTransform,
};
pub use query_manager::{
    MutationOptions, MutationResult, QueryHandlers, QueryManager, QueryOptions, QueryResult,
    ResultSource, WatchedQuery,
};
pub use store::{
    combine_reducers, create_store, Action, DispatchLayer, HostStore, Middleware,
    MutationBehavior, Reducer,
};
pub use transport::{
    create_network_transport, GraphQlRequest, HttpTransport, NetworkTransport, TransportError,
    DEFAULT_ENDPOINT,
};
