//! The client composition root.
//!
//! Construction resolves options into an immutable config; the backing store
//! is created lazily (or adopted from a host store via [`middleware`]) and
//! every dispatch method guarantees the store exists before delegating to the
//! query manager.
//!
//! [`middleware`]: GraphQlClient::middleware

mod api;
mod config;
mod errors;
mod middleware;
mod ssr;

pub use api::GraphQlClient;
pub use config::{ClientConfig, ClientOptions, DEFAULT_ROOT_KEY};
pub use errors::{ClientError, ClientResult};
pub use middleware::ClientMiddleware;
pub use ssr::{ForceFetchPolicy, RuntimeScheduler, Scheduler};
