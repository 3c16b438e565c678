//! A minimal unidirectional state container and its middleware contract.
//!
//! The client does not require callers to use this store for their whole
//! application, but any store it adopts must speak this interface: a `Value`
//! state tree, reducers, and a redux-shaped middleware chain.

mod actions;
mod reducer;
mod store;

pub use actions::{Action, MutationBehavior, MUTATION_RESULT_ACTION, QUERY_RESULT_ACTION};
pub use reducer::{combine_reducers, Reducer};
pub use store::{create_store, DispatchLayer, HostStore, Middleware};
