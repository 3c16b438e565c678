//! Cache utilities over the client's slice of host state.
//!
//! The sub-tree at the client's root key holds two flat maps: `queries`
//! (results keyed by printed document + variables) and `records` (objects
//! keyed by the configured object-id function). There is no normalization;
//! these helpers and the reducer are the only writers.

mod readwrite;
mod reducer;

pub use readwrite::{
    encode_query_key, read_fragment_from_cache, read_query_from_cache, write_fragment_to_cache,
    write_query_to_cache, QUERIES_STATE_KEY, RECORDS_STATE_KEY,
};
pub use reducer::{create_client_reducer, MutationBehaviorReducer, ObjectIdFn};
