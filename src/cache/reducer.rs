use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::cache::readwrite::{QUERIES_STATE_KEY, RECORDS_STATE_KEY};
use crate::store::{
    Action, MutationBehavior, Reducer, MUTATION_RESULT_ACTION, QUERY_RESULT_ACTION,
};

/// Derives a cache key from a response object, or `None` to skip indexing it.
pub type ObjectIdFn = Arc<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Applies one named mutation behavior to the client state sub-tree:
/// `(previous sub-tree, behavior, mutation data) -> next sub-tree`.
pub type MutationBehaviorReducer =
    Arc<dyn Fn(&Value, &MutationBehavior, &Value) -> Value + Send + Sync>;

/// Builds the reducer for the client's slice of host state.
///
/// Query results land in the `queries` map under their query key; objects the
/// id function recognizes are additionally indexed under `records`. Mutation
/// results are folded through the configured behavior reducers. Every other
/// action returns the previous state untouched.
pub fn create_client_reducer(
    object_id_fn: Option<ObjectIdFn>,
    behavior_reducers: HashMap<String, MutationBehaviorReducer>,
) -> Reducer {
    Arc::new(move |state: &Value, action: &Action| match action.kind() {
        QUERY_RESULT_ACTION => reduce_query_result(state, action.payload(), object_id_fn.as_ref()),
        MUTATION_RESULT_ACTION => reduce_mutation_result(state, action.payload(), &behavior_reducers),
        _ => state.clone(),
    })
}

fn reduce_query_result(state: &Value, payload: &Value, object_id_fn: Option<&ObjectIdFn>) -> Value {
    let (key, data) = match (payload.get("queryKey").and_then(Value::as_str), payload.get("data")) {
        (Some(key), Some(data)) => (key, data),
        _ => return state.clone(),
    };

    let mut next = ensure_object(state);
    insert_keyed(&mut next, QUERIES_STATE_KEY, key, data.clone());

    if let Some(object_id_fn) = object_id_fn {
        if let Some(fields) = data.as_object() {
            for value in fields.values() {
                if let Some(id) = object_id_fn(value) {
                    insert_keyed(&mut next, RECORDS_STATE_KEY, &id, value.clone());
                }
            }
        }
    }

    Value::Object(next)
}

fn reduce_mutation_result(
    state: &Value,
    payload: &Value,
    behavior_reducers: &HashMap<String, MutationBehaviorReducer>,
) -> Value {
    let data = payload.get("data").cloned().unwrap_or(Value::Null);
    let behaviors: Vec<MutationBehavior> = payload
        .get("resultBehaviors")
        .cloned()
        .map(|value| serde_json::from_value(value).unwrap_or_default())
        .unwrap_or_default();

    let mut next = state.clone();
    for behavior in behaviors {
        if let Some(reducer) = behavior_reducers.get(&behavior.behavior_type) {
            next = reducer(&next, &behavior, &data);
        } else {
            log::warn!(
                "no reducer configured for mutation behavior '{}'",
                behavior.behavior_type
            );
        }
    }
    next
}

fn ensure_object(state: &Value) -> Map<String, Value> {
    match state {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    }
}

fn insert_keyed(root: &mut Map<String, Value>, map_key: &str, entry_key: &str, data: Value) {
    let map = root
        .entry(map_key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !map.is_object() {
        *map = Value::Object(Map::new());
    }
    if let Some(map) = map.as_object_mut() {
        map.insert(entry_key.to_string(), data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::readwrite::{read_fragment_from_cache, read_query_from_cache};
    use crate::document::OperationDocument;
    use serde_json::json;

    fn document() -> OperationDocument {
        OperationDocument::parse("query GetHero { hero { id name } }").unwrap()
    }

    #[test]
    fn query_result_is_written_under_its_key() {
        let reducer = create_client_reducer(None, HashMap::new());
        let key = crate::cache::readwrite::encode_query_key(&document(), &Value::Null);
        let state = reducer(
            &Value::Null,
            &Action::query_result(&key, json!({ "hero": { "id": "4", "name": "R2-D2" } })),
        );
        let cached = read_query_from_cache(&state, &document(), &Value::Null).unwrap();
        assert_eq!(cached["hero"]["name"], "R2-D2");
    }

    #[test]
    fn object_id_fn_indexes_records() {
        let object_id: ObjectIdFn = Arc::new(|value| {
            value
                .get("id")
                .and_then(Value::as_str)
                .map(|id| format!("Hero:{id}"))
        });
        let reducer = create_client_reducer(Some(object_id), HashMap::new());
        let state = reducer(
            &Value::Null,
            &Action::query_result("k", json!({ "hero": { "id": "4", "name": "R2-D2" } })),
        );
        let record = read_fragment_from_cache(&state, "Hero:4").unwrap();
        assert_eq!(record["name"], "R2-D2");
    }

    #[test]
    fn unknown_actions_leave_state_alone() {
        let reducer = create_client_reducer(None, HashMap::new());
        let previous = json!({ "queries": { "k": 1 } });
        let state = reducer(&previous, &Action::new("host/other", Value::Null));
        assert_eq!(state, previous);
    }

    #[test]
    fn mutation_behaviors_run_their_reducers() {
        let mut behaviors: HashMap<String, MutationBehaviorReducer> = HashMap::new();
        behaviors.insert(
            "DELETE".to_string(),
            Arc::new(|state, behavior, _data| {
                let mut next = state.clone();
                if let Some(id) = behavior.args.get("id").and_then(Value::as_str) {
                    if let Some(records) = next
                        .get_mut(RECORDS_STATE_KEY)
                        .and_then(Value::as_object_mut)
                    {
                        records.remove(id);
                    }
                }
                next
            }),
        );
        let reducer = create_client_reducer(None, behaviors);

        let previous = json!({ "records": { "Hero:4": { "name": "R2-D2" } } });
        let state = reducer(
            &previous,
            &Action::mutation_result(
                json!({ "ok": true }),
                &[MutationBehavior::new("DELETE", json!({ "id": "Hero:4" }))],
            ),
        );
        assert!(read_fragment_from_cache(&state, "Hero:4").is_none());
    }

    #[test]
    fn unconfigured_behavior_is_a_no_op() {
        let reducer = create_client_reducer(None, HashMap::new());
        let previous = json!({ "records": {} });
        let state = reducer(
            &previous,
            &Action::mutation_result(
                Value::Null,
                &[MutationBehavior::new("UNKNOWN", Value::Null)],
            ),
        );
        assert_eq!(state, previous);
    }
}
