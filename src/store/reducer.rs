use std::sync::Arc;

use serde_json::{Map, Value};

use crate::store::actions::Action;

/// Pure state transition: `(previous state, action) -> next state`.
pub type Reducer = Arc<dyn Fn(&Value, &Action) -> Value + Send + Sync>;

/// Mounts each reducer under its key of an object-shaped state tree.
///
/// Every dispatched action is offered to every slice; a slice that does not
/// recognize the action returns its previous value. Missing slices start as
/// `null`, so a slice reducer must tolerate a `null` previous state.
pub fn combine_reducers(slices: Vec<(String, Reducer)>) -> Reducer {
    Arc::new(move |state: &Value, action: &Action| {
        let mut next = match state {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };
        for (key, reducer) in &slices {
            let previous = next.get(key).cloned().unwrap_or(Value::Null);
            next.insert(key.clone(), reducer(&previous, action));
        }
        Value::Object(next)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counting_reducer() -> Reducer {
        Arc::new(|state: &Value, action: &Action| {
            if action.kind() != "increment" {
                return state.clone();
            }
            let current = state.as_i64().unwrap_or(0);
            json!(current + 1)
        })
    }

    #[test]
    fn combine_scopes_each_reducer_to_its_key() {
        let reducer = combine_reducers(vec![
            ("a".to_string(), counting_reducer()),
            ("b".to_string(), counting_reducer()),
        ]);
        let state = reducer(&json!({ "a": 3 }), &Action::new("increment", Value::Null));
        assert_eq!(state, json!({ "a": 4, "b": 1 }));
    }

    #[test]
    fn combine_preserves_unmanaged_keys() {
        let reducer = combine_reducers(vec![("a".to_string(), counting_reducer())]);
        let state = reducer(
            &json!({ "a": 1, "other": "untouched" }),
            &Action::new("increment", Value::Null),
        );
        assert_eq!(state, json!({ "a": 2, "other": "untouched" }));
    }
}
