use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Action kind dispatched when a query result arrives from the transport.
pub const QUERY_RESULT_ACTION: &str = "graphql/query-result";

/// Action kind dispatched when a mutation result arrives from the transport.
pub const MUTATION_RESULT_ACTION: &str = "graphql/mutation-result";

/// A single unit of change flowing through the host store.
///
/// Host applications dispatch their own kinds alongside the GraphQL ones; the
/// client reducer ignores anything it does not recognize.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    kind: String,
    payload: Value,
}

impl Action {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    pub(crate) fn query_result(query_key: &str, data: Value) -> Self {
        Self::new(
            QUERY_RESULT_ACTION,
            json!({ "queryKey": query_key, "data": data }),
        )
    }

    pub(crate) fn mutation_result(data: Value, behaviors: &[MutationBehavior]) -> Self {
        let behaviors = behaviors
            .iter()
            .map(|behavior| serde_json::to_value(behavior).unwrap_or(Value::Null))
            .collect::<Vec<_>>();
        Self::new(
            MUTATION_RESULT_ACTION,
            json!({ "data": data, "resultBehaviors": behaviors }),
        )
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

/// Named post-mutation cache behavior, resolved against the client's
/// configured behavior reducers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationBehavior {
    #[serde(rename = "type")]
    pub behavior_type: String,
    #[serde(default)]
    pub args: Value,
}

impl MutationBehavior {
    pub fn new(behavior_type: impl Into<String>, args: Value) -> Self {
        Self {
            behavior_type: behavior_type.into(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_result_action_carries_key_and_data() {
        let action = Action::query_result("key-1", json!({ "hero": "R2-D2" }));
        assert_eq!(action.kind(), QUERY_RESULT_ACTION);
        assert_eq!(action.payload()["queryKey"], "key-1");
        assert_eq!(action.payload()["data"]["hero"], "R2-D2");
    }

    #[test]
    fn mutation_result_action_serializes_behaviors() {
        let behaviors = vec![MutationBehavior::new("DELETE", json!({ "id": "4" }))];
        let action = Action::mutation_result(json!({ "ok": true }), &behaviors);
        assert_eq!(action.kind(), MUTATION_RESULT_ACTION);
        assert_eq!(action.payload()["resultBehaviors"][0]["type"], "DELETE");
        assert_eq!(action.payload()["resultBehaviors"][0]["args"]["id"], "4");
    }
}
