use serde_json::{json, Map, Value};

use crate::document::{print_document, OperationDocument};

/// Key of the per-query results map inside the client's state sub-tree.
pub const QUERIES_STATE_KEY: &str = "queries";

/// Key of the object-id index inside the client's state sub-tree.
pub const RECORDS_STATE_KEY: &str = "records";

/// Stable cache key for a query: printed document plus variables.
pub fn encode_query_key(document: &OperationDocument, variables: &Value) -> String {
    let payload = json!({
        "query": print_document(document),
        "variables": variables,
    });
    payload.to_string()
}

/// Reads a previously stored query result out of a client state sub-tree.
pub fn read_query_from_cache(
    state: &Value,
    document: &OperationDocument,
    variables: &Value,
) -> Option<Value> {
    let key = encode_query_key(document, variables);
    state.get(QUERIES_STATE_KEY)?.get(&key).cloned()
}

/// Stores a query result into a client state sub-tree, creating the results
/// map if the sub-tree was empty.
pub fn write_query_to_cache(
    state: &mut Value,
    document: &OperationDocument,
    variables: &Value,
    data: Value,
) {
    let key = encode_query_key(document, variables);
    write_keyed(state, QUERIES_STATE_KEY, &key, data);
}

/// Reads an object from the id index.
pub fn read_fragment_from_cache(state: &Value, id: &str) -> Option<Value> {
    state.get(RECORDS_STATE_KEY)?.get(id).cloned()
}

/// Writes an object into the id index under the given cache key.
pub fn write_fragment_to_cache(state: &mut Value, id: &str, data: Value) {
    write_keyed(state, RECORDS_STATE_KEY, id, data);
}

fn write_keyed(state: &mut Value, map_key: &str, entry_key: &str, data: Value) {
    if !state.is_object() {
        *state = Value::Object(Map::new());
    }
    let root = match state.as_object_mut() {
        Some(root) => root,
        None => return,
    };
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

    fn document() -> OperationDocument {
        OperationDocument::parse("query GetHero { hero { name } }").unwrap()
    }

    #[test]
    fn query_roundtrip() {
        let mut state = Value::Null;
        let variables = json!({ "episode": "JEDI" });
        assert!(read_query_from_cache(&state, &document(), &variables).is_none());

        write_query_to_cache(
            &mut state,
            &document(),
            &variables,
            json!({ "hero": { "name": "R2-D2" } }),
        );
        let cached = read_query_from_cache(&state, &document(), &variables).unwrap();
        assert_eq!(cached["hero"]["name"], "R2-D2");
    }

    #[test]
    fn variables_distinguish_entries() {
        let mut state = Value::Null;
        write_query_to_cache(&mut state, &document(), &json!({ "id": 1 }), json!(1));
        write_query_to_cache(&mut state, &document(), &json!({ "id": 2 }), json!(2));
        assert_eq!(
            read_query_from_cache(&state, &document(), &json!({ "id": 1 })),
            Some(json!(1))
        );
        assert_eq!(
            read_query_from_cache(&state, &document(), &json!({ "id": 2 })),
            Some(json!(2))
        );
    }

    #[test]
    fn whitespace_variants_share_a_key() {
        let spaced = OperationDocument::parse("query GetHero {\n  hero { name }\n}").unwrap();
        let compact = OperationDocument::parse("query GetHero { hero { name } }").unwrap();
        assert_eq!(
            encode_query_key(&spaced, &Value::Null),
            encode_query_key(&compact, &Value::Null)
        );
    }

    #[test]
    fn fragment_roundtrip() {
        let mut state = json!({});
        assert!(read_fragment_from_cache(&state, "Hero:4").is_none());
        write_fragment_to_cache(&mut state, "Hero:4", json!({ "name": "R2-D2" }));
        assert_eq!(
            read_fragment_from_cache(&state, "Hero:4").unwrap()["name"],
            "R2-D2"
        );
    }
}
