//! Structured-response parser.
//!
//! Language models are asked to answer with a bare JSON object and
//! frequently don't: they wrap it in a markdown fence, prepend a sentence,
//! or append commentary. [`extract_json_object`] recovers the object from
//! such text. It is shared by every component that talks to a model.
//!
//! Strategies, first success wins:
//! 1. the whole text parses as a JSON object;
//! 2. a fenced code block (optionally tagged `json`) holds one;
//! 3. the first brace-balanced substring (one nested level) parses as one.
//!
//! The third strategy is a heuristic, not a JSON grammar: objects nested
//! more than one level deep are not guaranteed to be found by it.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::trace;

/// A JSON object recovered from model output.
pub type JsonObject = Map<String, Value>;

static FENCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("fenced object pattern is valid")
});

static BALANCED_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").expect("balanced object pattern is valid")
});

fn parse_object(candidate: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Recover one JSON object from arbitrary model text.
///
/// Returns `None` when no strategy yields an object. This is a normal,
/// recoverable outcome, never a panic.
pub fn extract_json_object(text: &str) -> Option<JsonObject> {
    if let Some(map) = parse_object(text.trim()) {
        trace!(strategy = "direct", "recovered JSON object");
        return Some(map);
    }

    for captures in FENCED_OBJECT.captures_iter(text) {
        if let Some(map) = captures.get(1).and_then(|m| parse_object(m.as_str())) {
            trace!(strategy = "fenced", "recovered JSON object");
            return Some(map);
        }
    }

    if let Some(map) = BALANCED_OBJECT
        .find(text)
        .and_then(|m| parse_object(m.as_str()))
    {
        trace!(strategy = "balanced_braces", "recovered JSON object");
        return Some(map);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_direct_object() {
        let text = r#"  {"global_state": "started", "identified_risks": []}  "#;
        assert_eq!(
            extract_json_object(text),
            Some(obj(json!({"global_state": "started", "identified_risks": []})))
        );
    }

    #[test]
    fn test_fenced_block_with_json_tag() {
        let text = "Here is the belief state:\n```json\n{\"current_goal\": \"write PRD\"}\n```\nDone.";
        assert_eq!(
            extract_json_object(text),
            Some(obj(json!({"current_goal": "write PRD"})))
        );
    }

    #[test]
    fn test_fenced_block_without_tag() {
        let text = "```\n{\"risk_divergence\": 0.7}\n```";
        assert_eq!(
            extract_json_object(text),
            Some(obj(json!({"risk_divergence": 0.7})))
        );
    }

    #[test]
    fn test_inline_object_with_prose() {
        let text = r#"Sure! {"overall_divergence": 0.4, "explanation": "minor"} Hope this helps."#;
        assert_eq!(
            extract_json_object(text),
            Some(obj(json!({"overall_divergence": 0.4, "explanation": "minor"})))
        );
    }

    #[test]
    fn test_inline_object_with_one_nested_level() {
        let text = r#"The state is {"teammate_model": {"Bob": "needs types", "Carol": "tests"}, "global_state": "x"} as requested"#;
        assert_eq!(
            extract_json_object(text),
            Some(obj(json!({
                "teammate_model": {"Bob": "needs types", "Carol": "tests"},
                "global_state": "x"
            })))
        );
    }

    #[test]
    fn test_unclosed_fence_falls_through_to_braces() {
        let text = "Answer: {\"a\": 1}\n```json\n{ truncated";
        assert_eq!(extract_json_object(text), Some(obj(json!({"a": 1}))));
    }

    #[test]
    fn test_malformed_fenced_object_is_a_miss() {
        let text = "```json\n{\"a\": 1,}\n```";
        assert_eq!(extract_json_object(text), None);
    }

    #[test]
    fn test_non_object_json_is_a_miss() {
        assert_eq!(extract_json_object("[1, 2, 3]"), None);
        assert_eq!(extract_json_object("42"), None);
        assert_eq!(extract_json_object("\"just a string\""), None);
    }

    #[test]
    fn test_no_object_is_a_miss() {
        assert_eq!(extract_json_object(""), None);
        assert_eq!(extract_json_object("I could not produce a belief state."), None);
        assert_eq!(extract_json_object("{ unbalanced"), None);
    }

    fn simple_object() -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-z_]{1,12}", "[a-zA-Z0-9 .,]{0,20}", 0..6).prop_map(
            |m| {
                Value::Object(
                    m.into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect(),
                )
            },
        )
    }

    proptest! {
        #[test]
        fn prop_recovers_embedded_object(
            object in simple_object(),
            prefix in "[a-zA-Z ,.!:]{0,40}",
            suffix in "[a-zA-Z ,.!:]{0,40}",
            fenced in any::<bool>(),
        ) {
            let body = serde_json::to_string(&object).unwrap();
            let text = if fenced {
                format!("{prefix}\n```json\n{body}\n```\n{suffix}")
            } else {
                format!("{prefix} {body} {suffix}")
            };
            prop_assert_eq!(extract_json_object(&text).map(Value::Object), Some(object));
        }

        #[test]
        fn prop_text_without_braces_is_never_an_object(text in "[^{}]{0,200}") {
            prop_assert!(extract_json_object(&text).is_none());
        }
    }
}
