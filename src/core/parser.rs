//! Response parsing. Model replies arrive as free text with a JSON array
//! buried somewhere inside; this module digs it out and applies the lossy
//! tolerance policy: individual malformed records are dropped and counted,
//! never allowed to fail the whole batch.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::domain::model::{ModelReply, RecordSet};
use crate::utils::error::{Result, TutorgenError};

fn fenced_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("static regex"))
}

/// Chat-template debris some local models leak into their output.
fn strip_debris(text: &str) -> String {
    text.replace("<s>", "").replace("</s>", "")
}

/// Slice the first balanced JSON array out of `text`. Tracks string
/// literals so brackets inside values don't end the scan early.
fn first_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Locate and decode the structured payload within a raw reply. Prose
/// around the payload is ignored; only the first parseable JSON array is
/// used. Fenced blocks are tried first since the prompt asks for one.
pub fn extract_payload(raw_text: &str) -> Result<Vec<Value>> {
    let cleaned = strip_debris(raw_text);

    let mut candidates: Vec<&str> = fenced_block_re()
        .captures_iter(&cleaned)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    candidates.push(&cleaned);

    for candidate in candidates {
        if let Some(slice) = first_json_array(candidate) {
            match serde_json::from_str::<Vec<Value>>(slice) {
                Ok(values) => return Ok(values),
                Err(e) => debug!("Candidate payload did not decode: {}", e),
            }
        }
    }

    Err(TutorgenError::parse_with_reply(
        "No JSON array found in the model reply",
        raw_text,
    ))
}

/// Validate one decoded element against the expected schema. Returns the
/// row rebuilt in schema order, or `None` when a required field is absent
/// or the element is not an object. Extra fields are silently dropped.
fn conform_row(element: &Value, schema: &[String]) -> Option<Map<String, Value>> {
    let object = element.as_object()?;
    let mut row = Map::with_capacity(schema.len());
    for field in schema {
        row.insert(field.clone(), object.get(field)?.clone());
    }
    Some(row)
}

/// Merge every reply into one RecordSet. A reply with no parseable payload
/// contributes nothing; rows missing required fields are dropped and
/// counted. Only a fully empty result is an error.
pub fn parse_records(replies: &[ModelReply], schema: &[String]) -> Result<RecordSet> {
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for reply in replies {
        let elements = match extract_payload(&reply.raw_text) {
            Ok(elements) => elements,
            Err(e) => {
                warn!("Discarding unparseable reply from {}: {}", reply.provider, e);
                continue;
            }
        };

        for element in &elements {
            match conform_row(element, schema) {
                Some(row) => rows.push(row),
                None => dropped += 1,
            }
        }
    }

    if dropped > 0 {
        warn!("Dropped {} malformed records", dropped);
    }

    if rows.is_empty() {
        let raw = replies
            .first()
            .map(|r| r.raw_text.clone())
            .unwrap_or_default();
        return Err(TutorgenError::parse_with_reply(
            "No valid records recovered from the model replies",
            raw,
        ));
    }

    Ok(RecordSet {
        schema: schema.to_vec(),
        rows,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Provider;

    fn reply(text: &str) -> ModelReply {
        ModelReply {
            raw_text: text.to_string(),
            provider: Provider::OpenAi,
        }
    }

    fn schema(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_prose_around_fenced_array_is_ignored() {
        let text = concat!(
            "Sure! Here are the records you asked for:\n\n",
            "```json\n",
            r#"[{"name":"A","age":30},{"name":"B","age":25},{"name":"C","age":41},{"age":19}]"#,
            "\n```\n\nLet me know if you need more.",
        );
        let result = parse_records(&[reply(text)], &schema(&["name", "age"])).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.dropped, 1);
        assert_eq!(result.rows[0]["name"], "A");
    }

    #[test]
    fn test_bare_array_without_fence() {
        let text = r#"Here you go: [{"name":"A","age":30}] enjoy"#;
        let result = parse_records(&[reply(text)], &schema(&["name", "age"])).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_brackets_inside_string_values() {
        let text = r#"[{"name":"A ] tricky","age":1}]"#;
        let result = parse_records(&[reply(text)], &schema(&["name", "age"])).unwrap();
        assert_eq!(result.rows[0]["name"], "A ] tricky");
    }

    #[test]
    fn test_chat_template_debris_is_stripped() {
        let text = "<s>```json\n[{\"name\":\"A\",\"age\":2}]\n```</s>";
        let result = parse_records(&[reply(text)], &schema(&["name", "age"])).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_empty_reply_is_a_parse_error() {
        let err = parse_records(&[reply("")], &schema(&["name"])).unwrap_err();
        assert!(matches!(err, TutorgenError::Parse { .. }));
    }

    #[test]
    fn test_unparseable_reply_keeps_raw_text_for_debugging() {
        let err = parse_records(&[reply("I refuse to answer.")], &schema(&["name"])).unwrap_err();
        match err {
            TutorgenError::Parse { raw_reply, .. } => {
                assert_eq!(raw_reply.as_deref(), Some("I refuse to answer."));
            }
            _ => panic!("expected Parse"),
        }
    }

    #[test]
    fn test_rows_rebuilt_in_schema_order_without_extras() {
        let text = r#"[{"age":30,"name":"A","extra":"x"}]"#;
        let result = parse_records(&[reply(text)], &schema(&["name", "age"])).unwrap();
        let keys: Vec<&String> = result.rows[0].keys().collect();
        assert_eq!(keys, ["name", "age"]);
        assert!(!result.rows[0].contains_key("extra"));
    }

    #[test]
    fn test_non_object_elements_are_dropped() {
        let text = r#"[{"name":"A"}, 42, "oops"]"#;
        let result = parse_records(&[reply(text)], &schema(&["name"])).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.dropped, 2);
    }

    #[test]
    fn test_replies_merge_and_one_bad_batch_is_tolerated() {
        let good = reply(r#"[{"name":"A"},{"name":"B"}]"#);
        let bad = reply("model went off the rails");
        let result = parse_records(&[good, bad], &schema(&["name"])).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_never_more_rows_than_supplied() {
        let text = r#"[{"name":"A"},{"name":"B"}]"#;
        let result = parse_records(&[reply(text)], &schema(&["name"])).unwrap();
        assert!(result.len() <= 2);
    }
}
