//! # JSON Extraction
//!
//! Pulls a JSON object out of free-text generator replies.

use regex_lite::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("valid regex"));
static BRACED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Finds the first JSON object in a reply.
///
/// Tried in order, first one that parses to an object wins:
/// 1. The first fenced code block, optionally tagged `json`
/// 2. The whole reply, trimmed
/// 3. The widest `{...}` span
///
/// # Examples
///
/// ```
/// use encounter_forge::extract_json_object;
///
/// let reply = "Here you go:\n```json\n{\"name\": \"Emberfang\"}\n```\nEnjoy!";
/// let object = extract_json_object(reply).unwrap();
/// assert_eq!(object["name"], "Emberfang");
/// assert!(extract_json_object("no json here").is_none());
/// ```
pub fn extract_json_object(text: &str) -> Option<Map<String, Value>> {
    let fenced = FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim());
    let braced = BRACED_SPAN.find(text).map(|m| m.as_str());

    fenced
        .into_iter()
        .chain(std::iter::once(text.trim()))
        .chain(braced)
        .find_map(parse_object)
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
