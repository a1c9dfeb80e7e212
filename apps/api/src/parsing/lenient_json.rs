//! Structured Response Parser: model text to JSON with one bounded repair.
//!
//! Attempt 1 parses the text as-is. Attempt 2 runs only when the trimmed text
//! opens with a ``` fence: the fence (and its language tag) and an optional
//! closing fence are stripped and the remainder is parsed. There is no third
//! attempt and no fallback value.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::parsing::error::ParseError;

const FENCE: &str = "```";

/// Whatever JSON the model produced, structurally unchecked.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedResult(Value);

pub fn parse_json_lenient(raw_text: &str) -> Result<ParsedResult, ParseError> {
    let strict_error = match serde_json::from_str::<Value>(raw_text) {
        Ok(value) => return Ok(ParsedResult(value)),
        Err(e) => e,
    };

    let reason = match strip_code_fence(raw_text) {
        Some(inner) => {
            debug!("Model output is fenced; retrying parse without the fence");
            match serde_json::from_str::<Value>(inner) {
                Ok(value) => return Ok(ParsedResult(value)),
                Err(e) => e.to_string(),
            }
        }
        None => strict_error.to_string(),
    };

    Err(ParseError::MalformedModelOutput {
        raw: raw_text.to_string(),
        reason,
    })
}

/// Returns the fenced body when `text` (trimmed) starts with a code fence.
fn strip_code_fence(text: &str) -> Option<&str> {
    let body = text.trim().strip_prefix(FENCE)?;

    // Language tag: the rest of the opening line when it is a bare word.
    let body = match body.split_once('\n') {
        Some((tag, rest)) if tag.trim().chars().all(is_tag_char) => rest,
        _ => strip_prefix_ignore_case(body, "json").unwrap_or(body),
    };

    let body = body.trim_end();
    let body = body.strip_suffix(FENCE).unwrap_or(body);
    Some(body.trim())
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
