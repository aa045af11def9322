//! Isolates the JSON object inside a model reply.
//!
//! Replies usually arrive as prose around a fenced block. A ```` ```json ````
//! fence wins over a bare ```` ``` ```` fence; with no fence at all the whole
//! reply is the candidate. Extraction never judges JSON validity.

use super::types::ExtractedPayload;
use crate::error::ExtractionError;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

pub fn extract_payload(text: &str) -> Result<ExtractedPayload<'_>, ExtractionError> {
    let Some((opened_at, body_start)) = find_opener(text) else {
        return Ok(ExtractedPayload::new(strip_trailing_commentary(text.trim())));
    };

    let body = &text[body_start..];
    let close = body
        .find(FENCE)
        .ok_or(ExtractionError::UnclosedBlock { opened_at })?;

    let candidate = body[..close].trim();
    Ok(ExtractedPayload::new(strip_trailing_commentary(candidate)))
}

/// Byte offsets of the fence opener and of the first byte after it.
fn find_opener(text: &str) -> Option<(usize, usize)> {
    if let Some(start) = text.find(JSON_FENCE) {
        return Some((start, start + JSON_FENCE.len()));
    }
    text.find(FENCE).map(|start| (start, start + FENCE.len()))
}

/// Drop anything after the last `}` of a `{`-leading candidate.
///
/// Some models append a sentence of commentary after the object, even inside
/// the fence. Candidates that do not open with `{` are returned as-is.
pub fn strip_trailing_commentary(candidate: &str) -> &str {
    if !candidate.starts_with('{') {
        return candidate;
    }
    match candidate.rfind('}') {
        Some(end) => &candidate[..=end],
        None => candidate,
    }
}
