use super::decode::decode_suggestion;
use super::estimate::normalize_estimate;
use super::extract::extract_payload;
use super::types::FinalSuggestion;
use super::validate::validate_suggestion;
use crate::error::{SuggestionError, SuggestionFailureKind};
use serde::Serialize;

/// Run a raw model reply through extract → decode → normalize → validate.
///
/// Pure and stateless; the first failing stage ends the run.
pub fn normalize_reply(reply: &str) -> Result<FinalSuggestion, SuggestionError> {
    let payload = extract_payload(reply)?;
    let raw = decode_suggestion(&payload)?;
    let days = normalize_estimate(&raw.time_estimate)?;
    Ok(validate_suggestion(raw, days)?)
}

/// Caller-facing description of a failed run. Carries no text from the reply;
/// the full error is only logged server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionFailure {
    pub kind: SuggestionFailureKind,
    pub detail: String,
}

impl From<&SuggestionError> for SuggestionFailure {
    fn from(err: &SuggestionError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.public_detail().to_string(),
        }
    }
}
