use super::types::{FinalSuggestion, Priority, RawSuggestion};
use crate::error::ValidationError;

/// Enforce the priority set and the estimate range, then assemble the
/// final suggestion. Title and subtasks are passed through untouched.
pub fn validate_suggestion(
    raw: RawSuggestion,
    estimate_days: f64,
) -> Result<FinalSuggestion, ValidationError> {
    let priority = Priority::parse(&raw.priority)
        .ok_or_else(|| ValidationError::InvalidPriority(raw.priority.clone()))?;

    if !estimate_days.is_finite() || estimate_days < 0.0 {
        return Err(ValidationError::EstimateOutOfRange(estimate_days));
    }

    Ok(FinalSuggestion {
        title: raw.title,
        subtasks: raw.subtasks,
        priority,
        // -0.0 + 0.0 == +0.0
        time_estimate_days: estimate_days + 0.0,
    })
}
