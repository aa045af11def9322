use serde::{Deserialize, Serialize};

/// Closed priority set shared by suggestions and stored tasks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Case-insensitive match against `low`, `medium`, `high`. No trimming.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Slice of a model reply believed to hold a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedPayload<'a>(&'a str);

impl<'a> ExtractedPayload<'a> {
    pub(crate) fn new(candidate: &'a str) -> Self {
        Self(candidate)
    }

    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

/// Decoded but unvalidated suggestion. Strings are exactly as the model sent them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawSuggestion {
    pub title: String,
    pub subtasks: Vec<String>,
    pub priority: String,
    pub time_estimate: String,
}

/// Validated suggestion returned to callers.
///
/// `priority` is always canonical and `time_estimate_days` is always a finite,
/// non-negative day count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSuggestion {
    pub title: String,
    pub subtasks: Vec<String>,
    pub priority: Priority,
    pub time_estimate_days: f64,
}

impl FinalSuggestion {
    /// Render this suggestion in the reply shape the model is asked to
    /// produce, with the estimate as a plain day-count string.
    pub fn to_canonical_reply(&self) -> String {
        serde_json::json!({
            "title": self.title,
            "subtasks": self.subtasks,
            "priority": self.priority.as_str(),
            "time_estimate": self.time_estimate_days.to_string(),
        })
        .to_string()
    }
}
