use super::types::{ExtractedPayload, RawSuggestion};
use crate::error::DecodeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use serde_json::error::Category;

/// Reply shape requested from the model.
///
/// Every key is optional and `null` counts as absent. `timeEstimate` is
/// accepted for models that answer in camel case; when both spellings are
/// present `time_estimate` wins. Unknown keys are ignored.
#[derive(Deserialize)]
struct WireSuggestion {
    #[serde(default, deserialize_with = "null_as_default")]
    title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    subtasks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    priority: String,
    #[serde(default)]
    time_estimate: Option<String>,
    #[serde(default, rename = "timeEstimate")]
    time_estimate_camel: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub fn decode_suggestion(payload: &ExtractedPayload<'_>) -> Result<RawSuggestion, DecodeError> {
    let value: Value = serde_json::from_str(payload.as_str()).map_err(|err| match err.classify() {
        Category::Data => DecodeError::TypeMismatch(err.to_string()),
        Category::Io | Category::Syntax | Category::Eof => {
            DecodeError::MalformedJson(err.to_string())
        }
    })?;

    if !value.is_object() {
        return Err(DecodeError::TypeMismatch(format!(
            "expected a JSON object, found {}",
            json_kind(&value)
        )));
    }

    let wire = WireSuggestion::deserialize(value)
        .map_err(|err| DecodeError::TypeMismatch(err.to_string()))?;

    Ok(RawSuggestion {
        title: wire.title,
        subtasks: wire.subtasks,
        priority: wire.priority,
        time_estimate: wire
            .time_estimate
            .or(wire.time_estimate_camel)
            .unwrap_or_default(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
