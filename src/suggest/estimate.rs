use crate::error::TimeParseError;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_WEEK: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeUnit {
    Hour,
    Day,
    Week,
}

impl TimeUnit {
    fn from_word(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "hour" | "hours" => Some(Self::Hour),
            "day" | "days" => Some(Self::Day),
            "week" | "weeks" => Some(Self::Week),
            _ => None,
        }
    }

    fn to_days(self, amount: f64) -> f64 {
        match self {
            Self::Hour => amount / HOURS_PER_DAY,
            Self::Day => amount,
            Self::Week => amount * DAYS_PER_WEEK,
        }
    }
}

/// Convert a free-form estimate to days.
///
/// Accepts a bare number (already days) or `<number> <unit>` with exactly one
/// space and an hour/day/week unit. Negative amounts pass through.
pub fn normalize_estimate(raw: &str) -> Result<f64, TimeParseError> {
    let unparseable = || TimeParseError::Unparseable {
        raw: raw.to_string(),
    };
    let trimmed = raw.trim();

    if let Ok(days) = trimmed.parse::<f64>() {
        return if days.is_finite() {
            Ok(days)
        } else {
            Err(unparseable())
        };
    }

    let (amount, word) = trimmed.split_once(' ').ok_or_else(unparseable)?;
    if word.is_empty() || word.contains(char::is_whitespace) {
        return Err(unparseable());
    }
    let amount = amount
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(unparseable)?;

    let unit = TimeUnit::from_word(word).ok_or_else(|| TimeParseError::UnknownUnit {
        unit: word.to_string(),
    })?;
    Ok(unit.to_days(amount))
}
