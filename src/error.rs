use serde::Serialize;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `Taskforge`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide how to respond; internal plumbing continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum TaskforgeError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Suggestion pipeline ─────────────────────────────────────────────
    #[error("suggestion: {0}")]
    Suggestion(#[from] SuggestionError),

    // ── Auth ────────────────────────────────────────────────────────────
    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    // ── Tasks ───────────────────────────────────────────────────────────
    #[error("task: {0}")]
    TaskInput(#[from] TaskInputError),

    // ── Store ───────────────────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider {provider} request failed: {message}")]
    Request { provider: String, message: String },

    #[error("provider {provider} returned HTTP {status}: {message}")]
    Status {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("provider {provider} timed out after {secs}s")]
    Timeout { provider: String, secs: u64 },

    #[error("provider {provider} has no API key configured")]
    MissingApiKey { provider: String },

    #[error("provider {provider} returned no content")]
    EmptyResponse { provider: String },
}

// ─── Suggestion pipeline errors ─────────────────────────────────────────────

/// Failure to isolate a JSON payload from a model reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("code fence opened at byte {opened_at} is never closed")]
    UnclosedBlock { opened_at: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("unexpected JSON shape: {0}")]
    TypeMismatch(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("unrecognised time estimate format: {raw:?}")]
    Unparseable { raw: String },

    #[error("unknown time unit {unit:?}")]
    UnknownUnit { unit: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("priority {0:?} is not one of low, medium, high")]
    InvalidPriority(String),

    #[error("time estimate must be a finite, non-negative day count (got {0})")]
    EstimateOutOfRange(f64),
}

/// Wire tag for a failed pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum SuggestionFailureKind {
    ExtractionFailed,
    DecodeFailed,
    TimeParseFailed,
    InvalidPriority,
}

/// Terminal failure of a single pipeline run. Each stage fails fast.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuggestionError {
    #[error("extraction: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("decode: {0}")]
    Decode(#[from] DecodeError),

    #[error("time estimate: {0}")]
    TimeParse(#[from] TimeParseError),

    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
}

impl SuggestionError {
    pub fn kind(&self) -> SuggestionFailureKind {
        match self {
            Self::Extraction(_) => SuggestionFailureKind::ExtractionFailed,
            Self::Decode(_) => SuggestionFailureKind::DecodeFailed,
            Self::TimeParse(_) | Self::Validation(ValidationError::EstimateOutOfRange(_)) => {
                SuggestionFailureKind::TimeParseFailed
            }
            Self::Validation(ValidationError::InvalidPriority(_)) => {
                SuggestionFailureKind::InvalidPriority
            }
        }
    }

    /// Client-facing description. Fixed per variant, so values lifted from
    /// the model reply never leave the process.
    pub fn public_detail(&self) -> &'static str {
        match self {
            Self::Extraction(ExtractionError::UnclosedBlock { .. }) => {
                "code fence in the reply is never closed"
            }
            Self::Decode(DecodeError::MalformedJson(_)) => "reply payload is not valid JSON",
            Self::Decode(DecodeError::TypeMismatch(_)) => {
                "reply JSON does not match the expected field types"
            }
            Self::TimeParse(TimeParseError::Unparseable { .. }) => {
                "unrecognised time estimate format"
            }
            Self::TimeParse(TimeParseError::UnknownUnit { .. }) => {
                "time estimate unit is not one of hours, days, weeks"
            }
            Self::Validation(ValidationError::InvalidPriority(_)) => {
                "priority is not one of low, medium, high"
            }
            Self::Validation(ValidationError::EstimateOutOfRange(_)) => {
                "time estimate must be a finite, non-negative day count"
            }
        }
    }
}

/// Errors surfaced by the suggestion orchestrator.
#[derive(Debug, Error)]
pub enum SuggestError {
    #[error("task description is required")]
    EmptyDescription,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Pipeline(#[from] SuggestionError),
}

// ─── Auth errors ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("token is malformed")]
    MalformedToken,

    #[error("unsupported token algorithm {0:?}")]
    UnsupportedAlgorithm(String),

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("stored password hash is malformed")]
    MalformedHash,

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// ─── Task input errors ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskInputError {
    #[error("title is required")]
    MissingTitle,

    #[error("status {0:?} is not one of pending, todo, in_progress, completed")]
    InvalidStatus(String),

    #[error("priority {0:?} is not one of low, medium, high")]
    InvalidPriority(String),

    #[error("due_date {0:?} is not an RFC 3339 timestamp or YYYY-MM-DD date")]
    InvalidDueDate(String),

    #[error("assignee {0} does not exist")]
    UnknownAssignee(i64),
}

// ─── Store errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("email already registered")]
    DuplicateEmail,

    #[error("schema migration failed: {0}")]
    Migration(String),

    #[error("sqlx: {0}")]
    Sqlx(#[from] sqlx::Error),
}
