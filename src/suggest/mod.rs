//! Task breakdown suggestions from a language model.
//!
//! The reply is untrusted free text. It flows one way through
//! [`extract`] → [`decode`] → [`estimate`] → [`validate`], and every stage
//! either hands a value forward or ends the run with a tagged error.

pub mod decode;
pub mod estimate;
pub mod extract;
pub mod pipeline;
pub mod prompt;
pub mod service;
pub mod types;
pub mod validate;

pub use pipeline::{SuggestionFailure, normalize_reply};
pub use service::SuggestionService;
pub use types::{ExtractedPayload, FinalSuggestion, Priority, RawSuggestion};
