//! Axum HTTP gateway: accounts, task CRUD, and AI suggestions.
//!
//! Every route shares the same layer stack: 64KB body limit, request
//! timeout, CORS, request logging, and panic recovery.

mod handlers;
mod server;
mod suggest_handler;
mod tasks_handler;

pub use server::{build_app, build_gateway_state, run_gateway, run_gateway_with_listener};

use crate::auth::{TokenSigner, UserStore};
use crate::suggest::SuggestionService;
use crate::tasks::TaskStore;
use std::sync::Arc;

/// Maximum request body size (64KB) -- prevents memory exhaustion
pub const MAX_BODY_SIZE: usize = 65_536;
/// Floor for the request timeout. Raised above the LLM timeout when needed.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Headroom between the LLM timeout and the request timeout.
const TIMEOUT_HEADROOM_SECS: u64 = 5;

/// Request timeout that always outlives one LLM call.
pub fn request_timeout_secs(llm_timeout_secs: u64) -> u64 {
    REQUEST_TIMEOUT_SECS.max(llm_timeout_secs.saturating_add(TIMEOUT_HEADROOM_SECS))
}

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub signer: Arc<TokenSigner>,
    pub suggestions: Arc<SuggestionService>,
    pub password_iterations: u32,
}
