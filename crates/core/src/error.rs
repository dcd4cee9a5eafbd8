//! Error types for the codecritic domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! The split that matters for the loop: action-layer failures that the
//! reasoning component can recover from (missing file, bad JSON, unknown
//! action name) are converted to textual results and never abort the run;
//! provider failures and orchestration invariant violations always do.

use thiserror::Error;

/// The top-level error type for all codecritic operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Action errors ---
    #[error("Action error: {0}")]
    Action(#[from] ActionError),

    // --- Orchestration errors ---
    #[error("Orchestration error: {0}")]
    Orchestration(#[from] OrchestrationError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    Unknown(String),

    #[error("Action execution failed: {action}: {reason}")]
    ExecutionFailed { action: String, reason: String },

    #[error("Invalid action arguments: {0}")]
    InvalidArguments(String),

    /// A structured report could not be parsed during summary synthesis.
    /// The wording is part of the action's contract: the decision model
    /// reacts to the "Error decoding" prefix.
    #[error("Error decoding JSON input: {0}. Please ensure inputs are valid JSON strings.")]
    MalformedReport(String),
}

/// Invariant violations in the loop controller itself. Never converted to
/// text; these abort the run.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("action request {call_id} ({action}) received no matching result")]
    UnmatchedRequest { call_id: String, action: String },

    #[error("decision limit reached after {limit} iterations")]
    IterationLimit { limit: u32 },
}
