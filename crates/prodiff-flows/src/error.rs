//! Error types for the workflow layer

use prodiff_domain::RecordId;
use prodiff_extract::ExtractError;
use thiserror::Error;

/// Errors that can occur while running a flow
#[derive(Error, Debug)]
pub enum FlowError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Record store error
    #[error("store error: {0}")]
    Store(String),

    /// Prompt template error
    #[error("prompt error: {0}")]
    Prompt(#[from] prodiff_prompt::PromptError),

    /// The provider call exceeded the configured timeout
    #[error("LLM call timed out")]
    Timeout,

    /// The model's response could not be interpreted
    ///
    /// Recoverable: log the raw response, tell the user, and let them retry
    /// the upstream call. The flow itself never retries.
    #[error("could not interpret AI response ({raw_len} chars): {source}")]
    Extraction {
        /// Length of the raw response, for diagnosis
        raw_len: usize,
        /// The underlying extraction failure
        source: ExtractError,
    },

    /// The extracted value did not decode into the expected payload shape
    #[error("unexpected response shape: {0}")]
    InvalidShape(String),

    /// The referenced project does not exist
    #[error("project not found: {0}")]
    ProjectNotFound(RecordId),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}
