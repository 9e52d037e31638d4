use thiserror::Error;

/// Errors from the AI chat provider pass-through.
///
/// Provider payloads are not part of this system's contract, so failures are
/// carried opaquely and rendered with a generic fallback message.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat provider request failed: {0}")]
    Upstream(String),

    #[error("no chat provider API key is configured")]
    MissingApiKey,
}
