//! Domain-specific error types for plotpilot
//!
//! Each domain gets its own structured error enum so callers can render a
//! specific user-facing message instead of a generic failure.
//!
//! # Error Categories
//!
//! - **IngestError**: tabular file parsing (format dispatch, CSV/XLSX decode)
//! - **ChartError**: chart spec validation and series shaping
//! - **ChatError**: AI provider pass-through failures
//! - **ProjectError**: project aggregate operations (ownership, validation)

pub mod chart;
pub mod chat;
pub mod ingest;
pub mod project;

pub use chart::ChartError;
pub use chat::ChatError;
pub use ingest::IngestError;
pub use project::ProjectError;

/// Result type alias for file ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

/// Result type alias for chart validation and shaping
pub type ChartResult<T> = Result<T, ChartError>;

/// Result type alias for chat provider calls
pub type ChatResult<T> = Result<T, ChatError>;

/// Result type alias for project aggregate operations
pub type ProjectResult<T> = Result<T, ProjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_result_alias() {
        let result: IngestResult<()> = Err(IngestError::UnsupportedFormat {
            extension: "pdf".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_chart_result_alias() {
        let result: ChartResult<i32> = Err(ChartError::UnknownKind("donut".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_chat_result_alias() {
        let result: ChatResult<String> = Err(ChatError::Upstream("timeout".to_string()));
        assert!(result.is_err());
    }
}
