use thiserror::Error;

use super::{ChartError, IngestError};

/// Errors surfaced by project aggregate operations.
///
/// `NotFound` covers both a missing project and one owned by another user;
/// callers cannot distinguish the two on purpose.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no project found with that ID")]
    NotFound,

    #[error("no chart found with that ID")]
    ChartNotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}
