use thiserror::Error;

/// Errors raised while validating a chart spec or shaping its series.
///
/// Validation reports the first failing rule with the offending field so the
/// client can point the user at the exact selection to fix.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unknown chart kind '{0}'")]
    UnknownKind(String),

    /// Kinds that are declared but have no renderer yet.
    #[error("chart kind '{0}' is not supported: no renderer is implemented for it")]
    UnsupportedKind(String),

    #[error("{field} is required for {kind} charts")]
    MissingField { field: &'static str, kind: String },

    #[error("{field} references column '{column}', which does not exist in this dataset")]
    UnknownColumn { field: &'static str, column: String },

    /// Every row was missing the selected column; nothing to render.
    #[error("column '{column}' has no values to chart")]
    EmptySeries { column: String },
}
