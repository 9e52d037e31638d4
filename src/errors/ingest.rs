use thiserror::Error;

/// Errors raised while converting an uploaded file into rows and columns.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The filename extension is not one of the accepted formats.
    #[error("unsupported file format '.{extension}': only csv, xlsx and xls files are accepted")]
    UnsupportedFormat { extension: String },

    /// The extension was recognized but the content could not be decoded.
    #[error("failed to parse {format} file: {message}")]
    Parse { format: String, message: String },

    /// The upload exceeds the configured size limit.
    #[error("file is {size} bytes, which exceeds the {max} byte upload limit")]
    TooLarge { size: usize, max: usize },
}

impl IngestError {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }
}
