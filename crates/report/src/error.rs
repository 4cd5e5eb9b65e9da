use thiserror::Error;

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The output sink failed.
    #[error("I/O error while writing report: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be laid out.
    #[error("Layout error: {0}")]
    Layout(String),
}
