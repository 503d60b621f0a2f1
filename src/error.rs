/// Failures of the export pipeline.
///
/// Parsing and layout are total; only document encoding and I/O can fail.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unknown export format: {0:?} (expected \"docx\" or \"pdf\")")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
