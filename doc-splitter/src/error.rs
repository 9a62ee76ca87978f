#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("unsupported file type: {0} (expected .docx or .odt)")]
    UnsupportedFormat(String),
    #[error("error reading document: {0}")]
    Read(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("export error: {0}")]
    Export(String),
}

impl DocError {
    pub(crate) fn read(e: impl std::fmt::Display) -> Self {
        DocError::Read(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DocError>;
