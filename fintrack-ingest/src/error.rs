use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported file type: {name} (supported: .ofx, .csv)")]
    UnsupportedFileType { name: String },

    #[error("invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
