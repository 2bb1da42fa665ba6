//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ScreenerError>;

impl ScreenerError {
    /// Fatal errors abort a screening run before any results are produced.
    /// Everything else is captured per-candidate and surfaced in the report.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScreenerError::EmptyInput(_)
                | ScreenerError::InvalidWeights(_)
                | ScreenerError::Configuration(_)
        )
    }
}

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ScreenerError {
    fn from(err: anyhow::Error) -> Self {
        ScreenerError::Extraction(err.to_string())
    }
}

/// Convert reqwest errors to our custom error type
impl From<reqwest::Error> for ScreenerError {
    fn from(err: reqwest::Error) -> Self {
        ScreenerError::OracleUnavailable(err.to_string())
    }
}
