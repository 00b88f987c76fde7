use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed key or alphabet.
    #[error("Validation Error: {0}")]
    Validation(String),

    /// Unsupported alphabet size or out-of-range search parameter.
    #[error("Configuration Error: {0}")]
    Configuration(String),

    /// Text too short to be scored.
    #[error("Input Error: {0}")]
    Input(String),

    /// Quadgram table missing, truncated or structurally invalid.
    #[error("Model Error: {0}")]
    Model(String),
}

pub type SfResult<T> = Result<T, SubForgeError>;
