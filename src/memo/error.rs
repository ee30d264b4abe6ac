use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cache invalid: {0}")]
    CacheInvalid(String),

    #[error("Remote {operation} failed with status {status}: {body}")]
    Remote {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Nothing staged at {filename}[{index}]")]
    NotStaged { filename: String, index: usize },

    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Store error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MemoError {
    /// True for failures coming from the remote repository (transport or status).
    pub fn is_remote(&self) -> bool {
        matches!(self, MemoError::Remote { .. } | MemoError::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, MemoError>;
