use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookmeshError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search timed out after {0} seconds")]
    Timeout(u64),
}

pub type Result<T> = std::result::Result<T, BookmeshError>;
