//! Crate-wide error types.

use thiserror::Error;

pub type LineviewResult<T> = Result<T, LineviewError>;

#[derive(Debug, Error)]
pub enum LineviewError {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("render error: {0}")]
    Render(String),
}
