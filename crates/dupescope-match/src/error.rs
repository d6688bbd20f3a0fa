use dupescope_core::DupescopeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid configuration: {0}")]
    Config(#[from] DupescopeError),

    #[error("detection cancelled")]
    Cancelled,

    #[error("thread pool error: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, MatchError>;
