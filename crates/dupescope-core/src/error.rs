use thiserror::Error;

/// All errors that can occur in dupescope-core.
#[derive(Debug, Error)]
pub enum DupescopeError {
    #[error("Contact not found: {0}")]
    ContactNotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Unknown confidence class: {0}")]
    UnknownConfidenceClass(String),

    #[error("Unknown merge strategy: {0}")]
    UnknownMergeStrategy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Exit codes used by the `dupescope` binary.
#[repr(i32)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    NotFound = 2,
}

pub type Result<T> = std::result::Result<T, DupescopeError>;
