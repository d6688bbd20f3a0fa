//! Contact model, configuration and input validation shared by the dupescope crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod validation;

pub use config::{EngineConfig, GroupingConfig, MatchingConfig, MergeConfig};
pub use error::{DupescopeError, ExitCode, Result};
pub use models::*;
pub use validation::{RejectedRecord, RejectionReason, ValidationReport, validate_records};
