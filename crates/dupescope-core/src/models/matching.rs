use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DupescopeError;

/// Discretized match confidence, ordered from weakest to strongest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceClass {
    #[default]
    None,
    Low,
    Medium,
    High,
    Exact,
}

impl ConfidenceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceClass::None => "none",
            ConfidenceClass::Low => "low",
            ConfidenceClass::Medium => "medium",
            ConfidenceClass::High => "high",
            ConfidenceClass::Exact => "exact",
        }
    }
}

impl fmt::Display for ConfidenceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceClass {
    type Err = DupescopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ConfidenceClass::None),
            "low" => Ok(ConfidenceClass::Low),
            "medium" => Ok(ConfidenceClass::Medium),
            "high" => Ok(ConfidenceClass::High),
            "exact" => Ok(ConfidenceClass::Exact),
            _ => Err(DupescopeError::UnknownConfidenceClass(s.to_string())),
        }
    }
}

/// How a duplicate group is consolidated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Merge only groups whose every edge is HIGH or EXACT.
    #[default]
    Conservative,
    /// Always merge, preferring the most complete member's values.
    MostComplete,
    /// Propose a merge and flag every disagreeing field for confirmation.
    Interactive,
}

impl MergeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MergeStrategy::Conservative => "conservative",
            MergeStrategy::MostComplete => "most-complete",
            MergeStrategy::Interactive => "interactive",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = DupescopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(MergeStrategy::Conservative),
            "most-complete" | "most_complete" | "mostcomplete" => Ok(MergeStrategy::MostComplete),
            "interactive" => Ok(MergeStrategy::Interactive),
            _ => Err(DupescopeError::UnknownMergeStrategy(s.to_string())),
        }
    }
}
