use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DupescopeError, Result};
use crate::models::{ConfidenceClass, MergeStrategy};

/// Engine configuration, loaded from `~/.config/dupescope/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub matching: MatchingConfig,
    pub grouping: GroupingConfig,
    pub merge: MergeConfig,
}

/// Knobs of the pairwise matcher and confidence aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum fuzzy name similarity counted as a fuzzy match.
    pub fuzzy_threshold: f64,
    /// Trailing digits kept as the loose phone key.
    pub phone_suffix_len: usize,
    /// Names shorter than this (in characters) never fuzzy-match. 0 disables.
    pub min_fuzzy_name_chars: usize,
    /// Skip emails whose local part is all digits when building match keys.
    pub ignore_numeric_emails: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingConfig {
    /// Minimum edge class retained when building groups.
    pub threshold: ConfidenceClass,
    /// Restrict comparisons to records sharing a blocking key.
    pub blocking: bool,
    /// Inputs at or below this size are compared exhaustively.
    pub full_scan_limit: usize,
    /// Pairs scored per parallel batch.
    pub batch_size: usize,
    /// Worker threads for scoring; 0 uses the rayon default.
    pub workers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    pub strategy: MergeStrategy,
}

// ─── Defaults ──────────────────────────────────────────────

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.85,
            phone_suffix_len: 7,
            min_fuzzy_name_chars: 0,
            ignore_numeric_emails: false,
        }
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            threshold: ConfidenceClass::Medium,
            blocking: true,
            full_scan_limit: 64,
            batch_size: 512,
            workers: 0,
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl EngineConfig {
    /// Standard config file path: `~/.config/dupescope/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("DUPESCOPE_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("dupescope")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load and validate config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let fuzzy = self.matching.fuzzy_threshold;
        if !(0.0..=1.0).contains(&fuzzy) {
            return Err(DupescopeError::ConfigError(format!(
                "matching.fuzzy_threshold must be within [0, 1], got {fuzzy}"
            )));
        }
        if self.matching.phone_suffix_len == 0 {
            return Err(DupescopeError::ConfigError(
                "matching.phone_suffix_len must be at least 1".to_string(),
            ));
        }
        if self.grouping.batch_size == 0 {
            return Err(DupescopeError::ConfigError(
                "grouping.batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
