//! Coupler configuration with documented defaults
//!
//! Everything the coupler needs to know beyond the project id lives here.
//! Values come from `Default`, an optional TOML file, and finally CLI flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::error::{CouplerError, Result};

/// How to treat shapes whose masks overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Later shapes overwrite earlier ones in resolver order
    #[default]
    LastWriteWins,
    /// Fail if two shapes mapped to different sources share a cell
    Reject,
}

/// Where and how column simulator output is read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrusConfig {
    /// File name of the water-balance output inside each instance directory
    pub output_file: String,

    /// Column holding cumulative bottom outflow
    ///
    /// The column is read as a running total; recharge is derived from
    /// its negated day-to-day differences.
    pub flux_column: String,
}

impl Default for HydrusConfig {
    fn default() -> Self {
        Self {
            output_file: "T_Level.out".into(),
            flux_column: "sum(vBot)".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouplerConfig {
    /// Root directory containing one sub-directory per project
    pub workspace: PathBuf,

    pub hydrus: HydrusConfig,

    pub overlap: OverlapPolicy,

    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for CouplerConfig {
    fn default() -> Self {
        Self {
            workspace: PathBuf::from("workspace"),
            hydrus: HydrusConfig::default(),
            overlap: OverlapPolicy::default(),
            log_filter: "recharge_coupler=info".into(),
        }
    }
}

impl CouplerConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CouplerConfig = toml::from_str(content)?;
        config.validate().map_err(CouplerError::InvalidConfig)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.hydrus.output_file.trim().is_empty() {
            return Err("hydrus.output_file must not be empty".into());
        }

        if self.hydrus.flux_column.trim().is_empty() {
            return Err("hydrus.flux_column must not be empty".into());
        }

        // Column names are matched against whitespace-split header tokens
        if self.hydrus.flux_column.contains(char::is_whitespace) {
            return Err(format!(
                "hydrus.flux_column ({:?}) cannot contain whitespace",
                self.hydrus.flux_column
            ));
        }

        Ok(())
    }
}
