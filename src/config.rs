use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for a `CorrectionEngine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorrectionConfig {
    /// Whether correction starts enabled.
    pub enabled: bool,
    /// Distance in metres within which a marker counts as lying on a polygon edge.
    pub edge_tolerance_m: f64,
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self { enabled: true, edge_tolerance_m: geoarc::DEFAULT_EDGE_TOLERANCE_M }
    }
}

impl CorrectionConfig {
    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse correction config")?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read correction config {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid correction config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.edge_tolerance_m.is_finite() || self.edge_tolerance_m < 0.0 {
            bail!("edge_tolerance_m must be finite and non-negative, got {}", self.edge_tolerance_m);
        }
        Ok(())
    }
}
