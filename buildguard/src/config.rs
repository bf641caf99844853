//! Engine configuration
//!
//! Every tunable constant of the engine lives here as a named default. A JSON
//! file may override any subset of fields; omitted fields keep their
//! defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::BuildGuardError;

/// Motherboard 50 W + memory 10 W + storage 5 W + fans/cooler 20 W
pub const DEFAULT_OVERHEAD_W: u32 = 85;
/// Below this margin (%) the supply is "Thin"
pub const DEFAULT_THIN_MARGIN_PCT: f64 = 10.0;
/// Below this margin (%) the supply is "Low"
pub const DEFAULT_LOW_MARGIN_PCT: f64 = 20.0;

pub const DEFAULT_ARBITER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_CONCURRENT_ARBITRATIONS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Fixed draw added for everything except CPU and GPU
    pub overhead_w: u32,
    pub thin_margin_pct: f64,
    pub low_margin_pct: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            overhead_w: DEFAULT_OVERHEAD_W,
            thin_margin_pct: DEFAULT_THIN_MARGIN_PCT,
            low_margin_pct: DEFAULT_LOW_MARGIN_PCT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// When false, uncertain findings are always demoted to warnings
    pub enabled: bool,
    /// "openai" or "ollama"
    pub preferred_provider: String,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    /// In-flight arbiter requests allowed across a batch
    pub max_concurrent: usize,
    /// Extra attempts after a failed request; the request is side-effect free
    pub max_retries: u32,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            preferred_provider: "openai".to_string(),
            model: None,
            base_url: None,
            timeout_secs: DEFAULT_ARBITER_TIMEOUT_SECS,
            max_concurrent: DEFAULT_MAX_CONCURRENT_ARBITRATIONS,
            max_retries: 0,
        }
    }
}

impl ArbiterConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub power: PowerConfig,
    pub arbiter: ArbiterConfig,
    /// Directory of JSON tables overriding the embedded catalog
    pub catalog_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Load and validate a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self, BuildGuardError> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| BuildGuardError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BuildGuardError> {
        let p = &self.power;
        if !(p.thin_margin_pct >= 0.0 && p.thin_margin_pct < p.low_margin_pct) {
            return Err(BuildGuardError::Config(format!(
                "margin thresholds must satisfy 0 <= thin ({}) < low ({})",
                p.thin_margin_pct, p.low_margin_pct
            )));
        }
        if self.arbiter.max_concurrent == 0 {
            return Err(BuildGuardError::Config(
                "arbiter.max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.arbiter.timeout_secs == 0 {
            return Err(BuildGuardError::Config(
                "arbiter.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
