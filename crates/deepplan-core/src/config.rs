use crate::error::{PlanError, Result};
use crate::paths;
use crate::plan::PhasePlanMerge;
use crate::qa::{HorizonPolicy, QaPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_IDEAS: usize = 10;
pub const MAX_DEADLINE_DAYS: i64 = 3650;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// PolicyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub phase_plan: PhasePlanMerge,
    #[serde(default)]
    pub horizon: HorizonPolicy,
}

impl PolicyConfig {
    pub fn qa(&self) -> QaPolicy {
        QaPolicy {
            horizon: self.horizon,
        }
    }
}

// ---------------------------------------------------------------------------
// IdeateConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeateConfig {
    #[serde(default = "default_count")]
    pub default_count: usize,
    /// Deadline offset used when an idea request names no deadline.
    #[serde(default = "default_deadline_days")]
    pub deadline_days: i64,
}

fn default_count() -> usize {
    5
}

fn default_deadline_days() -> i64 {
    14
}

impl Default for IdeateConfig {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            deadline_days: default_deadline_days(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub ideate: IdeateConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            policy: PolicyConfig::default(),
            ideate: IdeateConfig::default(),
        }
    }
}

impl Config {
    /// Load `.deepplan/config.yaml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = crate::io::read_file(&path)?;
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Config::default());
        }
        serde_yaml::from_slice(&data).map_err(|source| PlanError::CorruptConfig { path, source })
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.ideate.default_count == 0 || self.ideate.default_count > MAX_IDEAS {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "ideate.default_count {} is outside 1..={MAX_IDEAS} and will be clamped",
                    self.ideate.default_count
                ),
            });
        }

        if self.ideate.deadline_days <= 0 || self.ideate.deadline_days > MAX_DEADLINE_DAYS {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "ideate.deadline_days must be in 1..={MAX_DEADLINE_DAYS}, got {}",
                    self.ideate.deadline_days
                ),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
