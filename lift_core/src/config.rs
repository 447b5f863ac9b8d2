//! Configuration file support for Lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`.

use crate::{Error, Result, WeightUnit};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub plates: PlatesConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub highlights: HighlightsConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Bar and plate inventory configuration
///
/// Empty plate lists fall back to the standard gym inventory for that unit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatesConfig {
    #[serde(default)]
    pub default_unit: WeightUnit,

    #[serde(default = "default_bar_lbs")]
    pub bar_lbs: f64,

    #[serde(default = "default_bar_kg")]
    pub bar_kg: f64,

    #[serde(default)]
    pub lbs: Vec<f64>,

    #[serde(default)]
    pub kg: Vec<f64>,
}

impl Default for PlatesConfig {
    fn default() -> Self {
        Self {
            default_unit: WeightUnit::default(),
            bar_lbs: default_bar_lbs(),
            bar_kg: default_bar_kg(),
            lbs: Vec::new(),
            kg: Vec::new(),
        }
    }
}

/// Extra keywords for barbell exercise classification
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub extra_barbell: Vec<String>,

    #[serde(default)]
    pub extra_excluded: Vec<String>,
}

/// Highlight engine parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HighlightsConfig {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default = "default_streak_limit")]
    pub streak_limit: usize,

    #[serde(default = "default_streak_gap_days")]
    pub streak_gap_days: i64,

    #[serde(default = "default_volume_threshold_percent")]
    pub volume_threshold_percent: f64,
}

impl Default for HighlightsConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            streak_limit: default_streak_limit(),
            streak_gap_days: default_streak_gap_days(),
            volume_threshold_percent: default_volume_threshold_percent(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("lift")
}

fn default_bar_lbs() -> f64 {
    WeightUnit::Lbs.standard_bar_weight()
}

fn default_bar_kg() -> f64 {
    WeightUnit::Kg.standard_bar_weight()
}

fn default_recent_limit() -> usize {
    10
}

fn default_streak_limit() -> usize {
    30
}

fn default_streak_gap_days() -> i64 {
    7
}

fn default_volume_threshold_percent() -> f64 {
    5.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("lift").join("config.toml")
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        for bar in [self.plates.bar_lbs, self.plates.bar_kg] {
            if !bar.is_finite() || bar < 0.0 {
                return Err(Error::Config(format!("invalid bar weight: {}", bar)));
            }
        }
        if !self.highlights.volume_threshold_percent.is_finite() {
            return Err(Error::Config("volume_threshold_percent must be a number".into()));
        }
        if self.highlights.recent_limit == 0 || self.highlights.streak_limit == 0 {
            return Err(Error::Config("history limits must be at least 1".into()));
        }
        if self.highlights.streak_gap_days < 0 {
            return Err(Error::Config("streak_gap_days must not be negative".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Path of the session journal inside the data directory
    pub fn journal_path(&self) -> PathBuf {
        self.data.data_dir.join("sessions.jsonl")
    }
}
