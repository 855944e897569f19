use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::allocation::AllocationThresholds;
use crate::scoring::{MatchWeights, WeightPreset};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub weights: MatchWeights,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub allocation: AllocationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankingConfig {
    /// Lowest score an opportunity may have to be recommended.
    #[serde(default = "default_min_score")]
    pub min_score: u8,
    /// Shortlist size per profile for recommendations.
    #[serde(default = "default_top")]
    pub top: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationConfig {
    #[serde(default = "default_pending_threshold")]
    pub pending_threshold: u8,
    #[serde(default = "default_waitlist_threshold")]
    pub waitlist_threshold: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    /// `builtin`, `generated`, or a path to a catalog JSON file.
    #[serde(default = "default_catalog_source")]
    pub source: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_generated_profiles")]
    pub profiles: usize,
    #[serde(default = "default_generated_opportunities")]
    pub opportunities: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub preset: Option<WeightPreset>,
    pub catalog_source: Option<String>,
    pub seed: Option<u64>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/internship-matcher/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(preset) = overrides.preset {
            self.weights = preset.weights();
        }
        if let Some(source) = overrides.catalog_source {
            self.catalog.source = source;
        }
        if let Some(seed) = overrides.seed {
            self.catalog.seed = seed;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn thresholds(&self) -> AllocationThresholds {
        AllocationThresholds {
            pending: self.allocation.pending_threshold,
            waitlist: self.allocation.waitlist_threshold,
        }
    }

    pub fn default_template() -> String {
        let template = r#"# Relative weights; rescaled so a perfect match scores 100.
[weights]
skills = 50.0
cgpa = 25.0
location = 15.0
domain = 10.0

[ranking]
min_score = 40
top = 3

[allocation]
pending_threshold = 70
waitlist_threshold = 50

[catalog]
# builtin | generated | /path/to/catalog.json
source = "builtin"
seed = 42
profiles = 50
opportunities = 30

[server]
host = "127.0.0.1"
port = 3001

[logging]
level = "info"
"#;
        template.to_string()
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            top: default_top(),
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            pending_threshold: default_pending_threshold(),
            waitlist_threshold: default_waitlist_threshold(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_catalog_source(),
            seed: default_seed(),
            profiles: default_generated_profiles(),
            opportunities: default_generated_opportunities(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_min_score() -> u8 {
    40
}

fn default_top() -> usize {
    3
}

fn default_pending_threshold() -> u8 {
    70
}

fn default_waitlist_threshold() -> u8 {
    50
}

fn default_catalog_source() -> String {
    "builtin".to_string()
}

fn default_seed() -> u64 {
    42
}

fn default_generated_profiles() -> usize {
    50
}

fn default_generated_opportunities() -> usize {
    30
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}
