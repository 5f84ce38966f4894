use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::{PathClassifier, AVRO_SUFFIX, DEFAULT_SUPERPARTITIONED_KEYS};
use crate::error::{HailgenError, Result};

const CONFIG_FILE: &str = "config.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# hailgen configuration file
# Location: ~/.hailgen/config.toml

[classify]
# Category keys whose Avro files are sharded into superpartitions
# (directories with a 1-based _NNN suffix, e.g. vets/vet_001/).
# Default: ["vets", "refs"]
superpartitioned_keys = ["vets", "refs"]

# File suffix that marks a listing line as an Avro export file.
# Default: ".avro"
avro_suffix = ".avro"
"#;

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub classify: ClassifyConfig,
}

/// Classification-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Category keys grouped per superpartition
    #[serde(default = "default_superpartitioned_keys")]
    pub superpartitioned_keys: Vec<String>,

    /// Recognized Avro file suffix
    #[serde(default = "default_avro_suffix")]
    pub avro_suffix: String,
}

fn default_superpartitioned_keys() -> Vec<String> {
    DEFAULT_SUPERPARTITIONED_KEYS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_avro_suffix() -> String {
    AVRO_SUFFIX.to_string()
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            superpartitioned_keys: default_superpartitioned_keys(),
            avro_suffix: default_avro_suffix(),
        }
    }
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content).map_err(|e| HailgenError::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config file with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "classify.superpartitioned_keys" => {
                Some(format!("{:?}", self.classify.superpartitioned_keys))
            }
            "classify.avro_suffix" => Some(self.classify.avro_suffix.clone()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "classify.superpartitioned_keys" => {
                self.classify.superpartitioned_keys = parse_string_list(value);
                Ok(())
            }
            "classify.avro_suffix" => {
                self.classify.avro_suffix = value.trim().to_string();
                Ok(())
            }
            _ => Err(HailgenError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            (
                "classify.superpartitioned_keys".to_string(),
                format!("{:?}", self.classify.superpartitioned_keys),
            ),
            (
                "classify.avro_suffix".to_string(),
                self.classify.avro_suffix.clone(),
            ),
        ]
    }

    /// Build a classifier from the configured category set and suffix
    pub fn to_classifier(&self) -> PathClassifier {
        PathClassifier::new(
            self.classify.superpartitioned_keys.clone(),
            self.classify.avro_suffix.clone(),
        )
    }
}

/// Parse a comma-separated or JSON-like list string
fn parse_string_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();

    // JSON array format: ["a", "b"]
    let inner = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    inner
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
