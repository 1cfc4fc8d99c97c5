use crate::error::{OrchardError, Result};
use crate::models::{default_apple_stages, EngineThresholds, PhenologyStage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: EngineThresholds,
    pub phenology: PhenologyConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageSourceKind {
    /// Built-in BBCH apple table
    #[default]
    Builtin,
    /// `phenology.stages` from this file
    Config,
    /// SQLite store filled by `orchardops import-stages`
    Database,
}

impl StageSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageSourceKind::Builtin => "builtin",
            StageSourceKind::Config => "config",
            StageSourceKind::Database => "database",
        }
    }
}

impl std::fmt::Display for StageSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PhenologyConfig {
    pub source: StageSourceKind,
    pub stages: Vec<PhenologyStage>,
}

impl PhenologyConfig {
    /// The in-memory table for the builtin and config sources.
    pub fn static_stages(&self) -> Vec<PhenologyStage> {
        match self.source {
            StageSourceKind::Config => self.stages.clone(),
            _ => default_apple_stages(),
        }
    }
}

impl Config {
    /// Load the config file, or fall back to defaults when none exists.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(OrchardError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .map_err(|e| OrchardError::Config(format!("Failed to read config: {}", e)))?;

        // Substitute environment variables
        let config_str = Self::substitute_env_vars(&config_str)?;

        let config: Config = serde_yaml::from_str(&config_str)
            .map_err(|e| OrchardError::Config(format!("Failed to parse config: {}", e)))?;

        config.thresholds.validate().map_err(OrchardError::Config)?;
        if config.phenology.source == StageSourceKind::Config && config.phenology.stages.is_empty()
        {
            tracing::warn!("phenology.source is 'config' but phenology.stages is empty");
        }

        tracing::debug!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Try XDG config directory
        dirs::config_dir()
            .map(|dir| dir.join("orchardops").join("config.yaml"))
            .filter(|p| p.exists())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| OrchardError::Config(format!("Bad substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        // Then check env var
        if let Ok(dir) = std::env::var("ORCHARDOPS_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        // Use XDG data directory
        let data_dir = dirs::data_dir()
            .ok_or_else(|| OrchardError::Config("Cannot determine data directory".into()))?
            .join("orchardops");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("orchardops.db"))
    }
}

/// Read a stage list from a YAML or JSON file, chosen by extension.
pub fn load_stage_file(path: &Path) -> Result<Vec<PhenologyStage>> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let stages = if is_json {
        serde_json::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(stages)
}
