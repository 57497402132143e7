use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "GRAMMARBOOK_FIRESTORE_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    pub firestore: FirestoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub formula_policy: FormulaPolicy,
    #[serde(default = "default_true")]
    pub pager: bool,
    /// Topic id expanded once the fetch settles
    #[serde(
        default,
        serialize_with = "crate::utils::format::serialize_option_string",
        deserialize_with = "crate::utils::format::deserialize_option_string"
    )]
    pub initial_topic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(
        default,
        serialize_with = "crate::utils::format::serialize_option_string",
        deserialize_with = "crate::utils::format::deserialize_option_string"
    )]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// How many formula detail blocks may be open at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormulaPolicy {
    /// At most one formula open across the whole tree
    #[default]
    Single,
    /// Each formula opens and closes independently
    Multi,
}

fn default_true() -> bool {
    true
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_collection() -> String {
    "topics".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_page_size() -> u32 {
    300
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color: true,
            formula_policy: FormulaPolicy::Single,
            pager: true,
            initial_topic: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            firestore: FirestoreConfig {
                project_id: "english-71f5a".to_string(),
                database: default_database(),
                collection: default_collection(),
                api_key: None,
                base_url: default_base_url(),
                page_size: default_page_size(),
                timeout_secs: default_timeout_secs(),
            },
        }
    }
}

impl FirestoreConfig {
    /// API key from config, falling back to the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        Self::load_custom(&Self::config_file_path())
    }

    pub fn ensure_config_exists() -> AppResult<()> {
        let config_path = Self::config_file_path();
        if !config_path.exists() {
            Config::default().save_to(&config_path)?;
        }
        Ok(())
    }

    pub fn load_custom(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save_to(config_path)?;
            return Ok(default_config);
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| AppError::Io(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        let store = &self.firestore;

        if store.project_id.trim().is_empty() {
            return Err(AppError::Config(
                "Firestore project_id cannot be empty".to_string(),
            ));
        }

        if store.collection.trim().is_empty() || store.collection.contains('/') {
            return Err(AppError::Config(format!(
                "Invalid collection name '{}'",
                store.collection
            )));
        }

        if !store.base_url.starts_with("http://") && !store.base_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "Firestore base_url must be an http(s) URL, got '{}'",
                store.base_url
            )));
        }

        if store.page_size == 0 {
            return Err(AppError::Config(
                "Firestore page_size must be greater than zero".to_string(),
            ));
        }

        if store.timeout_secs == 0 {
            return Err(AppError::Config(
                "Firestore timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn save(&self) -> AppResult<()> {
        self.save_to(&Self::config_file_path())
    }

    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Io(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content).map_err(|e| AppError::Io(e.to_string()))?;

        Ok(())
    }

    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("grammarbook")
            .join("config.toml")
    }
}
