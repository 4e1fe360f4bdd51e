use nutrilog_core::MealTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_EDAMAM_URL: &str = "https://api.edamam.com/api/food-database/v2/parser";

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Food lookup (Edamam) credentials
#[derive(Debug, Clone, Serialize)]
pub struct EdamamConfig {
    pub app_id: ConfigValue<Option<String>>,
    /// Never printed by `config show`
    #[serde(skip_serializing)]
    pub app_key: ConfigValue<Option<String>>,
    pub base_url: ConfigValue<String>,
}

impl Default for EdamamConfig {
    fn default() -> Self {
        Self {
            app_id: ConfigValue::new(None, ConfigSource::Default),
            app_key: ConfigValue::new(None, ConfigSource::Default),
            base_url: ConfigValue::new(DEFAULT_EDAMAM_URL.to_string(), ConfigSource::Default),
        }
    }
}

impl EdamamConfig {
    /// Returns true if both app_id and app_key are set
    pub fn is_configured(&self) -> bool {
        self.app_id.value.is_some() && self.app_key.value.is_some()
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: ConfigValue<PathBuf>,
    /// Meal used when a command does not name one
    pub default_meal: ConfigValue<MealTime>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub edamam: EdamamConfig,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    default_meal: Option<MealTime>,
    edamam: EdamamFile,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct EdamamFile {
    app_id: Option<String>,
    app_key: Option<String>,
    base_url: Option<String>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let default_db_path = Self::default_data_dir().join("nutrilog.db");

        // Start with defaults
        let mut database_path = ConfigValue::new(default_db_path, ConfigSource::Default);
        let mut default_meal = ConfigValue::new(MealTime::default(), ConfigSource::Default);
        let mut config_file = None;
        let mut edamam = EdamamConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(db_path) = file_config.database_path {
                // Resolve relative paths against config file's directory
                let resolved_path = if db_path.is_relative() {
                    path.parent().map(|p| p.join(&db_path)).unwrap_or(db_path)
                } else {
                    db_path
                };
                database_path = ConfigValue::new(resolved_path, ConfigSource::File);
            }
            if let Some(meal) = file_config.default_meal {
                default_meal = ConfigValue::new(meal, ConfigSource::File);
            }
            if let Some(app_id) = file_config.edamam.app_id {
                edamam.app_id = ConfigValue::new(Some(app_id), ConfigSource::File);
            }
            if let Some(app_key) = file_config.edamam.app_key {
                edamam.app_key = ConfigValue::new(Some(app_key), ConfigSource::File);
            }
            if let Some(url) = file_config.edamam.base_url {
                edamam.base_url = ConfigValue::new(url, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("NUTRILOG_DATABASE_PATH") {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(meal) = std::env::var("NUTRILOG_DEFAULT_MEAL") {
            let parsed = meal.parse().map_err(ConfigError::InvalidValue)?;
            default_meal = ConfigValue::new(parsed, ConfigSource::Environment);
        }
        if let Ok(app_id) = std::env::var("NUTRILOG_EDAMAM_APP_ID") {
            edamam.app_id = ConfigValue::new(Some(app_id), ConfigSource::Environment);
        }
        if let Ok(app_key) = std::env::var("NUTRILOG_EDAMAM_APP_KEY") {
            edamam.app_key = ConfigValue::new(Some(app_key), ConfigSource::Environment);
        }
        if let Ok(url) = std::env::var("NUTRILOG_EDAMAM_URL") {
            edamam.base_url = ConfigValue::new(url, ConfigSource::Environment);
        }

        Ok(Self {
            database_path,
            default_meal,
            config_file,
            edamam,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/nutrilog/
    /// - macOS: ~/Library/Application Support/nutrilog/
    /// - Windows: %APPDATA%/nutrilog/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nutrilog")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/nutrilog/
    /// - macOS: ~/Library/Application Support/nutrilog/
    /// - Windows: %APPDATA%/nutrilog/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nutrilog")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
