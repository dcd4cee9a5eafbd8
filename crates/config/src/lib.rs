//! Configuration loading, validation, and management for codecritic.
//!
//! Loads configuration from `~/.codecritic/config.toml` with environment
//! variable overrides. Validates all settings at startup.
//!
//! The two model tiers carry their own settings: the orchestrator decides
//! which action to run next (temperature 0), the analyst produces the
//! structured reports inside action bodies (temperature 0.7). Credentials
//! are resolved here once and passed in explicitly; nothing downstream
//! reads the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.codecritic/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// API key for the model endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Maximum decision iterations before the run aborts
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Maximum tokens per model response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Settings for the decision-making model
    #[serde(default = "ModelSettings::orchestrator")]
    pub orchestrator: ModelSettings,

    /// Settings for the report-producing model used inside actions
    #[serde(default = "ModelSettings::analyst")]
    pub analyst: ModelSettings,
}

/// Model identifier plus sampling temperature for one tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    #[serde(default = "default_model")]
    pub model: String,

    pub temperature: f32,
}

impl ModelSettings {
    /// Defaults for the decision tier.
    pub fn orchestrator() -> Self {
        Self {
            model: default_model(),
            temperature: 0.0,
        }
    }

    /// Defaults for the analysis tier.
    pub fn analyst() -> Self {
        Self {
            model: default_model(),
            temperature: 0.7,
        }
    }
}

fn default_api_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_model() -> String {
    "llama3-70b-8192".into()
}
fn default_max_iterations() -> u32 {
    16
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ReviewConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("orchestrator", &self.orchestrator)
            .field("analyst", &self.analyst)
            .field("max_iterations", &self.max_iterations)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ReviewConfig {
    /// Load configuration from the default path (~/.codecritic/config.toml).
    ///
    /// Also checks environment variables:
    /// - `CODECRITIC_API_KEY` (highest priority), `GROQ_API_KEY`,
    ///   `OPENAI_API_KEY` for the credential
    /// - `CODECRITIC_API_URL` for the endpoint
    /// - `CODECRITIC_MODEL` for both model tiers
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("CODECRITIC_API_KEY")
                .ok()
                .or_else(|| std::env::var("GROQ_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(url) = std::env::var("CODECRITIC_API_URL") {
            config.api_url = url;
        }

        if let Ok(model) = std::env::var("CODECRITIC_MODEL") {
            config.orchestrator.model = model.clone();
            config.analyst.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".codecritic")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        for (tier, settings) in [("orchestrator", &self.orchestrator), ("analyst", &self.analyst)]
        {
            if settings.temperature < 0.0 || settings.temperature > 2.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{tier} temperature must be between 0.0 and 2.0"
                )));
            }
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            orchestrator: ModelSettings::orchestrator(),
            analyst: ModelSettings::analyst(),
            max_iterations: default_max_iterations(),
            max_tokens: None,
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = ReviewConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.orchestrator.model, "llama3-70b-8192");
        assert!(config.orchestrator.temperature.abs() < f32::EPSILON);
        assert!((config.analyst.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = ReviewConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ReviewConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api_url, config.api_url);
        assert_eq!(parsed.max_iterations, config.max_iterations);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = ReviewConfig {
            orchestrator: ModelSettings {
                model: default_model(),
                temperature: 5.0,
            },
            ..ReviewConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iterations_rejected() {
        let config = ReviewConfig {
            max_iterations: 0,
            ..ReviewConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = ReviewConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        let config = result.unwrap();
        assert_eq!(config.api_url, default_api_url());
    }

    #[test]
    fn tier_tables_parse() {
        let toml_str = r#"
api_url = "http://localhost:11434/v1"

[orchestrator]
model = "mixtral-8x7b-32768"
temperature = 0.0

[analyst]
model = "llama3-8b-8192"
temperature = 0.5
"#;
        let config: ReviewConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.orchestrator.model, "mixtral-8x7b-32768");
        assert_eq!(config.analyst.model, "llama3-8b-8192");
        assert!((config.analyst.temperature - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "max_iterations = \"lots\"").unwrap();

        let err = ReviewConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ReviewConfig {
            api_key: Some("gsk_super_secret".into()),
            ..ReviewConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_super_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = ReviewConfig::default_toml();
        assert!(toml_str.contains("groq"));
        assert!(toml_str.contains("llama3-70b-8192"));
    }
}
