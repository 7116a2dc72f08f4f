//! Configuration management for Crosscast

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Environment variable holding the Twitter access token
pub const TWITTER_TOKEN_ENV: &str = "CROSSCAST_TWITTER_TOKEN";
/// Environment variable holding the LinkedIn access token
pub const LINKEDIN_TOKEN_ENV: &str = "CROSSCAST_LINKEDIN_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub twitter: Option<TwitterConfig>,
    pub linkedin: Option<LinkedinConfig>,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterConfig {
    pub enabled: bool,
    pub token_file: Option<String>,
    pub api_url: Option<String>,
    pub upload_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedinConfig {
    pub enabled: bool,
    pub token_file: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub platforms: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            platforms: vec!["twitter".to_string(), "linkedin".to_string()],
        }
    }
}

impl TwitterConfig {
    /// Resolve the access token: environment first, then token file
    pub fn resolve_token(&self) -> Result<Option<SecretString>> {
        resolve_token(TWITTER_TOKEN_ENV, self.token_file.as_deref())
    }

    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| "https://api.twitter.com".to_string())
    }

    pub fn upload_url(&self) -> String {
        self.upload_url
            .clone()
            .unwrap_or_else(|| "https://upload.twitter.com".to_string())
    }
}

impl LinkedinConfig {
    /// Resolve the access token: environment first, then token file
    pub fn resolve_token(&self) -> Result<Option<SecretString>> {
        resolve_token(LINKEDIN_TOKEN_ENV, self.token_file.as_deref())
    }

    pub fn api_url(&self) -> String {
        self.api_url
            .clone()
            .unwrap_or_else(|| "https://api.linkedin.com".to_string())
    }
}

/// Read a token from the environment or a token file.
///
/// Tokens are opaque caller-supplied credentials; they are wrapped in
/// `SecretString` immediately and never written back out. Returns
/// `Ok(None)` when neither source is configured.
fn resolve_token(env_var: &str, token_file: Option<&str>) -> Result<Option<SecretString>> {
    if let Ok(token) = std::env::var(env_var) {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(Some(SecretString::from(token.to_string())));
        }
    }

    let Some(file) = token_file else {
        return Ok(None);
    };

    let path = shellexpand::full(file)
        .map_err(|e| ConfigError::MissingField(format!("token file path {}: {}", file, e)))?;
    let token = std::fs::read_to_string(path.as_ref())
        .map_err(ConfigError::ReadError)?
        .trim()
        .to_string();

    if token.is_empty() {
        return Err(ConfigError::MissingField(format!("token file {} is empty", file)).into());
    }

    Ok(Some(SecretString::from(token)))
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Load configuration, falling back to the default configuration when
    /// no config file exists (tokens then come from the environment)
    pub fn load_or_default() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Ok(Self::default_config())
        }
    }

    /// Create a default configuration
    pub fn default_config() -> Self {
        Self {
            twitter: Some(TwitterConfig {
                enabled: true,
                token_file: None,
                api_url: None,
                upload_url: None,
            }),
            linkedin: Some(LinkedinConfig {
                enabled: true,
                token_file: None,
                api_url: None,
            }),
            defaults: DefaultsConfig::default(),
        }
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CROSSCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("crosscast").join("config.toml"))
}
