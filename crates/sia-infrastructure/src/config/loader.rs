//! Configuration loader
//!
//! Loads configuration from layered sources: serialized defaults, an
//! optional TOML file and prefixed environment variables.

use crate::config::AppConfig;
use crate::constants::{CONFIG_ENV_PREFIX, CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE};
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use sia_domain::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML file: the explicit path, else `$SIA_CONFIG`, else
    ///    `config/default.toml`
    /// 3. Environment variables with prefix and `__` section splitting
    ///    (e.g. `SIA_AUTH__JWT__SECRET`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = self.resolve_config_path() {
            if config_path.exists() {
                figment = figment.merge(Toml::file(&config_path));
                log_config_loaded(&config_path, true);
            } else if self.config_path.is_some() {
                // Only a path the caller asked for is worth a warning
                log_config_loaded(&config_path, false);
            }
        }

        figment = figment.merge(Env::prefixed(&format!("{}_", self.env_prefix)).split("__"));

        let app_config: AppConfig = figment
            .extract()
            .map_err(|e| Error::configuration_with_source("Failed to extract configuration", e))?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// The file to try: explicit path, `$SIA_CONFIG`, or the default
    /// location
    fn resolve_config_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            return Some(path.clone());
        }
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Some(PathBuf::from(path));
        }
        Some(PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_auth_config(config)?;
    validate_logging_config(config)?;
    Ok(())
}

fn validate_auth_config(config: &AppConfig) -> Result<()> {
    let jwt = &config.auth.jwt;
    // An empty secret is tolerated here; token issuance refuses it.
    // A configured-but-weak secret is a hard error.
    if !jwt.secret.is_empty() && jwt.secret.len() < crate::constants::JWT_MIN_SECRET_LEN {
        return Err(Error::configuration(
            "auth.jwt.secret must be at least 32 bytes long",
        ));
    }
    if jwt.issuer.is_empty() {
        return Err(Error::configuration("auth.jwt.issuer cannot be empty"));
    }
    if jwt.audience.is_empty() {
        return Err(Error::configuration("auth.jwt.audience cannot be empty"));
    }
    if jwt.expiry_minutes <= 0 {
        return Err(Error::configuration(
            "auth.jwt.expiry_minutes must be greater than 0",
        ));
    }
    Ok(())
}

fn validate_logging_config(config: &AppConfig) -> Result<()> {
    parse_log_level(&config.logging.level)?;
    Ok(())
}
