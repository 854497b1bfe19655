//! Configuration types

use serde::{Deserialize, Serialize};

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret
    ///
    /// **REQUIRED** for token issuance. Configure via
    /// `SIA_AUTH__JWT__SECRET` or `auth.jwt.secret` in the config file.
    /// Must be at least 32 bytes.
    pub secret: String,

    /// `iss` claim stamped on every token and required on verification
    pub issuer: String,

    /// `aud` claim stamped on every token and required on verification
    pub audience: String,

    /// Token lifetime in minutes
    pub expiry_minutes: i64,
}

/// Returns default JWT configuration with:
/// - Empty secret (MUST be configured before issuing tokens)
/// - One-hour token lifetime
impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            // Empty by default; validation in loader.rs enforces
            // minimum 32 bytes
            secret: String::new(),
            issuer: "sia-core".to_string(),
            audience: "sia-clients".to_string(),
            expiry_minutes: 60,
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line human-readable output
    Compact,
    /// Structured JSON output
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
