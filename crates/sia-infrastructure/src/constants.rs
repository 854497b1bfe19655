//! Infrastructure layer constants
//!
//! Constants tied to the infrastructure implementation. Domain-level
//! constants live in `sia_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file path, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "SIA_CONFIG";

/// Environment variable prefix for configuration overrides
pub const CONFIG_ENV_PREFIX: &str = "SIA";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "SIA_LOG";

// ============================================================================
// AUTHENTICATION CONSTANTS
// ============================================================================

/// Minimum accepted JWT secret length in bytes
pub const JWT_MIN_SECRET_LEN: usize = 32;
