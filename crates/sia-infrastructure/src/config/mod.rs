//! Configuration loading and types
//!
//! | Component | Description |
//! |-----------|-------------|
//! | `loader` | Layered figment loading with validation |
//! | `types` | Serde-backed configuration structures |

pub mod loader;
pub mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, AuthConfig, JwtConfig, LogFormat, LoggingConfig};
