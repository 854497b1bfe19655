//! # Infrastructure Layer - SIA
//!
//! Adapters and cross-cutting concerns behind the domain's port traits,
//! plus the composition root that wires the application services.
//!
//! ## Module Categories
//!
//! ### Security & Authentication
//! | Module | Description |
//! |--------|-------------|
//! | [`crypto`] | SHA-256 credential digest with constant-time verify |
//! | [`auth`] | HS256 JWT issuance and verification |
//!
//! ### Data & Storage
//! | Module | Description |
//! |--------|-------------|
//! | [`storage`] | Single-lock in-memory implementation of every store port |
//!
//! ### Configuration & Wiring
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment-based loading: defaults, TOML file, environment |
//! | [`constants`] | Environment names and configuration limits |
//! | [`bootstrap`] | Composition root assembling the [`AppContext`] |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |

/// JWT token issuing
pub mod auth;
/// Composition root
pub mod bootstrap;
/// Configuration loading and validation
pub mod config;
/// Environment names and configuration limits
pub mod constants;
/// Credential digest provider
pub mod crypto;
/// Structured logging initialization
pub mod logging;
/// Store adapters
pub mod storage;

pub use auth::JwtTokenIssuer;
pub use bootstrap::{AppContext, init_app, init_test_app};
pub use config::{AppConfig, ConfigLoader};
pub use crypto::Sha256CredentialHasher;
pub use storage::MemoryStore;
