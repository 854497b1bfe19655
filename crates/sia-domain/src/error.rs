//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the SIA core
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication refusal. Unknown email, wrong password, and inactive
    /// account all map here with no distinguishing payload; the split is
    /// logged internally, never returned.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Valid identity, insufficient permission
    #[error("permission denied: {permission}")]
    Unauthorized {
        /// The permission the caller was missing
        permission: String,
    },

    /// An active record with the same unique name already exists
    #[error("duplicate name: {name}")]
    DuplicateName {
        /// The conflicting name
        name: String,
    },

    /// Unique-key violation (email, identification, course code, ...)
    #[error("duplicate key: {key}")]
    DuplicateKey {
        /// The conflicting key, formatted as `field=value`
        key: String,
    },

    /// Role deactivation blocked by active user references
    #[error("role in use: {name}")]
    RoleInUse {
        /// Name of the referenced role
        name: String,
    },

    /// Entity lookup by id came back empty
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. "usuario", "curso"
        entity: String,
        /// The id that was looked up
        id: i64,
    },

    /// Malformed or out-of-range input
    #[error("validation failed: {reason}")]
    ValidationFailed {
        /// Description of the rejected input
        reason: String,
    },

    /// JSON serialization error (snapshot payloads)
    #[error("JSON error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Store operation failure unrelated to any business rule
    #[error("storage error: {reason}")]
    Storage {
        /// Description of the storage failure
        reason: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration loading or validation error
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Token encoding or verification error
    #[error("token error: {message}")]
    Token {
        /// Description of the token error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

// Refusal constructors
impl Error {
    /// Create an unauthorized error for a missing permission
    pub fn unauthorized<S: Into<String>>(permission: S) -> Self {
        Self::Unauthorized {
            permission: permission.into(),
        }
    }

    /// Create a duplicate-name error
    pub fn duplicate_name<S: Into<String>>(name: S) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    /// Create a duplicate-key error; `key` reads best as `field=value`
    pub fn duplicate_key<S: Into<String>>(key: S) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    /// Create a role-in-use error
    pub fn role_in_use<S: Into<String>>(name: S) -> Self {
        Self::RoleInUse { name: name.into() }
    }

    /// Create a not-found error
    pub fn not_found<S: Into<String>>(entity: S, id: i64) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(reason: S) -> Self {
        Self::ValidationFailed {
            reason: reason.into(),
        }
    }
}

// Internal failure constructors
impl Error {
    /// Create a storage error
    pub fn storage<S: Into<String>>(reason: S) -> Self {
        Self::Storage {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a storage error with source
    pub fn storage_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        reason: S,
        source: E,
    ) -> Self {
        Self::Storage {
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a token error
    pub fn token<S: Into<String>>(message: S) -> Self {
        Self::Token {
            message: message.into(),
            source: None,
        }
    }

    /// Create a token error with source
    pub fn token_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Token {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl Error {
    /// True for either flavor of unique-constraint violation
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateName { .. } | Self::DuplicateKey { .. })
    }

    /// True when the error is a refusal the caller can act on, as opposed
    /// to an internal failure
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::Unauthorized { .. }
                | Self::DuplicateName { .. }
                | Self::DuplicateKey { .. }
                | Self::RoleInUse { .. }
                | Self::NotFound { .. }
                | Self::ValidationFailed { .. }
        )
    }
}
