//! Domain port interfaces
//!
//! Boundary contracts between the domain and external layers, following
//! the Dependency Inversion Principle: the traits are defined here, the
//! implementations live in the infrastructure layer.
//!
//! ## Organization
//!
//! - **stores** - persistence boundary, one trait per entity family
//! - **providers** - cryptographic collaborators (digest, tokens)

/// Cryptographic provider ports
pub mod providers;
/// Persistence boundary ports
pub mod stores;

pub use providers::{CredentialHasher, TokenIssuer};
pub use stores::{
    AssignmentStore, AuditStore, CourseStore, EnrollmentStore, GradeStore, PermissionStore,
    RoleStore, UserStore,
};
