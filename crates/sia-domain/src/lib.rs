//! Domain Layer - SIA
//!
//! Core types of the academic-records identity, access-control, and
//! audit system: entities, value objects, the error taxonomy, and the
//! port traits that the application layer consumes and the
//! infrastructure layer implements.
//!
//! ## Architecture
//!
//! This crate has no I/O and no framework types. It defines:
//! - Entities: users, roles, permissions, audit events, and the academic
//!   records (courses, assignments, enrollments, grades)
//! - Value objects: request context, token claims, pagination, audit
//!   search contracts
//! - Ports: store traits (persistence boundary) and provider traits
//!   (credential digest, bearer tokens)

/// Domain constants: audit vocabulary, sentinels, grading thresholds
pub mod constants;
/// Persistent records with identity
pub mod entities;
/// Error taxonomy and `Result` alias
pub mod error;
/// Boundary contracts implemented by the infrastructure layer
pub mod ports;
/// Immutable values without identity
pub mod value_objects;

pub use entities::{
    AuditAction, AuditEvent, Course, Enrollment, EnrollmentStatus, Grade, Permission, Role,
    RolePermission, TeacherAssignment, User,
};
pub use error::{Error, Result};
pub use value_objects::{
    AuditFilter, AuditStatistics, CountBucket, IssuedToken, Page, PageRequest, RequestContext,
    TokenClaims,
};
