//! Application services
//!
//! Construction order matters only in that the audit recorder and the
//! permission resolver are shared collaborators: build them first, hand
//! them to everything else as `Arc`s.

/// Audit trail recording and read contracts
pub mod audit;
/// Credential verification and token issuance
pub mod authenticator;
/// Course catalog and teacher assignments
pub mod catalog;
/// Enrollment lifecycle
pub mod enrollment;
/// Component grades and weighted final grades
pub mod gradebook;
/// Effective-permission resolution
pub mod resolver;
/// Role lifecycle and permission-set administration
pub mod role_admin;
/// User lifecycle administration
pub mod user_admin;
