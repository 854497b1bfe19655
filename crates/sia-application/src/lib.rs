//! Application Layer - SIA
//!
//! Application services for the academic-records core. This layer
//! orchestrates the domain through its port traits and carries no
//! infrastructure code: stores and cryptographic providers arrive as
//! `Arc<dyn Trait>` at construction time.
//!
//! ## Services
//!
//! Security core:
//! - [`AuthService`] - credential verification, token issuance, login and
//!   logout flows
//! - [`PermissionResolver`] - effective-permission resolution with a
//!   version-keyed cache
//! - [`RoleAdminService`] - role lifecycle and permission-set replacement
//! - [`AuditService`] - append-only trail recording and its read contracts
//!
//! Callers of the core:
//! - [`UserAdminService`] - user lifecycle
//! - [`CatalogService`] - courses and teacher assignments
//! - [`EnrollmentService`] - enrollment lifecycle
//! - [`GradebookService`] - component grades and the weighted final grade

pub mod services;

pub use services::audit::{AuditRecord, AuditService};
pub use services::authenticator::{AuthService, LoginOutcome, UserSummary};
pub use services::catalog::{AssignedTeacher, CatalogService, CourseDetail, CourseRequest};
pub use services::enrollment::{EnrollmentService, StudentCourse};
pub use services::gradebook::{
    GradeRequest, GradebookService, HistoryEntry, KindAverage, PerformanceSummary, RosterEntry,
    TermAverage,
};
pub use services::resolver::PermissionResolver;
pub use services::role_admin::{RoleAdminService, RoleDetail, RoleRequest};
pub use services::user_admin::{CreateUserRequest, UpdateUserRequest, UserAdminService};
