//! Domain entities
//!
//! Persistent records with identity. Ids are store-assigned sequential
//! integers; an id of zero means "not yet inserted".
//!
//! | Entity | Description |
//! |--------|-------------|
//! | [`User`] | Identity record owning its credential hash |
//! | [`Role`] | Named permission grouping assigned to users |
//! | [`Permission`] | One granular capability scoped to a module |
//! | [`RolePermission`] | Role-permission association row |
//! | [`AuditEvent`] | Immutable record of one state-changing action |
//! | [`Course`] | Catalog entry with a globally unique code |
//! | [`TeacherAssignment`] | Active teacher-course link with a schedule |
//! | [`Enrollment`] | Student-course link carrying the final grade |
//! | [`Grade`] | One weighted component grade |

/// Academic catalog entities: courses, assignments, enrollments, grades
pub mod academic;
/// Audit trail entity and action vocabulary
pub mod audit;
/// Role, permission, and association entities
pub mod rbac;
/// User identity entity
pub mod user;

pub use academic::{Course, Enrollment, EnrollmentStatus, Grade, TeacherAssignment};
pub use audit::{AuditAction, AuditEvent};
pub use rbac::{Permission, Role, RolePermission};
pub use user::User;
