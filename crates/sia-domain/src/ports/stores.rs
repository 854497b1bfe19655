//! Store ports
//!
//! One trait per entity family. Adapters back all of them over a single
//! transactional backend, which is what makes the compound contracts
//! below (insert-if-absent, role+permissions in one unit, reference
//! checks on deactivation) implementable without check-then-act races:
//! each uniqueness-sensitive method is one critical section inside the
//! adapter, and a store-level violation is authoritative over any earlier
//! application-level existence check.

use crate::entities::{
    AuditEvent, Course, Enrollment, EnrollmentStatus, Grade, Permission, Role, TeacherAssignment,
    User,
};
use crate::error::Result;
use crate::value_objects::{AuditFilter, AuditStatistics, Page, PageRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// User records. Owns credential hashes; nothing above the authenticator
/// reads them.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Lookup by id, active or not
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Login lookup: active users only
    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lookup by email regardless of activity, for internal diagnostics
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Insert with the id assigned by the store. Fails with `DuplicateKey`
    /// when the email or identification collides with any existing user,
    /// active or inactive.
    async fn insert(&self, user: User) -> Result<User>;

    /// Full-row update of name, email, identification, and role. Same
    /// uniqueness rules as insert, excluding the row itself.
    async fn update(&self, user: &User) -> Result<()>;

    /// Single-field credential replacement
    async fn update_credential(&self, id: i64, credential_hash: &str) -> Result<()>;

    /// Single-field last-access write; last writer wins
    async fn touch_last_access(&self, id: i64, when: DateTime<Utc>) -> Result<()>;

    /// Flip the soft-delete flag
    async fn set_active(&self, id: i64, active: bool) -> Result<()>;

    /// Active users currently referencing a role
    async fn count_active_with_role(&self, role_id: i64) -> Result<u64>;

    /// All active users
    async fn list_active(&self) -> Result<Vec<User>>;
}

/// Roles and their permission associations. The permission-set version
/// increases inside the same critical section as any mutation of the
/// set, which is what the resolver cache keys on.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Lookup by id, active or not
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>>;

    /// Lookup by name among active roles
    async fn find_active_by_name(&self, name: &str) -> Result<Option<Role>>;

    /// All active roles
    async fn list_active(&self) -> Result<Vec<Role>>;

    /// Insert the role and its associations as one unit. Fails with
    /// `DuplicateName` when an active role already carries the name; on
    /// failure no association is visible.
    async fn insert_with_permissions(&self, role: Role, permission_ids: &[i64]) -> Result<Role>;

    /// Rename/redescribe and replace the whole permission set as one
    /// unit (full replace, not a diff). Fails with `DuplicateName` when
    /// renaming onto another active role. Bumps the permission-set
    /// version.
    async fn update_with_permissions(
        &self,
        role_id: i64,
        name: &str,
        description: &str,
        permission_ids: &[i64],
    ) -> Result<()>;

    /// Soft-delete. Fails with `RoleInUse` while any active user still
    /// references the role; the check and the flip are one unit.
    async fn deactivate(&self, role_id: i64) -> Result<()>;

    /// Current association rows for a role
    async fn permission_ids(&self, role_id: i64) -> Result<Vec<i64>>;

    /// Current permission-set version for a role
    async fn permission_version(&self, role_id: i64) -> Result<u64>;
}

/// Permission catalog
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Lookup by id
    async fn find_by_id(&self, id: i64) -> Result<Option<Permission>>;

    /// Bulk lookup preserving only ids that exist
    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Permission>>;

    /// Active permissions ordered by (module, name)
    async fn list_active(&self) -> Result<Vec<Permission>>;

    /// Insert with the id assigned by the store. Fails with
    /// `DuplicateKey` when the (name, module) pair exists.
    async fn insert(&self, permission: Permission) -> Result<Permission>;

    /// Flip the soft-delete flag
    async fn set_active(&self, id: i64, active: bool) -> Result<()>;
}

/// Append-only audit trail. Deliberately exposes no update or delete;
/// immutability is structural, not a convention.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append one event, assigning its id. The timestamp arrives already
    /// stamped by the recorder.
    async fn append(&self, event: AuditEvent) -> Result<AuditEvent>;

    /// Lookup by id
    async fn find_by_id(&self, id: i64) -> Result<Option<AuditEvent>>;

    /// Page ordered by timestamp descending
    async fn list(&self, page: PageRequest) -> Result<Page<AuditEvent>>;

    /// Filtered page, same ordering. The actor criterion is matched
    /// against the acting user's display name and email, which the
    /// adapter resolves against its user records.
    async fn search(&self, filter: &AuditFilter, page: PageRequest) -> Result<Page<AuditEvent>>;

    /// Sorted distinct module values
    async fn distinct_modules(&self) -> Result<Vec<String>>;

    /// Sorted distinct action values
    async fn distinct_actions(&self) -> Result<Vec<String>>;

    /// Aggregate counts with calendar windows anchored at `reference`
    async fn statistics(&self, reference: DateTime<Utc>) -> Result<AuditStatistics>;
}

/// Course catalog
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Lookup by id, active or not
    async fn find_by_id(&self, id: i64) -> Result<Option<Course>>;

    /// Insert with the id assigned by the store. Fails with
    /// `DuplicateKey` when the code collides with any course.
    async fn insert(&self, course: Course) -> Result<Course>;

    /// Full-row update; code uniqueness excluding the row itself
    async fn update(&self, course: &Course) -> Result<()>;

    /// Flip the soft-delete flag
    async fn set_active(&self, id: i64, active: bool) -> Result<()>;

    /// All active courses
    async fn list_active(&self) -> Result<Vec<Course>>;
}

/// Teacher-course assignments
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Insert with the id assigned by the store. Fails with
    /// `DuplicateKey` when an active assignment for the same (course,
    /// teacher) pair exists.
    async fn insert(&self, assignment: TeacherAssignment) -> Result<TeacherAssignment>;

    /// Active assignment for a (course, teacher) pair
    async fn find_active(
        &self,
        course_id: i64,
        teacher_id: i64,
    ) -> Result<Option<TeacherAssignment>>;

    /// Soft-delete one assignment row
    async fn deactivate(&self, id: i64) -> Result<()>;

    /// True when the teacher already holds an active assignment with this
    /// exact schedule on a different course
    async fn has_schedule_conflict(
        &self,
        teacher_id: i64,
        schedule: &str,
        exclude_course_id: i64,
    ) -> Result<bool>;

    /// Active assignments of a course
    async fn list_active_for_course(&self, course_id: i64) -> Result<Vec<TeacherAssignment>>;
}

/// Enrollments
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Insert with the id assigned by the store. Fails with
    /// `DuplicateKey` when the student already has an `Activo` enrollment
    /// in the course.
    async fn insert(&self, enrollment: Enrollment) -> Result<Enrollment>;

    /// The `Activo` enrollment for a (course, student) pair
    async fn find_active(&self, course_id: i64, student_id: i64) -> Result<Option<Enrollment>>;

    /// Update the lifecycle state of one enrollment row
    async fn set_status(&self, id: i64, status: EnrollmentStatus) -> Result<()>;

    /// Overwrite the computed final grade and passed flag on the
    /// enrollment for the pair, preferring the `Activo` row when several
    /// exist
    async fn set_final_grade(
        &self,
        student_id: i64,
        course_id: i64,
        final_grade: f64,
        passed: bool,
    ) -> Result<()>;

    /// All enrollments of a student, any state
    async fn list_for_student(&self, student_id: i64) -> Result<Vec<Enrollment>>;

    /// Active enrollments of a course
    async fn list_active_for_course(&self, course_id: i64) -> Result<Vec<Enrollment>>;

    /// True when any enrollment row, in any state, references the course
    async fn any_for_course(&self, course_id: i64) -> Result<bool>;

    /// True when an `Activo` enrollment references the course
    async fn any_active_for_course(&self, course_id: i64) -> Result<bool>;
}

/// Component grades
#[async_trait]
pub trait GradeStore: Send + Sync {
    /// Insert with the id assigned by the store
    async fn insert(&self, grade: Grade) -> Result<Grade>;

    /// All components of a (student, course) pair, insertion order
    async fn list_for_pair(&self, student_id: i64, course_id: i64) -> Result<Vec<Grade>>;

    /// All grades of a student, newest first
    async fn list_for_student(&self, student_id: i64) -> Result<Vec<Grade>>;
}
