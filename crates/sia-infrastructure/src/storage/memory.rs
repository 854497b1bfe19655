//! In-memory storage adapter
//!
//! One adapter implements every store port over a single lock, so each
//! check-then-insert uniqueness rule runs as one critical section and
//! concurrent writers serialize exactly as they would against a
//! database unique constraint. No method holds the lock across an
//! await.
//!
//! String matching mirrors the collation the stored data grew up with:
//! emails, role names and course codes compare case-insensitively;
//! identifications and schedules compare exactly.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use parking_lot::RwLock;
use sia_domain::entities::{
    AuditEvent, Course, Enrollment, EnrollmentStatus, Grade, Permission, Role, RolePermission,
    TeacherAssignment, User,
};
use sia_domain::error::{Error, Result};
use sia_domain::ports::{
    AssignmentStore, AuditStore, CourseStore, EnrollmentStore, GradeStore, PermissionStore,
    RoleStore, UserStore,
};
use sia_domain::value_objects::{AuditFilter, AuditStatistics, CountBucket, Page, PageRequest};
use std::collections::HashMap;

/// Per-table id sequences
#[derive(Debug, Default)]
struct Sequences {
    users: i64,
    roles: i64,
    permissions: i64,
    events: i64,
    courses: i64,
    assignments: i64,
    enrollments: i64,
    grades: i64,
}

fn next_id(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

/// Every table plus the role permission-set versions, guarded together
#[derive(Debug, Default)]
struct Tables {
    seq: Sequences,
    users: Vec<User>,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    role_permissions: Vec<RolePermission>,
    role_versions: HashMap<i64, u64>,
    events: Vec<AuditEvent>,
    courses: Vec<Course>,
    assignments: Vec<TeacherAssignment>,
    enrollments: Vec<Enrollment>,
    grades: Vec<Grade>,
}

impl Tables {
    fn event_matches(&self, event: &AuditEvent, filter: &AuditFilter) -> bool {
        if let Some(actor) = &filter.actor {
            let needle = actor.to_lowercase();
            let matched = event
                .actor_id
                .and_then(|id| self.users.iter().find(|u| u.id == id))
                .is_some_and(|u| {
                    u.full_name.to_lowercase().contains(&needle)
                        || u.email.to_lowercase().contains(&needle)
                });
            if !matched {
                return false;
            }
        }
        if let Some(action) = &filter.action
            && !event.action.to_lowercase().contains(&action.to_lowercase())
        {
            return false;
        }
        if let Some(module) = &filter.module
            && event.module != *module
        {
            return false;
        }
        let date = event.timestamp.date_naive();
        if let Some(from) = filter.from
            && date < from
        {
            return false;
        }
        if let Some(to) = filter.to
            && date > to
        {
            return false;
        }
        true
    }
}

/// Shared in-memory store backing every port
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, id as the tie-breaker for equal timestamps
fn paginate(mut events: Vec<AuditEvent>, request: PageRequest) -> Page<AuditEvent> {
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
    let total = events.len() as u64;
    let items = events
        .into_iter()
        .skip(request.offset())
        .take(request.size as usize)
        .collect();
    Page::new(items, total, request)
}

fn count_buckets<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<CountBucket> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut buckets: Vec<CountBucket> = counts
        .into_iter()
        .map(|(key, count)| CountBucket {
            key: key.to_owned(),
            count,
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    buckets
}

/// The most recent Sunday on or before `date`
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// The first of the month of `date`
fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.inner.read().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .iter()
            .find(|u| u.active && u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .inner
            .read()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, mut user: User) -> Result<User> {
        let mut inner = self.inner.write();
        if inner
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(Error::duplicate_key(format!("correo={}", user.email)));
        }
        if !user.identification.is_empty()
            && inner
                .users
                .iter()
                .any(|u| u.identification == user.identification)
        {
            return Err(Error::duplicate_key(format!(
                "identificacion={}",
                user.identification
            )));
        }
        user.id = next_id(&mut inner.seq.users);
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<()> {
        let mut inner = self.inner.write();
        if inner
            .users
            .iter()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(Error::duplicate_key(format!("correo={}", user.email)));
        }
        if !user.identification.is_empty()
            && inner
                .users
                .iter()
                .any(|u| u.id != user.id && u.identification == user.identification)
        {
            return Err(Error::duplicate_key(format!(
                "identificacion={}",
                user.identification
            )));
        }
        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| Error::not_found("usuario", user.id))?;
        stored.full_name = user.full_name.clone();
        stored.email = user.email.clone();
        stored.identification = user.identification.clone();
        stored.role_id = user.role_id;
        Ok(())
    }

    async fn update_credential(&self, id: i64, credential_hash: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found("usuario", id))?;
        stored.credential_hash = credential_hash.to_owned();
        Ok(())
    }

    async fn touch_last_access(&self, id: i64, when: DateTime<Utc>) -> Result<()> {
        let mut inner = self.inner.write();
        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found("usuario", id))?;
        stored.last_access = Some(when);
        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<()> {
        let mut inner = self.inner.write();
        let stored = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| Error::not_found("usuario", id))?;
        stored.active = active;
        Ok(())
    }

    async fn count_active_with_role(&self, role_id: i64) -> Result<u64> {
        Ok(self
            .inner
            .read()
            .users
            .iter()
            .filter(|u| u.active && u.role_id == role_id)
            .count() as u64)
    }

    async fn list_active(&self) -> Result<Vec<User>> {
        Ok(self
            .inner
            .read()
            .users
            .iter()
            .filter(|u| u.active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>> {
        Ok(self.inner.read().roles.iter().find(|r| r.id == id).cloned())
    }

    async fn find_active_by_name(&self, name: &str) -> Result<Option<Role>> {
        Ok(self
            .inner
            .read()
            .roles
            .iter()
            .find(|r| r.active && r.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<Role>> {
        Ok(self
            .inner
            .read()
            .roles
            .iter()
            .filter(|r| r.active)
            .cloned()
            .collect())
    }

    async fn insert_with_permissions(
        &self,
        mut role: Role,
        permission_ids: &[i64],
    ) -> Result<Role> {
        let mut inner = self.inner.write();
        if inner
            .roles
            .iter()
            .any(|r| r.active && r.name.eq_ignore_ascii_case(&role.name))
        {
            return Err(Error::duplicate_name(role.name));
        }
        role.id = next_id(&mut inner.seq.roles);
        inner.roles.push(role.clone());
        for &permission_id in permission_ids {
            inner.role_permissions.push(RolePermission {
                role_id: role.id,
                permission_id,
            });
        }
        inner.role_versions.insert(role.id, 1);
        Ok(role)
    }

    async fn update_with_permissions(
        &self,
        role_id: i64,
        name: &str,
        description: &str,
        permission_ids: &[i64],
    ) -> Result<()> {
        let mut inner = self.inner.write();
        if inner
            .roles
            .iter()
            .any(|r| r.id != role_id && r.active && r.name.eq_ignore_ascii_case(name))
        {
            return Err(Error::duplicate_name(name));
        }
        let stored = inner
            .roles
            .iter_mut()
            .find(|r| r.id == role_id)
            .ok_or_else(|| Error::not_found("rol", role_id))?;
        stored.name = name.to_owned();
        stored.description = description.to_owned();
        inner.role_permissions.retain(|rp| rp.role_id != role_id);
        for &permission_id in permission_ids {
            inner.role_permissions.push(RolePermission {
                role_id,
                permission_id,
            });
        }
        *inner.role_versions.entry(role_id).or_insert(0) += 1;
        Ok(())
    }

    async fn deactivate(&self, role_id: i64) -> Result<()> {
        let mut inner = self.inner.write();
        let holders = inner
            .users
            .iter()
            .filter(|u| u.active && u.role_id == role_id)
            .count();
        let stored = inner
            .roles
            .iter_mut()
            .find(|r| r.id == role_id)
            .ok_or_else(|| Error::not_found("rol", role_id))?;
        if holders > 0 {
            return Err(Error::role_in_use(stored.name.clone()));
        }
        stored.active = false;
        Ok(())
    }

    async fn permission_ids(&self, role_id: i64) -> Result<Vec<i64>> {
        Ok(self
            .inner
            .read()
            .role_permissions
            .iter()
            .filter(|rp| rp.role_id == role_id)
            .map(|rp| rp.permission_id)
            .collect())
    }

    async fn permission_version(&self, role_id: i64) -> Result<u64> {
        Ok(self
            .inner
            .read()
            .role_versions
            .get(&role_id)
            .copied()
            .unwrap_or(0))
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Permission>> {
        Ok(self
            .inner
            .read()
            .permissions
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Permission>> {
        Ok(self
            .inner
            .read()
            .permissions
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_active(&self) -> Result<Vec<Permission>> {
        let mut permissions: Vec<Permission> = self
            .inner
            .read()
            .permissions
            .iter()
            .filter(|p| p.active)
            .cloned()
            .collect();
        permissions.sort_by(|a, b| a.module.cmp(&b.module).then_with(|| a.name.cmp(&b.name)));
        Ok(permissions)
    }

    async fn insert(&self, mut permission: Permission) -> Result<Permission> {
        let mut inner = self.inner.write();
        if inner
            .permissions
            .iter()
            .any(|p| p.name == permission.name && p.module == permission.module)
        {
            return Err(Error::duplicate_key(format!(
                "permiso={}/{}",
                permission.module, permission.name
            )));
        }
        permission.id = next_id(&mut inner.seq.permissions);
        inner.permissions.push(permission.clone());
        Ok(permission)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<()> {
        let mut inner = self.inner.write();
        let stored = inner
            .permissions
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found("permiso", id))?;
        stored.active = active;
        Ok(())
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn append(&self, mut event: AuditEvent) -> Result<AuditEvent> {
        let mut inner = self.inner.write();
        event.id = next_id(&mut inner.seq.events);
        inner.events.push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<AuditEvent>> {
        Ok(self
            .inner
            .read()
            .events
            .iter()
            .find(|e| e.id == id)
            .cloned())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<AuditEvent>> {
        Ok(paginate(self.inner.read().events.clone(), page))
    }

    async fn search(&self, filter: &AuditFilter, page: PageRequest) -> Result<Page<AuditEvent>> {
        let inner = self.inner.read();
        let matched: Vec<AuditEvent> = inner
            .events
            .iter()
            .filter(|e| inner.event_matches(e, filter))
            .cloned()
            .collect();
        Ok(paginate(matched, page))
    }

    async fn distinct_modules(&self) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let mut modules: Vec<String> = inner.events.iter().map(|e| e.module.clone()).collect();
        modules.sort();
        modules.dedup();
        Ok(modules)
    }

    async fn distinct_actions(&self) -> Result<Vec<String>> {
        let inner = self.inner.read();
        let mut actions: Vec<String> = inner.events.iter().map(|e| e.action.clone()).collect();
        actions.sort();
        actions.dedup();
        Ok(actions)
    }

    async fn statistics(&self, reference: DateTime<Utc>) -> Result<AuditStatistics> {
        let inner = self.inner.read();
        let today = reference.date_naive();
        let week = week_start(today);
        let month = month_start(today);

        let dates = || inner.events.iter().map(|e| e.timestamp.date_naive());
        Ok(AuditStatistics {
            total: inner.events.len() as u64,
            today: dates().filter(|d| *d >= today).count() as u64,
            this_week: dates().filter(|d| *d >= week).count() as u64,
            this_month: dates().filter(|d| *d >= month).count() as u64,
            by_module: count_buckets(inner.events.iter().map(|e| e.module.as_str())),
            by_action: count_buckets(inner.events.iter().map(|e| e.action.as_str())),
        })
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Course>> {
        Ok(self
            .inner
            .read()
            .courses
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn insert(&self, mut course: Course) -> Result<Course> {
        let mut inner = self.inner.write();
        if inner
            .courses
            .iter()
            .any(|c| c.code.eq_ignore_ascii_case(&course.code))
        {
            return Err(Error::duplicate_key(format!("codigo={}", course.code)));
        }
        course.id = next_id(&mut inner.seq.courses);
        inner.courses.push(course.clone());
        Ok(course)
    }

    async fn update(&self, course: &Course) -> Result<()> {
        let mut inner = self.inner.write();
        if inner
            .courses
            .iter()
            .any(|c| c.id != course.id && c.code.eq_ignore_ascii_case(&course.code))
        {
            return Err(Error::duplicate_key(format!("codigo={}", course.code)));
        }
        let stored = inner
            .courses
            .iter_mut()
            .find(|c| c.id == course.id)
            .ok_or_else(|| Error::not_found("curso", course.id))?;
        stored.code = course.code.clone();
        stored.name = course.name.clone();
        stored.description = course.description.clone();
        stored.credits = course.credits;
        stored.term = course.term.clone();
        stored.modified_at = course.modified_at;
        stored.modified_by = course.modified_by;
        Ok(())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<()> {
        let mut inner = self.inner.write();
        let stored = inner
            .courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found("curso", id))?;
        stored.active = active;
        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<Course>> {
        Ok(self
            .inner
            .read()
            .courses
            .iter()
            .filter(|c| c.active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn insert(&self, mut assignment: TeacherAssignment) -> Result<TeacherAssignment> {
        let mut inner = self.inner.write();
        if inner.assignments.iter().any(|a| {
            a.active && a.course_id == assignment.course_id && a.teacher_id == assignment.teacher_id
        }) {
            return Err(Error::duplicate_key(format!(
                "curso_docente={}/{}",
                assignment.course_id, assignment.teacher_id
            )));
        }
        assignment.id = next_id(&mut inner.seq.assignments);
        inner.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn find_active(
        &self,
        course_id: i64,
        teacher_id: i64,
    ) -> Result<Option<TeacherAssignment>> {
        Ok(self
            .inner
            .read()
            .assignments
            .iter()
            .find(|a| a.active && a.course_id == course_id && a.teacher_id == teacher_id)
            .cloned())
    }

    async fn deactivate(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write();
        let stored = inner
            .assignments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found("asignacion", id))?;
        stored.active = false;
        Ok(())
    }

    async fn has_schedule_conflict(
        &self,
        teacher_id: i64,
        schedule: &str,
        exclude_course_id: i64,
    ) -> Result<bool> {
        Ok(self.inner.read().assignments.iter().any(|a| {
            a.active
                && a.teacher_id == teacher_id
                && a.schedule == schedule
                && a.course_id != exclude_course_id
        }))
    }

    async fn list_active_for_course(&self, course_id: i64) -> Result<Vec<TeacherAssignment>> {
        Ok(self
            .inner
            .read()
            .assignments
            .iter()
            .filter(|a| a.active && a.course_id == course_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn insert(&self, mut enrollment: Enrollment) -> Result<Enrollment> {
        let mut inner = self.inner.write();
        if inner.enrollments.iter().any(|e| {
            e.status == EnrollmentStatus::Activo
                && e.course_id == enrollment.course_id
                && e.student_id == enrollment.student_id
        }) {
            return Err(Error::duplicate_key(format!(
                "inscripcion={}/{}",
                enrollment.course_id, enrollment.student_id
            )));
        }
        enrollment.id = next_id(&mut inner.seq.enrollments);
        inner.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn find_active(&self, course_id: i64, student_id: i64) -> Result<Option<Enrollment>> {
        Ok(self
            .inner
            .read()
            .enrollments
            .iter()
            .find(|e| {
                e.status == EnrollmentStatus::Activo
                    && e.course_id == course_id
                    && e.student_id == student_id
            })
            .cloned())
    }

    async fn set_status(&self, id: i64, status: EnrollmentStatus) -> Result<()> {
        let mut inner = self.inner.write();
        let stored = inner
            .enrollments
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| Error::not_found("inscripcion", id))?;
        stored.status = status;
        if status == EnrollmentStatus::Completado && stored.completed_at.is_none() {
            stored.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn set_final_grade(
        &self,
        student_id: i64,
        course_id: i64,
        final_grade: f64,
        passed: bool,
    ) -> Result<()> {
        let mut inner = self.inner.write();
        let position = inner
            .enrollments
            .iter()
            .position(|e| {
                e.status == EnrollmentStatus::Activo
                    && e.student_id == student_id
                    && e.course_id == course_id
            })
            .or_else(|| {
                inner
                    .enrollments
                    .iter()
                    .position(|e| e.student_id == student_id && e.course_id == course_id)
            })
            .ok_or_else(|| Error::not_found("inscripcion", student_id))?;
        let stored = &mut inner.enrollments[position];
        stored.final_grade = Some(final_grade);
        stored.passed = Some(passed);
        Ok(())
    }

    async fn list_for_student(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        Ok(self
            .inner
            .read()
            .enrollments
            .iter()
            .filter(|e| e.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_active_for_course(&self, course_id: i64) -> Result<Vec<Enrollment>> {
        Ok(self
            .inner
            .read()
            .enrollments
            .iter()
            .filter(|e| e.status == EnrollmentStatus::Activo && e.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn any_for_course(&self, course_id: i64) -> Result<bool> {
        Ok(self
            .inner
            .read()
            .enrollments
            .iter()
            .any(|e| e.course_id == course_id))
    }

    async fn any_active_for_course(&self, course_id: i64) -> Result<bool> {
        Ok(self
            .inner
            .read()
            .enrollments
            .iter()
            .any(|e| e.status == EnrollmentStatus::Activo && e.course_id == course_id))
    }
}

#[async_trait]
impl GradeStore for MemoryStore {
    async fn insert(&self, mut grade: Grade) -> Result<Grade> {
        let mut inner = self.inner.write();
        grade.id = next_id(&mut inner.seq.grades);
        inner.grades.push(grade.clone());
        Ok(grade)
    }

    async fn list_for_pair(&self, student_id: i64, course_id: i64) -> Result<Vec<Grade>> {
        Ok(self
            .inner
            .read()
            .grades
            .iter()
            .filter(|g| g.student_id == student_id && g.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn list_for_student(&self, student_id: i64) -> Result<Vec<Grade>> {
        let mut grades: Vec<Grade> = self
            .inner
            .read()
            .grades
            .iter()
            .filter(|g| g.student_id == student_id)
            .cloned()
            .collect();
        grades.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(grades)
    }
}
