//! Course catalog administration
//!
//! Courses, their logical deletion rules and teacher assignments. The
//! course code is immutable once any enrollment references the course,
//! and a course with active enrollments cannot be deleted.

use crate::services::audit::AuditService;
use chrono::Utc;
use serde_json::json;
use sia_domain::constants::MODULE_CURSOS;
use sia_domain::entities::{Course, TeacherAssignment};
use sia_domain::error::{Error, Result};
use sia_domain::ports::{AssignmentStore, CourseStore, EnrollmentStore, UserStore};
use sia_domain::value_objects::RequestContext;
use std::sync::Arc;
use tracing::info;

/// Creation/update payload for a course
#[derive(Debug, Clone)]
pub struct CourseRequest {
    pub code: String,
    pub name: String,
    pub description: String,
    pub credits: i32,
    /// Term label (cuatrimestre)
    pub term: String,
}

/// An active assignment joined with the teacher's name
#[derive(Debug, Clone)]
pub struct AssignedTeacher {
    pub assignment: TeacherAssignment,
    pub teacher_name: String,
}

/// A course joined with its active teacher assignments
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: Course,
    pub teachers: Vec<AssignedTeacher>,
}

/// Catalog administration service
pub struct CatalogService {
    courses: Arc<dyn CourseStore>,
    assignments: Arc<dyn AssignmentStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    users: Arc<dyn UserStore>,
    audit: Arc<AuditService>,
}

impl CatalogService {
    /// Create the service with its injected collaborators
    pub fn new(
        courses: Arc<dyn CourseStore>,
        assignments: Arc<dyn AssignmentStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        users: Arc<dyn UserStore>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            courses,
            assignments,
            enrollments,
            users,
            audit,
        }
    }

    fn check_request(request: &CourseRequest) -> Result<()> {
        if request.code.trim().is_empty() {
            return Err(Error::validation("El código del curso es obligatorio"));
        }
        if request.name.trim().is_empty() {
            return Err(Error::validation("El nombre del curso es obligatorio"));
        }
        if request.credits <= 0 {
            return Err(Error::validation("Los créditos deben ser mayores a cero"));
        }
        Ok(())
    }

    /// Create a course. The store's uniqueness check on the code, over
    /// active and inactive rows alike, is the authority.
    pub async fn create_course(
        &self,
        request: CourseRequest,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<Course> {
        Self::check_request(&request)?;
        let course = self
            .courses
            .insert(Course::new(
                request.code.trim(),
                request.name.trim(),
                request.description,
                request.credits,
                request.term,
                actor_id,
            ))
            .await?;
        info!(course_id = course.id, code = %course.code, "course created");

        self.audit
            .record_creation(
                actor_id,
                MODULE_CURSOS,
                "Curso",
                course.id,
                format!("Se creó el curso {} - {}", course.code, course.name),
                Some(json!({
                    "Codigo": course.code,
                    "Nombre": course.name,
                    "Creditos": course.credits,
                })),
                ctx,
            )
            .await;
        Ok(course)
    }

    /// Update a course. Changing the code is refused once any
    /// enrollment, in any state, references the course.
    pub async fn update_course(
        &self,
        course_id: i64,
        request: CourseRequest,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<()> {
        Self::check_request(&request)?;
        let mut course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| Error::not_found("curso", course_id))?;

        let code = request.code.trim();
        if course.code != code && self.enrollments.any_for_course(course_id).await? {
            return Err(Error::validation(
                "No se puede cambiar el código del curso porque tiene estudiantes inscritos",
            ));
        }

        let before = json!({
            "Codigo": course.code,
            "Nombre": course.name,
            "Descripcion": course.description,
            "Creditos": course.credits,
            "Cuatrimestre": course.term,
        });

        course.code = code.to_owned();
        course.name = request.name.trim().to_owned();
        course.description = request.description;
        course.credits = request.credits;
        course.term = request.term;
        course.modified_at = Some(Utc::now());
        course.modified_by = actor_id;
        self.courses.update(&course).await?;
        info!(course_id, code = %course.code, "course updated");

        self.audit
            .record_update(
                actor_id,
                MODULE_CURSOS,
                "Curso",
                course_id,
                format!("Se actualizó el curso {}", course.code),
                Some(before),
                Some(json!({
                    "Codigo": course.code,
                    "Nombre": course.name,
                    "Creditos": course.credits,
                })),
                ctx,
            )
            .await;
        Ok(())
    }

    /// Logical deletion, refused while any `Activo` enrollment
    /// references the course. Withdrawn or completed history does not
    /// block it.
    pub async fn deactivate_course(
        &self,
        course_id: i64,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<()> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| Error::not_found("curso", course_id))?;

        if self.enrollments.any_active_for_course(course_id).await? {
            return Err(Error::validation(
                "No se puede eliminar el curso porque tiene estudiantes inscritos",
            ));
        }

        let before = json!({ "Codigo": course.code, "Nombre": course.name });
        self.courses.set_active(course_id, false).await?;
        info!(course_id, code = %course.code, "course deactivated");

        self.audit
            .record_deletion(
                actor_id,
                MODULE_CURSOS,
                "Curso",
                course_id,
                format!("Se eliminó el curso {} - {}", course.code, course.name),
                Some(before),
                ctx,
            )
            .await;
        Ok(())
    }

    /// Assign a teacher to a course. Refused for a duplicate active
    /// pair (the store's check is the authority) and for a schedule
    /// conflict: the same teacher with the same non-empty schedule
    /// already active on a different course. Empty schedules never
    /// conflict.
    pub async fn assign_teacher(
        &self,
        course_id: i64,
        teacher_id: i64,
        schedule: &str,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<TeacherAssignment> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| Error::not_found("curso", course_id))?;
        let teacher = self
            .users
            .find_by_id(teacher_id)
            .await?
            .ok_or_else(|| Error::not_found("docente", teacher_id))?;

        let schedule = schedule.trim();
        if !schedule.is_empty()
            && self
                .assignments
                .has_schedule_conflict(teacher_id, schedule, course_id)
                .await?
        {
            return Err(Error::validation("El docente tiene un conflicto de horario"));
        }

        let assignment = self
            .assignments
            .insert(TeacherAssignment {
                id: 0,
                course_id,
                teacher_id,
                schedule: schedule.to_owned(),
                assigned_at: Utc::now(),
                active: true,
            })
            .await?;
        info!(course_id, teacher_id, "teacher assigned");

        self.audit
            .record_creation(
                actor_id,
                MODULE_CURSOS,
                "AsignacionDocente",
                assignment.id,
                format!(
                    "Se asignó el docente {} al curso {}",
                    teacher.full_name, course.code
                ),
                None,
                ctx,
            )
            .await;
        Ok(assignment)
    }

    /// Drop the active assignment for a (course, teacher) pair
    pub async fn remove_teacher(
        &self,
        course_id: i64,
        teacher_id: i64,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<()> {
        let assignment = self
            .assignments
            .find_active(course_id, teacher_id)
            .await?
            .ok_or_else(|| Error::not_found("asignacion", teacher_id))?;

        self.assignments.deactivate(assignment.id).await?;
        info!(course_id, teacher_id, "teacher assignment removed");

        self.audit
            .record_deletion(
                actor_id,
                MODULE_CURSOS,
                "AsignacionDocente",
                assignment.id,
                "Se removió la asignación del docente del curso".to_owned(),
                None,
                ctx,
            )
            .await;
        Ok(())
    }

    /// Active courses
    pub async fn list_courses(&self) -> Result<Vec<Course>> {
        self.courses.list_active().await
    }

    /// One course joined with its active teacher assignments
    pub async fn course_detail(&self, course_id: i64) -> Result<CourseDetail> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| Error::not_found("curso", course_id))?;

        let mut teachers = Vec::new();
        for assignment in self.assignments.list_active_for_course(course_id).await? {
            let teacher_name = self
                .users
                .find_by_id(assignment.teacher_id)
                .await?
                .map(|u| u.full_name)
                .unwrap_or_default();
            teachers.push(AssignedTeacher {
                assignment,
                teacher_name,
            });
        }
        Ok(CourseDetail { course, teachers })
    }
}
