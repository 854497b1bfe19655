//! Student enrollment lifecycle
//!
//! Enrollment and withdrawal keep the full history: withdrawal flips the
//! row to `Retirado` instead of deleting it, and a later re-enrollment
//! inserts a fresh `Activo` row. The student is the recorded actor of
//! both events.

use crate::services::audit::AuditService;
use chrono::Utc;
use sia_domain::constants::MODULE_CURSOS;
use sia_domain::entities::{Course, Enrollment, EnrollmentStatus};
use sia_domain::error::{Error, Result};
use sia_domain::ports::{AssignmentStore, CourseStore, EnrollmentStore, UserStore};
use sia_domain::value_objects::RequestContext;
use std::sync::Arc;
use tracing::info;

/// An active enrollment joined with its course and teacher names
#[derive(Debug, Clone)]
pub struct StudentCourse {
    pub enrollment: Enrollment,
    pub course: Course,
    pub teachers: Vec<String>,
}

/// Enrollment service
pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentStore>,
    courses: Arc<dyn CourseStore>,
    users: Arc<dyn UserStore>,
    assignments: Arc<dyn AssignmentStore>,
    audit: Arc<AuditService>,
}

impl EnrollmentService {
    /// Create the service with its injected collaborators
    pub fn new(
        enrollments: Arc<dyn EnrollmentStore>,
        courses: Arc<dyn CourseStore>,
        users: Arc<dyn UserStore>,
        assignments: Arc<dyn AssignmentStore>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            enrollments,
            courses,
            users,
            assignments,
            audit,
        }
    }

    /// Enroll a student in an active course. The store's check against a
    /// second `Activo` enrollment for the pair is the authority; prior
    /// withdrawn rows do not block re-enrollment.
    pub async fn enroll(
        &self,
        course_id: i64,
        student_id: i64,
        ctx: &RequestContext,
    ) -> Result<Enrollment> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await?
            .filter(|c| c.active)
            .ok_or_else(|| Error::not_found("curso", course_id))?;
        let student = self
            .users
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| Error::not_found("estudiante", student_id))?;

        let enrollment = self
            .enrollments
            .insert(Enrollment {
                id: 0,
                student_id,
                course_id,
                enrolled_at: Utc::now(),
                status: EnrollmentStatus::Activo,
                final_grade: None,
                passed: None,
                completed_at: None,
            })
            .await?;
        info!(course_id, student_id, "student enrolled");

        self.audit
            .record_creation(
                Some(student_id),
                MODULE_CURSOS,
                "Inscripcion",
                enrollment.id,
                format!(
                    "El estudiante {} se matriculó en el curso {}",
                    student.full_name, course.code
                ),
                None,
                ctx,
            )
            .await;
        Ok(enrollment)
    }

    /// Withdraw a student from a course. The row flips to `Retirado`;
    /// recorded component grades stay behind untouched.
    pub async fn withdraw(
        &self,
        course_id: i64,
        student_id: i64,
        ctx: &RequestContext,
    ) -> Result<()> {
        let enrollment = self
            .enrollments
            .find_active(course_id, student_id)
            .await?
            .ok_or_else(|| Error::not_found("inscripcion", student_id))?;

        self.enrollments
            .set_status(enrollment.id, EnrollmentStatus::Retirado)
            .await?;
        info!(course_id, student_id, "student withdrawn");

        let course_code = self
            .courses
            .find_by_id(course_id)
            .await?
            .map(|c| c.code)
            .unwrap_or_default();
        let student_name = self
            .users
            .find_by_id(student_id)
            .await?
            .map(|u| u.full_name)
            .unwrap_or_default();

        self.audit
            .record_deletion(
                Some(student_id),
                MODULE_CURSOS,
                "Inscripcion",
                enrollment.id,
                format!(
                    "El estudiante {student_name} se retiró del curso {course_code}"
                ),
                None,
                ctx,
            )
            .await;
        Ok(())
    }

    /// The student's active enrollments joined with course data and the
    /// names of the course's active teachers
    pub async fn student_courses(&self, student_id: i64) -> Result<Vec<StudentCourse>> {
        let mut out = Vec::new();
        for enrollment in self.enrollments.list_for_student(student_id).await? {
            if enrollment.status != EnrollmentStatus::Activo {
                continue;
            }
            let Some(course) = self.courses.find_by_id(enrollment.course_id).await? else {
                continue;
            };
            let mut teachers = Vec::new();
            for assignment in self
                .assignments
                .list_active_for_course(enrollment.course_id)
                .await?
            {
                if let Some(teacher) = self.users.find_by_id(assignment.teacher_id).await? {
                    teachers.push(teacher.full_name);
                }
            }
            out.push(StudentCourse {
                enrollment,
                course,
                teachers,
            });
        }
        Ok(out)
    }

    /// Active courses the student is not currently enrolled in, ordered
    /// by code
    pub async fn available_courses(&self, student_id: i64) -> Result<Vec<Course>> {
        let enrolled: Vec<i64> = self
            .enrollments
            .list_for_student(student_id)
            .await?
            .into_iter()
            .filter(|e| e.status == EnrollmentStatus::Activo)
            .map(|e| e.course_id)
            .collect();

        let mut courses: Vec<Course> = self
            .courses
            .list_active()
            .await?
            .into_iter()
            .filter(|c| !enrolled.contains(&c.id))
            .collect();
        courses.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(courses)
    }
}
