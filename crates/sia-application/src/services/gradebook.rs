//! Component grades and weighted final-grade aggregation
//!
//! Every recorded component triggers a full recomputation of the pair's
//! final grade: Σ(score × weight) / 100, passed at 70 or above. The
//! recomputation overwrites, so re-grading a component set always lands
//! on the same result. Grade recording is the one mutation whose audit
//! write is strict: a failed append fails the operation.

use crate::services::audit::{AuditRecord, AuditService};
use chrono::Utc;
use serde_json::json;
use sia_domain::constants::{MODULE_HISTORIAL, NOTA_MAXIMA, NOTA_MINIMA_APROBACION};
use sia_domain::entities::{AuditAction, Course, Enrollment, Grade};
use sia_domain::error::{Error, Result};
use sia_domain::ports::{CourseStore, EnrollmentStore, GradeStore, UserStore};
use sia_domain::value_objects::RequestContext;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Payload for recording one component grade
#[derive(Debug, Clone)]
pub struct GradeRequest {
    pub student_id: i64,
    pub course_id: i64,
    /// Evaluation kind, e.g. "Examen", "Tarea", "Proyecto"
    pub kind: String,
    pub description: String,
    /// Score in 0..=100
    pub score: f64,
    /// Weight percent in 0..=100
    pub weight: f64,
    pub observations: Option<String>,
}

/// One transcript row: an enrollment joined with its course
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub enrollment: Enrollment,
    pub course: Course,
}

/// One roster row: an active enrollment joined with student identity
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub enrollment_id: i64,
    pub student_id: i64,
    pub student_name: String,
    pub identification: String,
    pub final_grade: Option<f64>,
    pub passed: Option<bool>,
    pub enrolled_at: chrono::DateTime<Utc>,
}

/// Average final grade over the graded enrollments of one term
#[derive(Debug, Clone)]
pub struct TermAverage {
    pub term: String,
    pub average: f64,
    pub courses: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Average score over the components of one evaluation kind
#[derive(Debug, Clone)]
pub struct KindAverage {
    pub kind: String,
    pub average: f64,
    pub count: usize,
}

/// Aggregates backing the student performance chart
#[derive(Debug, Clone)]
pub struct PerformanceSummary {
    /// Per-term averages, term ascending; graded enrollments only
    pub per_term: Vec<TermAverage>,
    /// Per-kind component averages, kind ascending
    pub per_kind: Vec<KindAverage>,
    /// Mean of all final grades, 0 when nothing is graded yet
    pub overall_average: f64,
}

/// Gradebook service
pub struct GradebookService {
    grades: Arc<dyn GradeStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    courses: Arc<dyn CourseStore>,
    users: Arc<dyn UserStore>,
    audit: Arc<AuditService>,
}

impl GradebookService {
    /// Create the service with its injected collaborators
    pub fn new(
        grades: Arc<dyn GradeStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        courses: Arc<dyn CourseStore>,
        users: Arc<dyn UserStore>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            grades,
            enrollments,
            courses,
            users,
            audit,
        }
    }

    /// Record a component grade for an actively enrolled student,
    /// recompute the pair's final grade and append a strict audit
    /// event. If the append fails the error propagates; the grade and
    /// the recomputed final remain committed.
    pub async fn record_grade(
        &self,
        request: GradeRequest,
        actor_id: Option<i64>,
        ctx: &RequestContext,
    ) -> Result<Grade> {
        if request.kind.trim().is_empty() {
            return Err(Error::validation("El tipo de evaluación es obligatorio"));
        }
        if !(0.0..=NOTA_MAXIMA).contains(&request.score) {
            return Err(Error::validation("La nota debe estar entre 0 y 100"));
        }
        if !(0.0..=100.0).contains(&request.weight) {
            return Err(Error::validation("El porcentaje debe estar entre 0 y 100"));
        }

        self.enrollments
            .find_active(request.course_id, request.student_id)
            .await?
            .ok_or_else(|| Error::validation("El estudiante no está inscrito en este curso"))?;
        let course = self
            .courses
            .find_by_id(request.course_id)
            .await?
            .ok_or_else(|| Error::not_found("curso", request.course_id))?;
        let student = self
            .users
            .find_by_id(request.student_id)
            .await?
            .ok_or_else(|| Error::not_found("usuario", request.student_id))?;

        let grade = self
            .grades
            .insert(Grade {
                id: 0,
                student_id: request.student_id,
                course_id: request.course_id,
                kind: request.kind.trim().to_owned(),
                description: request.description,
                score: request.score,
                weight: request.weight,
                recorded_at: Utc::now(),
                observations: request.observations,
            })
            .await?;
        self.recompute_final(request.student_id, request.course_id)
            .await?;
        info!(
            student_id = request.student_id,
            course_id = request.course_id,
            grade_id = grade.id,
            "grade recorded"
        );

        self.audit
            .record_strict(
                AuditRecord::new(
                    actor_id,
                    AuditAction::Creation,
                    MODULE_HISTORIAL,
                    format!(
                        "Se registró una calificación de {} para el estudiante {} en el curso {}",
                        grade.kind, student.full_name, course.code
                    ),
                )
                .entity("Calificacion", grade.id)
                .after(json!({
                    "TipoEvaluacion": grade.kind,
                    "Descripcion": grade.description,
                    "Nota": grade.score,
                    "Porcentaje": grade.weight,
                })),
                ctx,
            )
            .await?;
        Ok(grade)
    }

    /// Recompute and overwrite the weighted final for a pair. Weights
    /// below a 100 total compute proportionally; a zero total writes a
    /// zero final rather than dividing by it.
    async fn recompute_final(&self, student_id: i64, course_id: i64) -> Result<()> {
        let components = self.grades.list_for_pair(student_id, course_id).await?;
        if components.is_empty() {
            return Ok(());
        }
        let total_weight: f64 = components.iter().map(|c| c.weight).sum();
        let final_grade = if total_weight > 0.0 {
            components.iter().map(|c| c.score * c.weight / 100.0).sum()
        } else {
            0.0
        };
        let passed = final_grade >= NOTA_MINIMA_APROBACION;
        self.enrollments
            .set_final_grade(student_id, course_id, final_grade, passed)
            .await
    }

    /// Component grades of a student, newest first, optionally narrowed
    /// to one course
    pub async fn student_grades(
        &self,
        student_id: i64,
        course_id: Option<i64>,
    ) -> Result<Vec<Grade>> {
        let mut grades = match course_id {
            Some(course_id) => self.grades.list_for_pair(student_id, course_id).await?,
            None => self.grades.list_for_student(student_id).await?,
        };
        grades.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(grades)
    }

    /// Active enrollments of a course with student identity and current
    /// final grade, ordered by student name
    pub async fn course_roster(&self, course_id: i64) -> Result<Vec<RosterEntry>> {
        let mut roster = Vec::new();
        for enrollment in self.enrollments.list_active_for_course(course_id).await? {
            let Some(student) = self.users.find_by_id(enrollment.student_id).await? else {
                continue;
            };
            roster.push(RosterEntry {
                enrollment_id: enrollment.id,
                student_id: student.id,
                student_name: student.full_name,
                identification: student.identification,
                final_grade: enrollment.final_grade,
                passed: enrollment.passed,
                enrolled_at: enrollment.enrolled_at,
            });
        }
        roster.sort_by(|a, b| a.student_name.cmp(&b.student_name));
        Ok(roster)
    }

    /// Full transcript of a student: every enrollment in any state
    /// joined with its course, newest term first
    pub async fn student_history(&self, student_id: i64) -> Result<Vec<HistoryEntry>> {
        self.users
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| Error::not_found("usuario", student_id))?;

        let mut history = Vec::new();
        for enrollment in self.enrollments.list_for_student(student_id).await? {
            let Some(course) = self.courses.find_by_id(enrollment.course_id).await? else {
                continue;
            };
            history.push(HistoryEntry { enrollment, course });
        }
        history.sort_by(|a, b| b.course.term.cmp(&a.course.term));
        Ok(history)
    }

    /// Aggregates for the performance chart: per-term final-grade
    /// averages with passed/failed counts, per-kind component averages
    /// and the overall mean
    pub async fn performance_summary(&self, student_id: i64) -> Result<PerformanceSummary> {
        let mut graded: Vec<(String, f64, Option<bool>)> = Vec::new();
        for enrollment in self.enrollments.list_for_student(student_id).await? {
            let Some(final_grade) = enrollment.final_grade else {
                continue;
            };
            let Some(course) = self.courses.find_by_id(enrollment.course_id).await? else {
                continue;
            };
            graded.push((course.term, final_grade, enrollment.passed));
        }

        let mut by_term: BTreeMap<String, Vec<(f64, Option<bool>)>> = BTreeMap::new();
        for (term, final_grade, passed) in &graded {
            by_term
                .entry(term.clone())
                .or_default()
                .push((*final_grade, *passed));
        }
        let per_term = by_term
            .into_iter()
            .map(|(term, rows)| {
                let sum: f64 = rows.iter().map(|(g, _)| g).sum();
                TermAverage {
                    term,
                    average: sum / rows.len() as f64,
                    courses: rows.len(),
                    passed: rows.iter().filter(|(_, p)| *p == Some(true)).count(),
                    failed: rows.iter().filter(|(_, p)| *p == Some(false)).count(),
                }
            })
            .collect();

        let mut by_kind: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for grade in self.grades.list_for_student(student_id).await? {
            by_kind.entry(grade.kind).or_default().push(grade.score);
        }
        let per_kind = by_kind
            .into_iter()
            .map(|(kind, scores)| KindAverage {
                kind,
                average: scores.iter().sum::<f64>() / scores.len() as f64,
                count: scores.len(),
            })
            .collect();

        let overall_average = if graded.is_empty() {
            0.0
        } else {
            graded.iter().map(|(_, g, _)| g).sum::<f64>() / graded.len() as f64
        };

        Ok(PerformanceSummary {
            per_term,
            per_kind,
            overall_average,
        })
    }
}
