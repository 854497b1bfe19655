//! Academic catalog entities: courses, assignments, enrollments, grades

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog entry. The code is unique across active and inactive courses
/// and frozen once any enrollment references the course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Store-assigned id
    pub id: i64,
    /// Globally unique course code, e.g. "MAT-101"
    pub code: String,
    /// Course name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Credit count
    pub credits: i32,
    /// Term label the course belongs to (cuatrimestre)
    pub term: String,
    /// Soft-delete flag
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Creating user
    pub created_by: Option<i64>,
    /// Last modification timestamp
    pub modified_at: Option<DateTime<Utc>>,
    /// Last modifying user
    pub modified_by: Option<i64>,
}

impl Course {
    /// Build a course ready for insertion (id assigned by the store)
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        credits: i32,
        term: impl Into<String>,
        created_by: Option<i64>,
    ) -> Self {
        Self {
            id: 0,
            code: code.into(),
            name: name.into(),
            description: description.into(),
            credits,
            term: term.into(),
            active: true,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
        }
    }
}

/// Teacher-course link. At most one active assignment per (course,
/// teacher); a teacher cannot hold two active assignments with the same
/// non-empty schedule on different courses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAssignment {
    /// Store-assigned id
    pub id: i64,
    /// Assigned course
    pub course_id: i64,
    /// Assigned teacher
    pub teacher_id: i64,
    /// Schedule string, e.g. "Lunes 18:00-21:00"; empty means unscheduled
    pub schedule: String,
    /// Assignment timestamp
    pub assigned_at: DateTime<Utc>,
    /// Soft-delete flag
    pub active: bool,
}

/// Enrollment lifecycle state. Stored as the rendered Spanish string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollmentStatus {
    /// Currently enrolled
    Activo,
    /// Withdrawn by the student
    Retirado,
    /// Term closed with the course completed
    Completado,
}

impl EnrollmentStatus {
    /// Stored string for this state
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "Activo",
            Self::Retirado => "Retirado",
            Self::Completado => "Completado",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Student-course link carrying the weighted final grade. At most one
/// enrollment in `Activo` state per (course, student); withdrawn history
/// rows are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    /// Store-assigned id
    pub id: i64,
    /// Enrolled student
    pub student_id: i64,
    /// Enrolled course
    pub course_id: i64,
    /// Enrollment timestamp
    pub enrolled_at: DateTime<Utc>,
    /// Lifecycle state
    pub status: EnrollmentStatus,
    /// Weighted final grade, recomputed on every component grade
    pub final_grade: Option<f64>,
    /// Passing flag paired with `final_grade`
    pub passed: Option<bool>,
    /// Term-close timestamp
    pub completed_at: Option<DateTime<Utc>>,
}

/// One weighted component grade. Append-oriented: every insert triggers a
/// full recomputation of the enrollment's final grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    /// Store-assigned id
    pub id: i64,
    /// Graded student
    pub student_id: i64,
    /// Graded course
    pub course_id: i64,
    /// Evaluation kind, e.g. "Examen", "Tarea", "Proyecto"
    pub kind: String,
    /// What was evaluated
    pub description: String,
    /// Score in 0..=100
    pub score: f64,
    /// Weight percent in 0..=100
    pub weight: f64,
    /// Recording timestamp
    pub recorded_at: DateTime<Utc>,
    /// Optional grader notes
    pub observations: Option<String>,
}
