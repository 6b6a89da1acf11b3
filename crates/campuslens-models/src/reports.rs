//! Report types and the per-student performance report.

use campuslens_core::serde::{deserialize_comma_list, deserialize_flag};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::academics::{AcademicStatus, GradeDetail, SemesterSgpa};
use crate::students::Student;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Semester,
    Cumulative,
    Subject,
    Achievements,
    Certifications,
    Backlog,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Semester,
        ReportKind::Cumulative,
        ReportKind::Subject,
        ReportKind::Achievements,
        ReportKind::Certifications,
        ReportKind::Backlog,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ReportKind::Semester => "semester",
            ReportKind::Cumulative => "cumulative",
            ReportKind::Subject => "subject",
            ReportKind::Achievements => "achievements",
            ReportKind::Certifications => "certifications",
            ReportKind::Backlog => "backlog",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Semester => "Semester Performance Report",
            ReportKind::Cumulative => "Cumulative Performance Report",
            ReportKind::Subject => "Subject-wise Analysis Report",
            ReportKind::Achievements => "Achievements Report",
            ReportKind::Certifications => "Certifications Report",
            ReportKind::Backlog => "Backlog Report",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportKind::Semester => "SGPA, earned credits and grades for each semester",
            ReportKind::Cumulative => "CGPA trend and overall academic standing",
            ReportKind::Subject => "Grade points and letter grades per course",
            ReportKind::Achievements => "Academic and extracurricular achievements",
            ReportKind::Certifications => "Professional certifications and their verification",
            ReportKind::Backlog => "Courses that still need to be cleared",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportTypeInfo {
    pub id: ReportKind,
    pub title: String,
    pub description: String,
}

impl From<ReportKind> for ReportTypeInfo {
    fn from(kind: ReportKind) -> Self {
        Self {
            id: kind,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
        }
    }
}

/// Everything a report renderer needs about one student.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SemesterPerformanceReport {
    pub student: Student,
    pub semester_grades: Vec<GradeDetail>,
    pub sgpa_by_semester: Vec<SemesterSgpa>,
    pub cgpa: f64,
    pub status: AcademicStatus,
    pub total_credits: i32,
    pub earned_credits: i32,
    pub failed_subjects: Vec<GradeDetail>,
    pub recommendations: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ReportQuery {
    #[serde(default, rename = "type")]
    #[param(value_type = Option<String>)]
    pub kind: ReportKind,
    #[serde(default = "default_true", alias = "includeCharts", deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub include_charts: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct StudentBatchQuery {
    /// Comma separated registration numbers
    #[serde(default, deserialize_with = "deserialize_comma_list")]
    #[param(value_type = String)]
    pub students: Vec<String>,
    /// Zip one PDF per student instead of one combined PDF
    #[serde(default, alias = "isIndividual", deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub is_individual: bool,
    #[serde(default, rename = "type")]
    #[param(value_type = Option<String>)]
    pub kind: ReportKind,
    #[serde(default = "default_true", alias = "includeCharts", deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub include_charts: bool,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ExportQuery {
    #[serde(default, deserialize_with = "deserialize_comma_list")]
    #[param(value_type = String)]
    pub students: Vec<String>,
    /// Comma separated column keys; all known columns when empty
    #[serde(default, deserialize_with = "deserialize_comma_list")]
    #[param(value_type = Option<String>)]
    pub columns: Vec<String>,
}
