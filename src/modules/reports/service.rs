use std::collections::{HashMap, HashSet};

use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;

use campuslens_core::AppError;
use campuslens_models::{GradeDetail, ReportKind, ReportTypeInfo, SemesterPerformanceReport};
use campuslens_reports::build_performance_report;

use crate::modules::students::service::StudentService;

pub struct ReportService;

/// Drops repeated registration numbers, keeping the first occurrence.
fn distinct_in_order(registration_numbers: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    registration_numbers
        .iter()
        .filter(|reg_no| seen.insert(*reg_no))
        .cloned()
        .collect()
}

impl ReportService {
    pub fn report_types() -> Vec<ReportTypeInfo> {
        ReportKind::ALL.into_iter().map(Into::into).collect()
    }

    #[instrument(skip(db))]
    pub async fn performance_report(
        db: &PgPool,
        registration_number: &str,
    ) -> Result<SemesterPerformanceReport, AppError> {
        let student = StudentService::get_student(db, registration_number).await?;
        let grades = StudentService::get_grades(db, registration_number).await?;
        Ok(build_performance_report(student, grades))
    }

    /// Reports for several students in request order, one per distinct
    /// registration number. An empty list is a 400 and an unknown
    /// registration number a 404.
    #[instrument(skip(db))]
    pub async fn performance_reports(
        db: &PgPool,
        registration_numbers: &[String],
    ) -> Result<Vec<SemesterPerformanceReport>, AppError> {
        if registration_numbers.is_empty() {
            return Err(AppError::bad_request(anyhow!("No students selected")));
        }

        let registration_numbers = distinct_in_order(registration_numbers);
        let students = StudentService::get_students_by_numbers(db, &registration_numbers).await?;

        let grades = sqlx::query_as::<_, GradeDetail>(
            r#"SELECT g.id, g.registration_number, g.course_code, c.course_name, c.credits,
                      c.semester, g.grade_points
               FROM grades g
               JOIN courses c ON c.course_code = g.course_code
               WHERE g.registration_number = ANY($1)
               ORDER BY c.semester, g.course_code"#,
        )
        .bind(&registration_numbers)
        .fetch_all(db)
        .await
        .context("Failed to fetch grades for report")
        .map_err(AppError::database)?;

        let mut by_student: HashMap<String, Vec<GradeDetail>> = HashMap::new();
        for grade in grades {
            by_student
                .entry(grade.registration_number.clone())
                .or_default()
                .push(grade);
        }

        Ok(students
            .into_iter()
            .map(|student| {
                let grades = by_student
                    .get(&student.registration_number)
                    .cloned()
                    .unwrap_or_default();
                build_performance_report(student, grades)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_report_type() {
        let types = ReportService::report_types();
        assert_eq!(types.len(), ReportKind::ALL.len());
        assert!(types.iter().any(|t| t.id == ReportKind::Backlog));
    }

    #[test]
    fn repeated_students_are_reported_once() {
        let input: Vec<String> = ["B2", "A1", "B2", "C3", "A1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(distinct_in_order(&input), vec!["B2", "A1", "C3"]);
    }
}
