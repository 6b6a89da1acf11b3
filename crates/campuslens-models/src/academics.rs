//! Courses, grades and the figures derived from them.

use campuslens_core::serde::deserialize_optional_i32;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub semester: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 20))]
    pub course_code: String,
    #[validate(length(min = 1, max = 200))]
    pub course_name: String,
    #[validate(range(min = 1, max = 30))]
    pub credits: i32,
    #[validate(range(min = 1, max = 12))]
    pub semester: i32,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CourseFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub semester: Option<i32>,
}

/// A grade joined with its course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct GradeDetail {
    pub id: Uuid,
    pub registration_number: String,
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub semester: i32,
    pub grade_points: f64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertGradeDto {
    #[validate(length(min = 1, max = 20))]
    pub course_code: String,
    #[validate(range(min = 0.0, max = 10.0))]
    pub grade_points: f64,
}

/// Grade figures for one semester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SemesterSgpa {
    pub semester: i32,
    pub sgpa: f64,
    pub earned_credits: i32,
    pub total_credits: i32,
}

/// Standing derived from CGPA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AcademicStatus {
    Excellent,
    Good,
    Average,
    #[default]
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl AcademicStatus {
    pub fn from_cgpa(cgpa: f64) -> Self {
        if cgpa >= 8.5 {
            AcademicStatus::Excellent
        } else if cgpa >= 7.0 {
            AcademicStatus::Good
        } else if cgpa >= 5.0 {
            AcademicStatus::Average
        } else {
            AcademicStatus::AtRisk
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AcademicStatus::Excellent => "Excellent",
            AcademicStatus::Good => "Good",
            AcademicStatus::Average => "Average",
            AcademicStatus::AtRisk => "At Risk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds() {
        assert_eq!(AcademicStatus::from_cgpa(9.1), AcademicStatus::Excellent);
        assert_eq!(AcademicStatus::from_cgpa(8.5), AcademicStatus::Excellent);
        assert_eq!(AcademicStatus::from_cgpa(8.49), AcademicStatus::Good);
        assert_eq!(AcademicStatus::from_cgpa(7.0), AcademicStatus::Good);
        assert_eq!(AcademicStatus::from_cgpa(5.0), AcademicStatus::Average);
        assert_eq!(AcademicStatus::from_cgpa(4.99), AcademicStatus::AtRisk);
        assert_eq!(AcademicStatus::from_cgpa(0.0), AcademicStatus::AtRisk);
    }

    #[test]
    fn at_risk_serializes_with_space() {
        let json = serde_json::to_string(&AcademicStatus::AtRisk).unwrap();
        assert_eq!(json, r#""At Risk""#);
        assert_eq!(AcademicStatus::AtRisk.label(), "At Risk");
    }

    #[test]
    fn grade_points_must_be_on_ten_point_scale() {
        let dto = UpsertGradeDto {
            course_code: "CS101".to_string(),
            grade_points: 10.5,
        };
        assert!(dto.validate().is_err());
    }
}
