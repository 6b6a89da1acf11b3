//! Student records.

use chrono::{DateTime, Utc};
use campuslens_core::serde::{deserialize_optional_i32, deserialize_optional_string};
use campuslens_core::validation::{not_blank, registration_number};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::academics::{AcademicStatus, GradeDetail, SemesterSgpa};
use crate::achievements::Achievement;
use crate::certifications::Certification;
use crate::counseling::CounselingNote;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub registration_number: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub branch: String,
    pub current_semester: i32,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A student in a list view, with CGPA computed over all grades.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub student: Student,
    pub cgpa: f64,
    #[sqlx(skip)]
    pub status: AcademicStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentDetail {
    #[serde(flatten)]
    pub student: Student,
    pub grades: Vec<GradeDetail>,
    pub cgpa: f64,
    pub status: AcademicStatus,
    pub total_credits: i32,
    pub completed_credits: i32,
    pub sgpa_data: Vec<SemesterSgpa>,
    pub achievements: Vec<Achievement>,
    pub certifications: Vec<Certification>,
    /// Present for staff callers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counseling_notes: Option<Vec<CounselingNote>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(custom(function = "registration_number"))]
    pub registration_number: String,
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub branch: String,
    #[validate(range(min = 1, max = 12))]
    pub current_semester: i32,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[validate(length(max = 12))]
    pub pincode: Option<String>,
    /// Student portal password; no portal login is created when absent
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub branch: Option<String>,
    #[validate(range(min = 1, max = 12))]
    pub current_semester: Option<i32>,
    pub address_line: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[validate(length(max = 12))]
    pub pincode: Option<String>,
    #[validate(length(min = 6))]
    pub password: Option<String>,
}

impl UpdateStudentDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.gender.is_none()
            && self.branch.is_none()
            && self.current_semester.is_none()
            && self.address_line.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.pincode.is_none()
            && self.password.is_none()
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct StudentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub semester: Option<i32>,
    /// `proctoring` limits the list to students mapped to `username`
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub filter: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub username: Option<String>,
}

impl StudentFilterParams {
    pub fn is_proctoring(&self) -> bool {
        self.filter
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("proctoring"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proctoring_filter_is_case_insensitive() {
        let params = StudentFilterParams {
            filter: Some("Proctoring".to_string()),
            ..Default::default()
        };
        assert!(params.is_proctoring());
        assert!(!StudentFilterParams::default().is_proctoring());
    }

    #[test]
    fn create_student_rejects_bad_registration_number() {
        let dto: CreateStudentDto = serde_json::from_str(
            r#"{"registration_number":"21-A","name":"Asha","branch":"CSE","current_semester":3}"#,
        )
        .unwrap();
        assert!(dto.validate().unwrap_err().field_errors().contains_key("registration_number"));
    }

    #[test]
    fn create_student_accepts_minimal_payload() {
        let dto: CreateStudentDto = serde_json::from_str(
            r#"{"registration_number":"21A91A0501","name":"Asha","branch":"CSE","current_semester":3}"#,
        )
        .unwrap();
        assert!(dto.validate().is_ok());
    }
}
