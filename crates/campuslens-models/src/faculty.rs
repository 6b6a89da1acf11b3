//! Proctoring mappings and the faculty dashboard.

use chrono::NaiveDate;
use campuslens_core::serde::{deserialize_optional_i32, deserialize_optional_string};
use campuslens_core::validation::{not_blank, registration_number};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct FacultyStudentParams {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub semester: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProctorMappingDto {
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub faculty_username: String,
    #[validate(length(min = 1), custom(function = "all_registration_numbers"))]
    pub registration_numbers: Vec<String>,
}

fn all_registration_numbers(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|v| registration_number(v))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MappingResult {
    pub affected: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DashboardScope {
    #[default]
    Proctoring,
    All,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DashboardParams {
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub filter: DashboardScope,
    /// Defaults to the caller's username
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_students: i64,
    pub avg_cgpa: f64,
    pub achievements: i64,
    pub certifications: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopStudent {
    pub registration_number: String,
    pub name: String,
    pub branch: String,
    pub achievement_count: i64,
    pub cgpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentActivity {
    /// `achievement` or `certification`
    pub kind: String,
    pub registration_number: String,
    pub student_name: String,
    pub title: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SemesterAverage {
    pub semester: i32,
    pub average_sgpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BranchCount {
    pub branch: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FacultyDashboard {
    pub stats: DashboardStats,
    pub top_students: Vec<TopStudent>,
    pub recent_activities: Vec<RecentActivity>,
    pub performance_data: Vec<SemesterAverage>,
    pub branch_distribution: Vec<BranchCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_scope_defaults_to_proctoring() {
        let params: DashboardParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.filter, DashboardScope::Proctoring);
        let params: DashboardParams = serde_json::from_str(r#"{"filter":"all"}"#).unwrap();
        assert_eq!(params.filter, DashboardScope::All);
    }

    #[test]
    fn mapping_rejects_invalid_registration_numbers() {
        let dto = ProctorMappingDto {
            faculty_username: "faculty1".to_string(),
            registration_numbers: vec!["21A91A0501".to_string(), "bad number".to_string()],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn mapping_requires_at_least_one_student() {
        let dto = ProctorMappingDto {
            faculty_username: "faculty1".to_string(),
            registration_numbers: vec![],
        };
        assert!(dto.validate().is_err());
    }
}
