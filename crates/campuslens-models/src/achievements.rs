//! Student achievements and the export filters.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use campuslens_core::serde::{deserialize_comma_list, deserialize_flag, deserialize_optional_date};
use campuslens_core::validation::{not_blank, registration_number};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_SCOPE: &str = "Inside the College";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Achievement {
    pub id: Uuid,
    pub registration_number: String,
    pub student_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub achievement_date: Option<NaiveDate>,
    pub scope: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAchievementDto {
    #[validate(custom(function = "registration_number"))]
    pub registration_number: String,
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub category: String,
    /// `DD/MM/YYYY` or `YYYY-MM-DD`
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, example = "15/08/2024")]
    pub achievement_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub scope: Option<String>,
}

/// Body of `POST /students/{reg_no}/achievements`; the student comes from the path.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StudentAchievementDto {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, example = "15/08/2024")]
    pub achievement_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub scope: Option<String>,
}

impl StudentAchievementDto {
    pub fn for_student(self, registration_number: &str) -> CreateAchievementDto {
        CreateAchievementDto {
            registration_number: registration_number.to_string(),
            title: self.title,
            description: self.description,
            category: self.category,
            achievement_date: self.achievement_date,
            scope: self.scope,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAchievementDto {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub category: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>, example = "2024-08-15")]
    pub achievement_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct LinkStatus {
    pub active: bool,
}

/// How far back an export reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    All,
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    /// First day of the window containing `today`, or `None` for all time.
    pub fn start_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeRange::All => None,
            TimeRange::Month => NaiveDate::from_ymd_opt(today.year(), today.month(), 1),
            TimeRange::Quarter => {
                let first_month = (today.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(today.year(), first_month, 1)
            }
            TimeRange::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::All => "All time",
            TimeRange::Month => "This month",
            TimeRange::Quarter => "This quarter",
            TimeRange::Year => "This year",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AchievementExportParams {
    /// Comma separated categories; empty means all
    #[serde(default, deserialize_with = "deserialize_comma_list")]
    #[param(value_type = Option<String>)]
    pub categories: Vec<String>,
    #[serde(default, alias = "timeRange")]
    #[param(value_type = Option<String>)]
    pub time_range: TimeRange,
    #[serde(default, alias = "includeDetails", deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub include_details: bool,
    #[serde(default, alias = "includeCharts", deserialize_with = "deserialize_flag")]
    #[param(value_type = Option<bool>)]
    pub include_charts: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn time_range_windows() {
        let today = date(2024, 8, 20);
        assert_eq!(TimeRange::All.start_date(today), None);
        assert_eq!(TimeRange::Month.start_date(today), Some(date(2024, 8, 1)));
        assert_eq!(TimeRange::Quarter.start_date(today), Some(date(2024, 7, 1)));
        assert_eq!(TimeRange::Year.start_date(today), Some(date(2024, 1, 1)));
    }

    #[test]
    fn quarter_boundaries() {
        assert_eq!(TimeRange::Quarter.start_date(date(2024, 3, 31)), Some(date(2024, 1, 1)));
        assert_eq!(TimeRange::Quarter.start_date(date(2024, 4, 1)), Some(date(2024, 4, 1)));
        assert_eq!(TimeRange::Quarter.start_date(date(2024, 12, 31)), Some(date(2024, 10, 1)));
    }

    #[test]
    fn export_params_accept_camel_case_aliases() {
        let params: AchievementExportParams = serde_json::from_str(
            r#"{"categories":"Sports, Technical","timeRange":"quarter","includeDetails":"true"}"#,
        )
        .unwrap();
        assert_eq!(params.categories, vec!["Sports", "Technical"]);
        assert_eq!(params.time_range, TimeRange::Quarter);
        assert!(params.include_details);
        assert!(!params.include_charts);
    }

    #[test]
    fn achievement_date_accepts_day_first() {
        let dto: CreateAchievementDto = serde_json::from_str(
            r#"{"registration_number":"21A91A0501","title":"Hackathon","category":"Technical","achievement_date":"15/08/2024"}"#,
        )
        .unwrap();
        assert_eq!(dto.achievement_date, Some(date(2024, 8, 15)));
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn blank_title_is_invalid() {
        let dto = StudentAchievementDto {
            title: "   ".to_string(),
            description: None,
            category: "Sports".to_string(),
            achievement_date: None,
            scope: None,
        };
        assert!(dto.validate().is_err());
    }
}
