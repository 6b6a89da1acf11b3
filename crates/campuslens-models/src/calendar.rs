//! Academic calendar events.

use chrono::{DateTime, Utc};
use campuslens_core::serde::{deserialize_flexible_datetime, deserialize_optional_i32, deserialize_optional_string};
use campuslens_core::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub event_type: String,
    pub academic_year: String,
    /// Comma separated years (`1,2`) or `all`
    pub student_years: String,
    pub location: String,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Calendar widgets expect `start`, `end` and a display color alongside the event.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CalendarEventView {
    #[serde(flatten)]
    pub event: CalendarEvent,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub color: String,
}

impl From<CalendarEvent> for CalendarEventView {
    fn from(event: CalendarEvent) -> Self {
        Self {
            start: event.start_date,
            end: event.end_date,
            color: event_color(&event.event_type).to_string(),
            event,
        }
    }
}

pub fn event_color(event_type: &str) -> &'static str {
    match event_type.to_ascii_lowercase().as_str() {
        "holiday" => "#f44336",
        "exam" => "#2196f3",
        "workshop" => "#4caf50",
        "seminar" => "#ff9800",
        "submission" => "#9c27b0",
        _ => "#757575",
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CalendarFilterParams {
    #[serde(default, alias = "academicYear", deserialize_with = "deserialize_optional_string")]
    pub academic_year: Option<String>,
    /// Ignored when `all`
    #[serde(default, alias = "eventType", deserialize_with = "deserialize_optional_string")]
    pub event_type: Option<String>,
    /// Zero-based month (January is 0)
    #[serde(default, deserialize_with = "deserialize_optional_i32")]
    pub month: Option<i32>,
    #[serde(default, alias = "studentYear", deserialize_with = "deserialize_optional_string")]
    pub student_year: Option<String>,
}

impl CalendarFilterParams {
    pub fn event_type_filter(&self) -> Option<&str> {
        self.event_type
            .as_deref()
            .filter(|t| !t.eq_ignore_ascii_case("all"))
    }

    /// Calendar month 1-12, or `None` when absent or out of range.
    pub fn calendar_month(&self) -> Option<i32> {
        self.month.filter(|m| (0..12).contains(m)).map(|m| m + 1)
    }

    pub fn student_year_filter(&self) -> Option<&str> {
        self.student_year
            .as_deref()
            .filter(|y| !y.eq_ignore_ascii_case("all"))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_event_window"))]
pub struct CalendarEventDto {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    #[schema(value_type = String, example = "2024-11-04T09:00:00Z")]
    pub start_date: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_flexible_datetime")]
    #[schema(value_type = String, example = "2024-11-08T17:00:00Z")]
    pub end_date: DateTime<Utc>,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub event_type: String,
    #[validate(length(min = 1, max = 20), custom(function = "not_blank"))]
    pub academic_year: String,
    #[validate(length(max = 50))]
    pub student_years: Option<String>,
    #[validate(length(max = 255))]
    pub location: Option<String>,
}

fn validate_event_window(dto: &CalendarEventDto) -> Result<(), ValidationError> {
    if dto.end_date < dto.start_date {
        let mut err = ValidationError::new("event_window");
        err.message = Some("end_date must not be before start_date".into());
        return Err(err);
    }
    Ok(())
}

impl CalendarEventDto {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn student_years(&self) -> &str {
        self.student_years
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("all")
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or("")
    }
}
