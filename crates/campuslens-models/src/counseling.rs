//! Counseling notes written by faculty.

use chrono::{DateTime, NaiveDate, Utc};
use campuslens_core::serde::{deserialize_flexible_date, deserialize_optional_date};
use campuslens_core::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CounselingNote {
    pub id: Uuid,
    pub registration_number: String,
    pub faculty_id: Option<Uuid>,
    pub faculty_name: Option<String>,
    pub note: String,
    pub counseling_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCounselingNoteDto {
    #[validate(length(min = 1, max = 5000), custom(function = "not_blank"))]
    pub note: String,
    /// `DD/MM/YYYY` or `YYYY-MM-DD`
    #[serde(deserialize_with = "deserialize_flexible_date")]
    #[schema(value_type = String, example = "12/09/2024")]
    pub counseling_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCounselingNoteDto {
    #[validate(length(min = 1, max = 5000))]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>)]
    pub counseling_date: Option<NaiveDate>,
}

impl UpdateCounselingNoteDto {
    pub fn is_empty(&self) -> bool {
        self.note.is_none() && self.counseling_date.is_none()
    }
}
