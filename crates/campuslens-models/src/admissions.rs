//! Admission records and analytics.

use chrono::{DateTime, Utc};
use campuslens_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Admission {
    pub id: Uuid,
    pub student_name: String,
    pub branch: Option<String>,
    pub gender: Option<String>,
    pub seat_type: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub admission_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AdmissionFilters {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub gender: Option<String>,
    #[serde(default, alias = "seatType", deserialize_with = "deserialize_optional_string")]
    pub seat_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub country: Option<String>,
}

/// Chart-ready grouping: `labels[i]` has `data[i]` admissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Breakdown {
    pub labels: Vec<String>,
    pub data: Vec<i64>,
}

impl FromIterator<(String, i64)> for Breakdown {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        let (labels, data) = iter.into_iter().unzip();
        Self { labels, data }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdmissionAnalytics {
    pub total_admissions: i64,
    pub by_branch: Breakdown,
    pub by_gender: Breakdown,
    pub by_seat_type: Breakdown,
    /// Six states with the most admissions
    pub by_state: Breakdown,
    pub by_country: Breakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdmissionPage {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub data: Vec<Admission>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AdmissionFilterOptions {
    pub branches: Vec<String>,
    pub genders: Vec<String>,
    pub seat_types: Vec<String>,
    pub states: Vec<String>,
    pub countries: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakdown_collects_pairs_in_order() {
        let breakdown: Breakdown = vec![("CSE".to_string(), 40), ("ECE".to_string(), 25)]
            .into_iter()
            .collect();
        assert_eq!(breakdown.labels, vec!["CSE", "ECE"]);
        assert_eq!(breakdown.data, vec![40, 25]);
    }
}
