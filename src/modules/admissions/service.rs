use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use campuslens_core::{AppError, PageParams};
use campuslens_models::{
    Admission, AdmissionAnalytics, AdmissionFilterOptions, AdmissionFilters, AdmissionPage,
    Breakdown,
};

/// Number of states shown in the analytics breakdown.
const TOP_STATES: i64 = 6;

const FILTER_CLAUSE: &str = r#"($1::text IS NULL OR branch = $1)
  AND ($2::text IS NULL OR gender = $2)
  AND ($3::text IS NULL OR seat_type = $3)
  AND ($4::text IS NULL OR state = $4)
  AND ($5::text IS NULL OR country = $5)"#;

/// Columns admissions can be grouped by. Only these names are ever
/// interpolated into SQL.
#[derive(Debug, Clone, Copy)]
enum GroupColumn {
    Branch,
    Gender,
    SeatType,
    State,
    Country,
}

impl GroupColumn {
    fn name(self) -> &'static str {
        match self {
            GroupColumn::Branch => "branch",
            GroupColumn::Gender => "gender",
            GroupColumn::SeatType => "seat_type",
            GroupColumn::State => "state",
            GroupColumn::Country => "country",
        }
    }
}

pub struct AdmissionService;

impl AdmissionService {
    async fn breakdown(
        db: &PgPool,
        column: GroupColumn,
        filters: &AdmissionFilters,
        limit: Option<i64>,
    ) -> Result<Breakdown, AppError> {
        let column = column.name();
        let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
            r#"SELECT {column}, COUNT(*) FROM admissions
               WHERE {column} IS NOT NULL AND {FILTER_CLAUSE}
               GROUP BY {column}
               ORDER BY COUNT(*) DESC, {column}
               LIMIT $6"#
        ))
        .bind(&filters.branch)
        .bind(&filters.gender)
        .bind(&filters.seat_type)
        .bind(&filters.state)
        .bind(&filters.country)
        .bind(limit)
        .fetch_all(db)
        .await
        .with_context(|| format!("Failed to group admissions by {column}"))
        .map_err(AppError::database)?;

        Ok(rows.into_iter().collect())
    }

    async fn count(db: &PgPool, filters: &AdmissionFilters) -> Result<i64, AppError> {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM admissions WHERE {FILTER_CLAUSE}"))
            .bind(&filters.branch)
            .bind(&filters.gender)
            .bind(&filters.seat_type)
            .bind(&filters.state)
            .bind(&filters.country)
            .fetch_one(db)
            .await
            .context("Failed to count admissions")
            .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn analytics(
        db: &PgPool,
        filters: &AdmissionFilters,
    ) -> Result<AdmissionAnalytics, AppError> {
        let (total_admissions, by_branch, by_gender, by_seat_type, by_state, by_country) = tokio::try_join!(
            Self::count(db, filters),
            Self::breakdown(db, GroupColumn::Branch, filters, None),
            Self::breakdown(db, GroupColumn::Gender, filters, None),
            Self::breakdown(db, GroupColumn::SeatType, filters, None),
            Self::breakdown(db, GroupColumn::State, filters, Some(TOP_STATES)),
            Self::breakdown(db, GroupColumn::Country, filters, None),
        )?;

        Ok(AdmissionAnalytics {
            total_admissions,
            by_branch,
            by_gender,
            by_seat_type,
            by_state,
            by_country,
        })
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: &AdmissionFilters,
        page: &PageParams,
    ) -> Result<AdmissionPage, AppError> {
        let total = Self::count(db, filters).await?;

        let data = sqlx::query_as::<_, Admission>(&format!(
            r#"SELECT id, student_name, branch, gender, seat_type, state, country,
                      admission_year, created_at
               FROM admissions
               WHERE {FILTER_CLAUSE}
               ORDER BY created_at DESC, student_name
               LIMIT $6 OFFSET $7"#
        ))
        .bind(&filters.branch)
        .bind(&filters.gender)
        .bind(&filters.seat_type)
        .bind(&filters.state)
        .bind(&filters.country)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch admissions")
        .map_err(AppError::database)?;

        Ok(AdmissionPage {
            total,
            page: page.page(),
            limit: page.limit(),
            data,
        })
    }

    async fn distinct(db: &PgPool, column: GroupColumn) -> Result<Vec<String>, AppError> {
        let column = column.name();
        sqlx::query_scalar(&format!(
            "SELECT DISTINCT {column} FROM admissions WHERE {column} IS NOT NULL ORDER BY {column}"
        ))
        .fetch_all(db)
        .await
        .with_context(|| format!("Failed to list admission {column} values"))
        .map_err(AppError::database)
    }

    #[instrument(skip(db))]
    pub async fn filter_options(db: &PgPool) -> Result<AdmissionFilterOptions, AppError> {
        let (branches, genders, seat_types, states, countries) = tokio::try_join!(
            Self::distinct(db, GroupColumn::Branch),
            Self::distinct(db, GroupColumn::Gender),
            Self::distinct(db, GroupColumn::SeatType),
            Self::distinct(db, GroupColumn::State),
            Self::distinct(db, GroupColumn::Country),
        )?;

        Ok(AdmissionFilterOptions {
            branches,
            genders,
            seat_types,
            states,
            countries,
        })
    }
}
