use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_models::achievements::DEFAULT_SCOPE;
use campuslens_models::{Achievement, CreateAchievementDto, UpdateAchievementDto};

use crate::modules::students::service::StudentService;

pub const LINK_STATUS_KEY: &str = "achievement_link_active";

const ACHIEVEMENT_SELECT: &str = r#"SELECT a.id, a.registration_number, s.name AS student_name, a.title,
       a.description, a.category, a.achievement_date, a.scope, a.created_at, a.updated_at
FROM achievements a
LEFT JOIN students s ON s.registration_number = a.registration_number"#;

pub struct AchievementService;

impl AchievementService {
    #[instrument(skip(db))]
    pub async fn get_all(db: &PgPool) -> Result<Vec<Achievement>, AppError> {
        let achievements = sqlx::query_as::<_, Achievement>(&format!(
            "{ACHIEVEMENT_SELECT} ORDER BY a.achievement_date DESC NULLS LAST, a.created_at DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch achievements")
        .map_err(AppError::database)?;

        Ok(achievements)
    }

    #[instrument(skip(db))]
    pub async fn get_by_student(
        db: &PgPool,
        registration_number: &str,
    ) -> Result<Vec<Achievement>, AppError> {
        let achievements = sqlx::query_as::<_, Achievement>(&format!(
            "{ACHIEVEMENT_SELECT} WHERE a.registration_number = $1
             ORDER BY a.achievement_date DESC NULLS LAST, a.created_at DESC"
        ))
        .bind(registration_number)
        .fetch_all(db)
        .await
        .context("Failed to fetch student achievements")
        .map_err(AppError::database)?;

        Ok(achievements)
    }

    async fn get_achievement(db: &PgPool, id: Uuid) -> Result<Achievement, AppError> {
        sqlx::query_as::<_, Achievement>(&format!("{ACHIEVEMENT_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch achievement")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Achievement not found")))
    }

    #[instrument(skip(db, dto), fields(registration_number = %dto.registration_number))]
    pub async fn create_achievement(
        db: &PgPool,
        dto: CreateAchievementDto,
    ) -> Result<Achievement, AppError> {
        StudentService::ensure_exists(db, &dto.registration_number).await?;

        let scope = dto
            .scope
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SCOPE);

        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO achievements (registration_number, title, description, category,
                                         achievement_date, scope)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING id"#,
        )
        .bind(&dto.registration_number)
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.category.trim())
        .bind(dto.achievement_date)
        .bind(scope)
        .fetch_one(db)
        .await
        .context("Failed to insert achievement")
        .map_err(AppError::database)?;

        Self::get_achievement(db, id).await
    }

    /// With `owner`, the achievement must belong to that student or the
    /// call fails with 404.
    #[instrument(skip(db, dto))]
    pub async fn update_achievement(
        db: &PgPool,
        id: Uuid,
        owner: Option<&str>,
        dto: UpdateAchievementDto,
    ) -> Result<Achievement, AppError> {
        let updated = sqlx::query(
            r#"UPDATE achievements SET
                   title = $3,
                   description = $4,
                   category = $5,
                   achievement_date = $6,
                   scope = COALESCE($7, scope),
                   updated_at = NOW()
               WHERE id = $1 AND ($2::text IS NULL OR registration_number = $2)"#,
        )
        .bind(id)
        .bind(owner)
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(dto.category.trim())
        .bind(dto.achievement_date)
        .bind(&dto.scope)
        .execute(db)
        .await
        .context("Failed to update achievement")
        .map_err(AppError::database)?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Achievement not found")));
        }

        Self::get_achievement(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_achievement(
        db: &PgPool,
        id: Uuid,
        owner: Option<&str>,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM achievements WHERE id = $1 AND ($2::text IS NULL OR registration_number = $2)",
        )
        .bind(id)
        .bind(owner)
        .execute(db)
        .await
        .context("Failed to delete achievement")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Achievement not found")));
        }
        Ok(())
    }

    /// Whether students may submit achievements. Open until a staff member
    /// closes it.
    #[instrument(skip(db))]
    pub async fn link_status(db: &PgPool) -> Result<bool, AppError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key_name = $1")
                .bind(LINK_STATUS_KEY)
                .fetch_optional(db)
                .await
                .context("Failed to read achievement link status")
                .map_err(AppError::database)?;

        Ok(value.is_none_or(|v| v.trim().eq_ignore_ascii_case("true")))
    }

    #[instrument(skip(db))]
    pub async fn set_link_status(db: &PgPool, active: bool) -> Result<bool, AppError> {
        sqlx::query(
            r#"INSERT INTO settings (key_name, value) VALUES ($1, $2)
               ON CONFLICT (key_name) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()"#,
        )
        .bind(LINK_STATUS_KEY)
        .bind(active.to_string())
        .execute(db)
        .await
        .context("Failed to update achievement link status")
        .map_err(AppError::database)?;

        Ok(active)
    }

    /// Achievements for an export: newest first, limited to `categories`
    /// when non-empty and to dates on or after `since`.
    #[instrument(skip(db))]
    pub async fn list_for_export(
        db: &PgPool,
        categories: &[String],
        since: Option<NaiveDate>,
    ) -> Result<Vec<Achievement>, AppError> {
        let achievements = sqlx::query_as::<_, Achievement>(&format!(
            r#"{ACHIEVEMENT_SELECT}
               WHERE (cardinality($1::text[]) = 0 OR a.category = ANY($1))
                 AND ($2::date IS NULL OR a.achievement_date >= $2)
               ORDER BY a.achievement_date DESC NULLS LAST, a.created_at DESC"#
        ))
        .bind(categories)
        .bind(since)
        .fetch_all(db)
        .await
        .context("Failed to fetch achievements for export")
        .map_err(AppError::database)?;

        Ok(achievements)
    }
}
