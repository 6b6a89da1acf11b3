use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_models::{CounselingNote, CreateCounselingNoteDto, UpdateCounselingNoteDto};

use crate::modules::students::service::StudentService;

const NOTE_SELECT: &str = r#"SELECT n.id, n.registration_number, n.faculty_id,
       NULLIF(TRIM(CONCAT(u.first_name, ' ', u.last_name)), '') AS faculty_name,
       n.note, n.counseling_date, n.created_at, n.updated_at
FROM counseling_notes n
LEFT JOIN users u ON u.id = n.faculty_id"#;

pub struct CounselingService;

impl CounselingService {
    /// Notes of one student, newest session first.
    #[instrument(skip(db))]
    pub async fn list_notes(
        db: &PgPool,
        registration_number: &str,
    ) -> Result<Vec<CounselingNote>, AppError> {
        let notes = sqlx::query_as::<_, CounselingNote>(&format!(
            "{NOTE_SELECT} WHERE n.registration_number = $1
             ORDER BY n.counseling_date DESC, n.created_at DESC"
        ))
        .bind(registration_number)
        .fetch_all(db)
        .await
        .context("Failed to fetch counseling notes")
        .map_err(AppError::database)?;

        Ok(notes)
    }

    async fn get_note(db: &PgPool, id: Uuid) -> Result<CounselingNote, AppError> {
        sqlx::query_as::<_, CounselingNote>(&format!("{NOTE_SELECT} WHERE n.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch counseling note")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Counseling note not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn create_note(
        db: &PgPool,
        registration_number: &str,
        faculty_id: Uuid,
        dto: CreateCounselingNoteDto,
    ) -> Result<CounselingNote, AppError> {
        StudentService::ensure_exists(db, registration_number).await?;

        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO counseling_notes (registration_number, faculty_id, note, counseling_date)
               VALUES ($1, $2, $3, $4)
               RETURNING id"#,
        )
        .bind(registration_number)
        .bind(faculty_id)
        .bind(dto.note.trim())
        .bind(dto.counseling_date)
        .fetch_one(db)
        .await
        .context("Failed to insert counseling note")
        .map_err(AppError::database)?;

        Self::get_note(db, id).await
    }

    #[instrument(skip(db, dto))]
    pub async fn update_note(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCounselingNoteDto,
    ) -> Result<CounselingNote, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow!("No fields to update")));
        }

        let result = sqlx::query(
            r#"UPDATE counseling_notes SET
                   note = COALESCE($2, note),
                   counseling_date = COALESCE($3, counseling_date),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(dto.note.as_deref().map(str::trim))
        .bind(dto.counseling_date)
        .execute(db)
        .await
        .context("Failed to update counseling note")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Counseling note not found")));
        }

        Self::get_note(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_note(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM counseling_notes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete counseling note")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Counseling note not found")));
        }
        Ok(())
    }
}
