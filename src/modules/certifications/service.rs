use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use campuslens_core::AppError;
use campuslens_models::certifications::DEFAULT_CERTIFICATION_TYPE;
use campuslens_models::{Certification, CertificationFields};

use crate::modules::students::service::StudentService;

const CERTIFICATION_SELECT: &str = r#"SELECT c.id, c.registration_number, s.name AS student_name, c.title,
       c.description, c.issuing_organization, c.issue_date, c.expiry_date, c.credential_id,
       c.certificate_url, c.certification_type, c.verified, c.verified_by, c.created_at,
       c.updated_at
FROM certifications c
LEFT JOIN students s ON s.registration_number = c.registration_number"#;

pub struct CertificationService;

impl CertificationService {
    #[instrument(skip(db))]
    pub async fn get_all(db: &PgPool) -> Result<Vec<Certification>, AppError> {
        let certifications = sqlx::query_as::<_, Certification>(&format!(
            "{CERTIFICATION_SELECT} ORDER BY c.created_at DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch certifications")
        .map_err(AppError::database)?;

        Ok(certifications)
    }

    #[instrument(skip(db))]
    pub async fn get_by_student(
        db: &PgPool,
        registration_number: &str,
    ) -> Result<Vec<Certification>, AppError> {
        let certifications = sqlx::query_as::<_, Certification>(&format!(
            "{CERTIFICATION_SELECT} WHERE c.registration_number = $1
             ORDER BY c.issue_date DESC NULLS LAST, c.created_at DESC"
        ))
        .bind(registration_number)
        .fetch_all(db)
        .await
        .context("Failed to fetch student certifications")
        .map_err(AppError::database)?;

        Ok(certifications)
    }

    #[instrument(skip(db))]
    pub async fn get_certification(db: &PgPool, id: Uuid) -> Result<Certification, AppError> {
        sqlx::query_as::<_, Certification>(&format!("{CERTIFICATION_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch certification")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Certification not found")))
    }

    #[instrument(skip(db, fields))]
    pub async fn create_certification(
        db: &PgPool,
        fields: CertificationFields,
        certificate_url: Option<String>,
    ) -> Result<Certification, AppError> {
        let missing = fields.missing_for_create();
        if !missing.is_empty() {
            return Err(AppError::unprocessable(anyhow!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        fields
            .check_dates()
            .map_err(|e| AppError::unprocessable(anyhow!(e)))?;

        let registration_number = fields.registration_number.as_deref().unwrap_or_default();
        StudentService::ensure_exists(db, registration_number).await?;

        let certification_type = fields
            .certification_type
            .as_deref()
            .unwrap_or(DEFAULT_CERTIFICATION_TYPE);

        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO certifications (registration_number, title, description,
                                           issuing_organization, issue_date, expiry_date,
                                           credential_id, certificate_url, certification_type)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING id"#,
        )
        .bind(registration_number)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.issuing_organization)
        .bind(fields.issue_date)
        .bind(fields.expiry_date)
        .bind(&fields.credential_id)
        .bind(&certificate_url)
        .bind(certification_type)
        .fetch_one(db)
        .await
        .context("Failed to insert certification")
        .map_err(AppError::database)?;

        Self::get_certification(db, id).await
    }

    /// Applies the present fields. When `certificate_url` is given it
    /// replaces the stored one; the replaced URL is returned so the caller
    /// can remove the old file.
    #[instrument(skip(db, fields))]
    pub async fn update_certification(
        db: &PgPool,
        id: Uuid,
        fields: CertificationFields,
        certificate_url: Option<String>,
    ) -> Result<(Certification, Option<String>), AppError> {
        let existing = Self::get_certification(db, id).await?;

        let merged = CertificationFields {
            issue_date: fields.issue_date.or(existing.issue_date),
            expiry_date: fields.expiry_date.or(existing.expiry_date),
            ..Default::default()
        };
        merged
            .check_dates()
            .map_err(|e| AppError::unprocessable(anyhow!(e)))?;

        sqlx::query(
            r#"UPDATE certifications SET
                   title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   issuing_organization = COALESCE($4, issuing_organization),
                   issue_date = COALESCE($5, issue_date),
                   expiry_date = COALESCE($6, expiry_date),
                   credential_id = COALESCE($7, credential_id),
                   certificate_url = COALESCE($8, certificate_url),
                   certification_type = COALESCE($9, certification_type),
                   updated_at = NOW()
               WHERE id = $1"#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.issuing_organization)
        .bind(fields.issue_date)
        .bind(fields.expiry_date)
        .bind(&fields.credential_id)
        .bind(&certificate_url)
        .bind(&fields.certification_type)
        .execute(db)
        .await
        .context("Failed to update certification")
        .map_err(AppError::database)?;

        let replaced = certificate_url
            .is_some()
            .then_some(existing.certificate_url)
            .flatten();

        Ok((Self::get_certification(db, id).await?, replaced))
    }

    /// Removes the row and returns it so the caller can delete the file.
    #[instrument(skip(db))]
    pub async fn delete_certification(db: &PgPool, id: Uuid) -> Result<Certification, AppError> {
        let certification = Self::get_certification(db, id).await?;

        sqlx::query("DELETE FROM certifications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete certification")
            .map_err(AppError::database)?;

        Ok(certification)
    }

    #[instrument(skip(db))]
    pub async fn verify_certification(
        db: &PgPool,
        id: Uuid,
        verified_by: Uuid,
    ) -> Result<Certification, AppError> {
        let result = sqlx::query(
            "UPDATE certifications SET verified = TRUE, verified_by = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(verified_by)
        .execute(db)
        .await
        .context("Failed to verify certification")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Certification not found")));
        }

        Self::get_certification(db, id).await
    }
}
