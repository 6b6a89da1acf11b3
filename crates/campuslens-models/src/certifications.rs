//! Certifications and certificate rendering input.

use chrono::{DateTime, NaiveDate, Utc};
use campuslens_core::serde::{deserialize_optional_date, parse_flexible_date};
use campuslens_core::validation::not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_CERTIFICATION_TYPE: &str = "other";
pub const DEFAULT_VALIDATION_URL: &str = "https://ofzen.in";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Certification {
    pub id: Uuid,
    pub registration_number: String,
    pub student_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub certificate_url: Option<String>,
    pub certification_type: String,
    pub verified: bool,
    pub verified_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields of a multipart certification form.
///
/// Every field is optional here; [`CertificationFields::missing_for_create`]
/// reports what a new certification still needs.
#[derive(Debug, Clone, Default, PartialEq, ToSchema)]
pub struct CertificationFields {
    pub registration_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub issuing_organization: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: Option<String>,
    pub certification_type: Option<String>,
}

impl CertificationFields {
    /// Records one form field. Unknown names are ignored; blank values
    /// are treated as absent.
    pub fn set(&mut self, name: &str, value: String) -> Result<(), String> {
        let value = value.trim().to_string();
        if value.is_empty() {
            return Ok(());
        }

        let parse_date = |v: &str| {
            parse_flexible_date(v).ok_or_else(|| format!("Invalid date for '{name}': {v}"))
        };

        match name {
            "registration_number" => self.registration_number = Some(value),
            "title" => self.title = Some(value),
            "description" => self.description = Some(value),
            "issuing_organization" => self.issuing_organization = Some(value),
            "issue_date" => self.issue_date = Some(parse_date(&value)?),
            "expiry_date" => self.expiry_date = Some(parse_date(&value)?),
            "credential_id" => self.credential_id = Some(value),
            "certification_type" => self.certification_type = Some(value),
            _ => {}
        }
        Ok(())
    }

    pub fn missing_for_create(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.registration_number.is_none() {
            missing.push("registration_number");
        }
        if self.title.is_none() {
            missing.push("title");
        }
        missing
    }

    pub fn check_dates(&self) -> Result<(), String> {
        match (self.issue_date, self.expiry_date) {
            (Some(issue), Some(expiry)) if expiry < issue => {
                Err("expiry_date must not be before issue_date".to_string())
            }
            _ => Ok(()),
        }
    }
}

/// JSON body of `POST /students/{reg_no}/certifications`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStudentCertificationDto {
    #[validate(length(min = 1, max = 255), custom(function = "not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub issuing_organization: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>)]
    pub issue_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    #[schema(value_type = Option<String>)]
    pub expiry_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub credential_id: Option<String>,
    #[validate(url)]
    pub certificate_url: Option<String>,
    #[validate(length(max = 50))]
    pub certification_type: Option<String>,
}

impl CreateStudentCertificationDto {
    pub fn into_fields(self, registration_number: &str) -> (CertificationFields, Option<String>) {
        (
            CertificationFields {
                registration_number: Some(registration_number.to_string()),
                title: Some(self.title),
                description: self.description,
                issuing_organization: self.issuing_organization,
                issue_date: self.issue_date,
                expiry_date: self.expiry_date,
                credential_id: self.credential_id,
                certification_type: self.certification_type,
            },
            self.certificate_url,
        )
    }
}

/// Input for rendering a sample certificate.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DummyCertificateRequest {
    #[serde(alias = "certificationTitle")]
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub certification_title: String,
    #[serde(alias = "studentName")]
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub student_name: String,
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub issuer: String,
    #[serde(alias = "issueDate")]
    pub issue_date: Option<String>,
    #[serde(alias = "expiryDate")]
    pub expiry_date: Option<String>,
    #[serde(alias = "credentialId")]
    pub credential_id: Option<String>,
    #[serde(alias = "validationUrl")]
    pub validation_url: Option<String>,
    #[serde(alias = "logo")]
    pub logo_url: Option<String>,
}

impl DummyCertificateRequest {
    pub fn validation_url(&self) -> &str {
        self.validation_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_VALIDATION_URL)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}
