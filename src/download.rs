//! Responses for generated documents.

use std::time::Instant;

use anyhow::anyhow;
use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use campuslens_core::AppError;
use campuslens_reports::{DocumentFormat, ReportError};

use crate::metrics::track_document_rendered;

/// Rendered bytes plus how the browser should treat them. Without a file
/// name the document is shown inline.
#[derive(Debug)]
pub struct Document {
    pub format: DocumentFormat,
    pub file_stem: Option<String>,
    pub body: Vec<u8>,
}

impl Document {
    pub fn attachment(format: DocumentFormat, file_stem: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            format,
            file_stem: Some(file_stem.into()),
            body,
        }
    }

    pub fn inline(format: DocumentFormat, body: Vec<u8>) -> Self {
        Self {
            format,
            file_stem: None,
            body,
        }
    }
}

impl IntoResponse for Document {
    fn into_response(self) -> Response {
        let content_type = self.format.content_type();
        match self.file_stem {
            Some(stem) => (
                [
                    (header::CONTENT_TYPE, content_type.to_string()),
                    (header::CONTENT_DISPOSITION, self.format.attachment(&stem)),
                ],
                self.body,
            )
                .into_response(),
            None => ([(header::CONTENT_TYPE, content_type)], self.body).into_response(),
        }
    }
}

fn format_label(format: DocumentFormat) -> &'static str {
    match format {
        DocumentFormat::Html => "html",
        DocumentFormat::Pdf => "pdf",
        DocumentFormat::Xlsx => "xlsx",
        DocumentFormat::Csv => "csv",
        DocumentFormat::Zip => "zip",
    }
}

/// Runs a renderer on the blocking pool and records how long it took.
/// Empty input and oversized tables become a 400; every other failure is a 500.
pub async fn render_blocking<F>(
    kind: &'static str,
    format: DocumentFormat,
    render: F,
) -> Result<Vec<u8>, AppError>
where
    F: FnOnce() -> Result<Vec<u8>, ReportError> + Send + 'static,
{
    let started = Instant::now();
    let result = tokio::task::spawn_blocking(render)
        .await
        .map_err(|e| AppError::internal(anyhow!("Renderer task failed: {e}")))?;

    match result {
        Ok(bytes) => {
            track_document_rendered(kind, format_label(format), started.elapsed().as_secs_f64());
            Ok(bytes)
        }
        Err(e @ (ReportError::Empty | ReportError::TooManyColumns { .. })) => {
            Err(AppError::bad_request(e))
        }
        Err(e) => {
            tracing::error!(kind, error = %e, "Document rendering failed");
            Err(AppError::internal(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_sets_disposition() {
        let response =
            Document::attachment(DocumentFormat::Csv, "achievements_2024-08-20", b"a,b".to_vec())
                .into_response();
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"achievements_2024-08-20.csv\""
        );
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv; charset=utf-8");
    }

    #[test]
    fn inline_has_no_disposition() {
        let response = Document::inline(DocumentFormat::Html, b"<p>hi</p>".to_vec()).into_response();
        assert!(response.headers().get(header::CONTENT_DISPOSITION).is_none());
    }

    #[tokio::test]
    async fn empty_render_is_a_client_error() {
        let err = render_blocking("test", DocumentFormat::Pdf, || Err(ReportError::Empty))
            .await
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[tokio::test]
    async fn oversized_table_is_a_client_error() {
        let err = render_blocking("test", DocumentFormat::Xlsx, || {
            Err(ReportError::TooManyColumns {
                count: 20_000,
                max: 16_384,
            })
        })
        .await
        .unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }
}
