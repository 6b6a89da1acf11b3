use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use tracing::instrument;

use campuslens_core::AppError;
use campuslens_models::{
    ExportQuery, ReportKind, ReportQuery, ReportTypeInfo, SemesterPerformanceReport,
    StudentBatchQuery,
};
use campuslens_reports::archive::zip_files;
use campuslens_reports::export::{
    CsvWriter, HeaderStyle, TableWriter, XlsxWriter, check_column_count, student_table,
};
use campuslens_reports::pdf::student_reports_pdf;
use campuslens_reports::{DocumentFormat, html};

use crate::download::{Document, render_blocking};
use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::reports::service::ReportService;
use crate::state::AppState;

fn report_file_stem(kind: ReportKind, registration_number: &str) -> String {
    format!("{}_report_{}", kind.slug(), registration_number)
}

fn dated_stem(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}", prefix, date.format("%Y-%m-%d"))
}

#[utoipa::path(
    get,
    path = "/api/reports/types",
    responses(
        (status = 200, description = "Available report types", body = Vec<ReportTypeInfo>)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
#[instrument]
pub async fn get_report_types(_auth_user: AuthUser) -> Json<Vec<ReportTypeInfo>> {
    Json(ReportService::report_types())
}

/// Grades, SGPA per semester, CGPA and recommendations for one student
#[utoipa::path(
    get,
    path = "/api/reports/semester-performance/{reg_no}",
    params(("reg_no" = String, Path, description = "Registration number")),
    responses(
        (status = 200, description = "Performance report", body = SemesterPerformanceReport),
        (status = 403, description = "Not your record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn get_semester_performance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
) -> Result<Json<SemesterPerformanceReport>, AppError> {
    auth_user.ensure_can_access_student(&reg_no)?;
    let report = ReportService::performance_report(&state.db, &reg_no).await?;
    Ok(Json(report))
}

/// Printable HTML report for one student
#[utoipa::path(
    get,
    path = "/api/reports/generate-pdf/{reg_no}",
    params(
        ("reg_no" = String, Path, description = "Registration number"),
        ReportQuery
    ),
    responses(
        (status = 200, description = "HTML report", content_type = "text/html"),
        (status = 403, description = "Not your record", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn generate_report(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(reg_no): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Document, AppError> {
    auth_user.ensure_can_access_student(&reg_no)?;
    let report = ReportService::performance_report(&state.db, &reg_no).await?;
    let today = Utc::now().date_naive();

    let body = render_blocking(query.kind.slug(), DocumentFormat::Html, move || {
        Ok(html::student_report(&report, query.kind, query.include_charts, today).into_bytes())
    })
    .await?;

    Ok(Document::inline(DocumentFormat::Html, body))
}

/// Combined HTML preview of several student reports
#[utoipa::path(
    get,
    path = "/api/reports/preview-pdf",
    params(StudentBatchQuery),
    responses(
        (status = 200, description = "HTML preview", content_type = "text/html"),
        (status = 400, description = "No students selected", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn preview_reports(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<StudentBatchQuery>,
) -> Result<Document, AppError> {
    for reg_no in &query.students {
        auth_user.ensure_can_access_student(reg_no)?;
    }
    let reports = ReportService::performance_reports(&state.db, &query.students).await?;
    let today = Utc::now().date_naive();

    let body = render_blocking(query.kind.slug(), DocumentFormat::Html, move || {
        Ok(html::combined_report(&reports, query.kind, query.include_charts, today).into_bytes())
    })
    .await?;

    Ok(Document::inline(DocumentFormat::Html, body))
}

/// One PDF, a combined PDF, or a zip of individual PDFs
#[utoipa::path(
    get,
    path = "/api/reports/download-pdf",
    params(StudentBatchQuery),
    responses(
        (status = 200, description = "PDF or zip download", content_type = "application/pdf"),
        (status = 400, description = "No students selected", body = ErrorResponse),
        (status = 403, description = "Staff role required", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn download_reports(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<StudentBatchQuery>,
) -> Result<Document, AppError> {
    auth_user.ensure_staff()?;
    let reports = ReportService::performance_reports(&state.db, &query.students).await?;
    let today = Utc::now().date_naive();
    let kind = query.kind;

    if let [report] = reports.as_slice() {
        let stem = report_file_stem(kind, &report.student.registration_number);
        let body = render_blocking(kind.slug(), DocumentFormat::Pdf, move || {
            student_reports_pdf(&reports, kind, today)
        })
        .await?;
        return Ok(Document::attachment(DocumentFormat::Pdf, stem, body));
    }

    if query.is_individual {
        let body = render_blocking(kind.slug(), DocumentFormat::Zip, move || {
            let files = reports
                .par_iter()
                .map(|report| {
                    let name = format!(
                        "{}.pdf",
                        report_file_stem(kind, &report.student.registration_number)
                    );
                    student_reports_pdf(std::slice::from_ref(report), kind, today)
                        .map(|bytes| (name, bytes))
                })
                .collect::<Result<Vec<_>, _>>()?;
            zip_files(&files)
        })
        .await?;
        return Ok(Document::attachment(
            DocumentFormat::Zip,
            dated_stem("individual_reports", today),
            body,
        ));
    }

    let body = render_blocking(kind.slug(), DocumentFormat::Pdf, move || {
        student_reports_pdf(&reports, kind, today)
    })
    .await?;
    Ok(Document::attachment(
        DocumentFormat::Pdf,
        dated_stem("combined_report", today),
        body,
    ))
}

async fn export_students<W>(
    state: &AppState,
    query: ExportQuery,
    writer: W,
    style: HeaderStyle,
) -> Result<Document, AppError>
where
    W: TableWriter + Send + 'static,
{
    check_column_count(query.columns.len()).map_err(AppError::bad_request)?;
    let reports = ReportService::performance_reports(&state.db, &query.students).await?;
    let format = writer.format();

    let body = render_blocking("students", format, move || {
        writer.write(&student_table(&reports, &query.columns, style))
    })
    .await?;

    Ok(Document::attachment(
        format,
        dated_stem("student_report", Utc::now().date_naive()),
        body,
    ))
}

/// Student figures as an Excel workbook
#[utoipa::path(
    get,
    path = "/api/reports/excel",
    params(ExportQuery),
    responses(
        (status = 200, description = "Excel workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "No students selected", body = ErrorResponse),
        (status = 403, description = "Staff role required", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn export_excel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ExportQuery>,
) -> Result<Document, AppError> {
    auth_user.ensure_staff()?;
    export_students(&state, query, XlsxWriter, HeaderStyle::Key).await
}

#[utoipa::path(
    get,
    path = "/api/reports/csv",
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 400, description = "No students selected", body = ErrorResponse),
        (status = 403, description = "Staff role required", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
#[instrument(skip(state))]
pub async fn export_csv(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ExportQuery>,
) -> Result<Document, AppError> {
    auth_user.ensure_staff()?;
    export_students(&state, query, CsvWriter, HeaderStyle::Label).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_names() {
        let date = NaiveDate::from_ymd_opt(2024, 8, 20).unwrap();
        assert_eq!(
            report_file_stem(ReportKind::Backlog, "21A91A0501"),
            "backlog_report_21A91A0501"
        );
        assert_eq!(
            dated_stem("individual_reports", date),
            "individual_reports_2024-08-20"
        );
    }
}
