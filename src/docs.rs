use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use campuslens_auth::{Claims, Role};
use campuslens_models::{
    AcademicStatus, AccessTokenResponse, Achievement, AdmissionAnalytics, AdmissionFilterOptions,
    AdmissionPage, Admission, BranchCount, Breakdown, CalendarEventDto, CalendarEventView,
    Certification, CounselingNote, Course, CreateAchievementDto, CreateCounselingNoteDto,
    CreateCourseDto, CreateStudentCertificationDto, CreateStudentDto, CreateUserDto,
    DashboardScope, DashboardStats, DummyCertificateRequest, FacultyDashboard, GradeDetail,
    LinkStatus, LoginRequest, LoginResponse, LoginUser, MappingResult, MenuItem, MessageResponse,
    ProctorMappingDto, RecentActivity, RefreshTokenRequest, ReportKind, ReportTypeInfo,
    SemesterAverage, SemesterPerformanceReport, SemesterSgpa, Student, StudentAchievementDto,
    StudentDetail, StudentSummary, TimeRange, TokenPair, TopStudent, UpdateAchievementDto,
    UpdateCounselingNoteDto, UpdateStudentDto, UpdateUserDto, UploadResponse, UpsertGradeDto,
    User,
};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::certifications::controller::CertificationForm;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::me,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::menu::controller::get_faculty_menu,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::create_course,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::upsert_grade,
        crate::modules::students::controller::add_student_achievement,
        crate::modules::students::controller::update_student_achievement,
        crate::modules::students::controller::delete_student_achievement,
        crate::modules::students::controller::add_student_certification,
        crate::modules::faculty::controller::get_all_students,
        crate::modules::faculty::controller::get_my_students,
        crate::modules::faculty::controller::add_mappings,
        crate::modules::faculty::controller::remove_mappings,
        crate::modules::faculty::controller::get_dashboard,
        crate::modules::achievements::controller::get_achievements,
        crate::modules::achievements::controller::get_student_achievements,
        crate::modules::achievements::controller::create_achievement,
        crate::modules::achievements::controller::update_achievement,
        crate::modules::achievements::controller::delete_achievement,
        crate::modules::achievements::controller::get_link_status,
        crate::modules::achievements::controller::set_link_status,
        crate::modules::achievements::controller::export_pdf,
        crate::modules::achievements::controller::export_excel,
        crate::modules::achievements::controller::export_csv,
        crate::modules::certifications::controller::get_certifications,
        crate::modules::certifications::controller::create_certification,
        crate::modules::certifications::controller::update_certification,
        crate::modules::certifications::controller::delete_certification,
        crate::modules::certifications::controller::verify_certification,
        crate::modules::certifications::controller::upload_certificate,
        crate::modules::certifications::controller::generate_dummy_certificate,
        crate::modules::counseling::controller::get_student_notes,
        crate::modules::counseling::controller::create_note,
        crate::modules::counseling::controller::update_note,
        crate::modules::counseling::controller::delete_note,
        crate::modules::calendar::controller::get_events,
        crate::modules::calendar::controller::create_event,
        crate::modules::calendar::controller::update_event,
        crate::modules::calendar::controller::delete_event,
        crate::modules::admissions::controller::get_analytics,
        crate::modules::admissions::controller::get_admissions,
        crate::modules::admissions::controller::get_filter_options,
        crate::modules::reports::controller::get_report_types,
        crate::modules::reports::controller::get_semester_performance,
        crate::modules::reports::controller::generate_report,
        crate::modules::reports::controller::preview_reports,
        crate::modules::reports::controller::download_reports,
        crate::modules::reports::controller::export_excel,
        crate::modules::reports::controller::export_csv,
    ),
    components(
        schemas(
            ErrorResponse,
            Claims,
            Role,
            LoginRequest,
            LoginUser,
            LoginResponse,
            TokenPair,
            RefreshTokenRequest,
            AccessTokenResponse,
            MessageResponse,
            User,
            CreateUserDto,
            UpdateUserDto,
            MenuItem,
            Course,
            CreateCourseDto,
            GradeDetail,
            UpsertGradeDto,
            SemesterSgpa,
            AcademicStatus,
            Student,
            StudentSummary,
            StudentDetail,
            CreateStudentDto,
            UpdateStudentDto,
            ProctorMappingDto,
            MappingResult,
            DashboardScope,
            DashboardStats,
            TopStudent,
            RecentActivity,
            SemesterAverage,
            BranchCount,
            FacultyDashboard,
            Achievement,
            CreateAchievementDto,
            StudentAchievementDto,
            UpdateAchievementDto,
            LinkStatus,
            TimeRange,
            Certification,
            CertificationForm,
            CreateStudentCertificationDto,
            DummyCertificateRequest,
            UploadResponse,
            CounselingNote,
            CreateCounselingNoteDto,
            UpdateCounselingNoteDto,
            CalendarEventView,
            CalendarEventDto,
            Admission,
            Breakdown,
            AdmissionAnalytics,
            AdmissionPage,
            AdmissionFilterOptions,
            ReportKind,
            ReportTypeInfo,
            SemesterPerformanceReport,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, token refresh and logout"),
        (name = "Users", description = "Staff account management"),
        (name = "Menu", description = "Faculty portal navigation"),
        (name = "Courses", description = "Course catalogue"),
        (name = "Students", description = "Student records, grades and submissions"),
        (name = "Faculty", description = "Proctoring and the faculty dashboard"),
        (name = "Achievements", description = "Student achievements and exports"),
        (name = "Certifications", description = "Certifications and certificate files"),
        (name = "Counseling", description = "Counseling notes"),
        (name = "Calendar", description = "Academic calendar events"),
        (name = "Admissions", description = "Admission records and analytics"),
        (name = "Reports", description = "Performance reports and exports")
    ),
    info(
        title = "CampusLens API",
        version = "0.1.0",
        description = "College administration and academic reporting API built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_has_bearer_scheme_and_report_paths() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(doc.paths.paths.contains_key("/api/reports/download-pdf"));
        assert!(doc.paths.paths.contains_key("/api/certifications/{id}/verify"));
    }
}
