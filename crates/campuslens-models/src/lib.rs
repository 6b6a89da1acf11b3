//! # CampusLens Models
//!
//! Database entities, request DTOs and response shapes for the API.
//!
//! - [`auth`]: login, refresh and logout payloads
//! - [`users`]: staff accounts
//! - [`students`]: student records and their detail view
//! - [`academics`]: courses, grades and derived grade figures
//! - [`achievements`]: achievements and export filters
//! - [`certifications`]: certifications and certificate rendering input
//! - [`counseling`]: counseling notes
//! - [`calendar`]: academic calendar events
//! - [`admissions`]: admission records and analytics
//! - [`faculty`]: proctoring mappings and the faculty dashboard
//! - [`menu`]: faculty portal menu
//! - [`reports`]: report types and performance reports

pub mod academics;
pub mod achievements;
pub mod admissions;
pub mod auth;
pub mod calendar;
pub mod certifications;
pub mod counseling;
pub mod faculty;
pub mod menu;
pub mod reports;
pub mod students;
pub mod users;

pub use campuslens_auth::{Claims, Role};

pub use academics::{
    AcademicStatus, Course, CourseFilterParams, CreateCourseDto, GradeDetail, SemesterSgpa,
    UpsertGradeDto,
};
pub use achievements::{
    Achievement, AchievementExportParams, CreateAchievementDto, LinkStatus,
    StudentAchievementDto, TimeRange, UpdateAchievementDto,
};
pub use admissions::{
    Admission, AdmissionAnalytics, AdmissionFilterOptions, AdmissionFilters, AdmissionPage,
    Breakdown,
};
pub use auth::{
    AccessTokenResponse, LoginRequest, LoginResponse, LoginUser, MessageResponse,
    RefreshTokenRequest, TokenPair,
};
pub use calendar::{CalendarEvent, CalendarEventDto, CalendarEventView, CalendarFilterParams};
pub use certifications::{
    Certification, CertificationFields, CreateStudentCertificationDto, DummyCertificateRequest,
    UploadResponse,
};
pub use counseling::{CounselingNote, CreateCounselingNoteDto, UpdateCounselingNoteDto};
pub use faculty::{
    BranchCount, DashboardParams, DashboardScope, DashboardStats, FacultyDashboard,
    FacultyStudentParams, MappingResult, ProctorMappingDto, RecentActivity, SemesterAverage,
    TopStudent,
};
pub use menu::MenuItem;
pub use reports::{
    ExportQuery, ReportKind, ReportQuery, ReportTypeInfo, SemesterPerformanceReport,
    StudentBatchQuery,
};
pub use students::{
    CreateStudentDto, Student, StudentDetail, StudentFilterParams, StudentSummary,
    UpdateStudentDto,
};
pub use users::{CreateUserDto, UpdateUserDto, User};
