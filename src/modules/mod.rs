pub mod achievements;
pub mod admissions;
pub mod auth;
pub mod calendar;
pub mod certifications;
pub mod counseling;
pub mod courses;
pub mod faculty;
pub mod menu;
pub mod reports;
pub mod students;
pub mod users;
