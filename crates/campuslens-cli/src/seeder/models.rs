//! Row shapes and sizing for generated data.

use chrono::{DateTime, NaiveDate, Utc};

/// Seeded staff usernames start with this; `clear-seed` keys off it.
pub const SEED_USERNAME_PREFIX: &str = "seed_";
/// Seeded registration numbers start with this.
pub const SEED_REGISTRATION_PREFIX: &str = "SEED";
/// Seeded course codes start with this.
pub const SEED_COURSE_PREFIX: &str = "SD";
/// Password for every seeded staff account. Students log in with their
/// registration number.
pub const STAFF_PASSWORD: &str = "Password@123";

pub const BRANCHES: [(&str, &str); 6] = [
    ("Computer Science and Engineering", "CSE"),
    ("Electronics and Communication Engineering", "ECE"),
    ("Electrical and Electronics Engineering", "EEE"),
    ("Mechanical Engineering", "MECH"),
    ("Civil Engineering", "CIVIL"),
    ("Information Technology", "IT"),
];

pub struct StaffSeed {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: &'static str,
    pub department: String,
}

pub struct StudentSeed {
    pub registration_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: &'static str,
    pub branch: &'static str,
    pub current_semester: i32,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

pub struct CourseSeed {
    pub course_code: String,
    pub course_name: String,
    pub credits: i32,
    pub semester: i32,
}

pub struct GradeSeed {
    pub registration_number: String,
    pub course_code: String,
    pub semester: i32,
    pub grade_points: f64,
}

pub struct AchievementSeed {
    pub registration_number: String,
    pub title: String,
    pub description: String,
    pub category: &'static str,
    pub achievement_date: NaiveDate,
    pub scope: &'static str,
}

pub struct CertificationSeed {
    pub registration_number: String,
    pub title: String,
    pub issuing_organization: String,
    pub issue_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub credential_id: String,
    pub certification_type: &'static str,
}

pub struct AdmissionSeed {
    pub student_name: String,
    pub branch: &'static str,
    pub gender: &'static str,
    pub seat_type: &'static str,
    pub state: String,
    pub country: &'static str,
    pub admission_year: i32,
}

pub struct EventSeed {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub event_type: &'static str,
    pub academic_year: String,
    pub student_years: String,
    pub location: String,
}

/// Complete configuration for database seeding.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub students: usize,
    pub faculty: usize,
    pub semesters: i32,
    pub courses_per_semester: usize,
    pub achievements_per_student: usize,
    pub certifications_per_student: usize,
    pub admissions: usize,
    pub events: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            students: 120,
            faculty: 6,
            semesters: 8,
            courses_per_semester: 6,
            achievements_per_student: 2,
            certifications_per_student: 1,
            admissions: 500,
            events: 30,
        }
    }
}

impl SeedConfig {
    pub fn new(students: usize) -> Self {
        Self {
            students,
            ..Default::default()
        }
    }

    pub fn with_faculty(mut self, faculty: usize) -> Self {
        self.faculty = faculty;
        self
    }

    pub fn with_activities(mut self, achievements: usize, certifications: usize) -> Self {
        self.achievements_per_student = achievements;
        self.certifications_per_student = certifications;
        self
    }

    pub fn with_admissions(mut self, admissions: usize) -> Self {
        self.admissions = admissions;
        self
    }

    pub fn with_events(mut self, events: usize) -> Self {
        self.events = events;
        self
    }

    pub fn total_courses(&self) -> usize {
        self.semesters.max(0) as usize * self.courses_per_semester
    }
}
