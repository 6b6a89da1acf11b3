use anyhow::Context;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use campuslens_core::AppError;
use campuslens_models::{
    BranchCount, DashboardStats, FacultyDashboard, MappingResult, ProctorMappingDto,
    RecentActivity, SemesterAverage, TopStudent,
};

const TOP_STUDENT_LIMIT: i64 = 5;
const RECENT_ACTIVITY_LIMIT: i64 = 4;

/// Restricts `column` to students mapped to the faculty username bound as
/// `$1`; a NULL `$1` matches everyone.
fn scope(column: &str) -> String {
    format!(
        "($1::text IS NULL OR {column} IN (SELECT registration_number FROM faculty_username_mapping WHERE faculty_username = $1))"
    )
}

pub struct FacultyService;

impl FacultyService {
    /// Maps students to a faculty member. Pairs that already exist and
    /// unknown registration numbers are skipped.
    #[instrument(skip(db, dto), fields(faculty_username = %dto.faculty_username))]
    pub async fn add_mappings(
        db: &PgPool,
        dto: &ProctorMappingDto,
    ) -> Result<MappingResult, AppError> {
        let result = sqlx::query(
            r#"INSERT INTO faculty_username_mapping (faculty_username, registration_number)
               SELECT $1, s.registration_number
               FROM students s
               WHERE s.registration_number = ANY($2)
               ON CONFLICT (faculty_username, registration_number) DO NOTHING"#,
        )
        .bind(dto.faculty_username.trim())
        .bind(&dto.registration_numbers)
        .execute(db)
        .await
        .context("Failed to insert proctor mappings")
        .map_err(AppError::database)?;

        Ok(MappingResult {
            affected: result.rows_affected(),
        })
    }

    #[instrument(skip(db, dto), fields(faculty_username = %dto.faculty_username))]
    pub async fn remove_mappings(
        db: &PgPool,
        dto: &ProctorMappingDto,
    ) -> Result<MappingResult, AppError> {
        let result = sqlx::query(
            r#"DELETE FROM faculty_username_mapping
               WHERE faculty_username = $1 AND registration_number = ANY($2)"#,
        )
        .bind(dto.faculty_username.trim())
        .bind(&dto.registration_numbers)
        .execute(db)
        .await
        .context("Failed to delete proctor mappings")
        .map_err(AppError::database)?;

        Ok(MappingResult {
            affected: result.rows_affected(),
        })
    }

    async fn stats(db: &PgPool, mapped_to: Option<&str>) -> Result<DashboardStats, AppError> {
        let (total_students, avg_cgpa, achievements, certifications): (i64, f64, i64, i64) =
            sqlx::query_as(&format!(
                r#"SELECT
                   (SELECT COUNT(*) FROM students s WHERE {students}),
                   (SELECT COALESCE(ROUND(AVG(cgpa)::numeric, 2), 0)::float8 FROM (
                        SELECT SUM(g.grade_points * c.credits) / NULLIF(SUM(c.credits), 0) AS cgpa
                        FROM grades g
                        JOIN courses c ON c.course_code = g.course_code
                        WHERE {grades}
                        GROUP BY g.registration_number
                    ) per_student WHERE cgpa IS NOT NULL),
                   (SELECT COUNT(*) FROM achievements a WHERE {achievements}),
                   (SELECT COUNT(*) FROM certifications ce WHERE {certifications})"#,
                students = scope("s.registration_number"),
                grades = scope("g.registration_number"),
                achievements = scope("a.registration_number"),
                certifications = scope("ce.registration_number"),
            ))
            .bind(mapped_to)
            .fetch_one(db)
            .await
            .context("Failed to compute dashboard stats")
            .map_err(AppError::database)?;

        Ok(DashboardStats {
            total_students,
            avg_cgpa,
            achievements,
            certifications,
        })
    }

    async fn top_students(
        db: &PgPool,
        mapped_to: Option<&str>,
    ) -> Result<Vec<TopStudent>, AppError> {
        let rows: Vec<(String, String, String, i64, f64)> = sqlx::query_as(&format!(
            r#"SELECT s.registration_number, s.name, s.branch,
                      (SELECT COUNT(*) FROM achievements a
                       WHERE a.registration_number = s.registration_number) AS achievement_count,
                      COALESCE((
                          SELECT ROUND((SUM(g.grade_points * c.credits)
                                        / NULLIF(SUM(c.credits), 0))::numeric, 2)
                          FROM grades g
                          JOIN courses c ON c.course_code = g.course_code
                          WHERE g.registration_number = s.registration_number
                      ), 0)::float8 AS cgpa
               FROM students s
               WHERE {}
               ORDER BY achievement_count DESC, cgpa DESC, s.registration_number
               LIMIT $2"#,
            scope("s.registration_number")
        ))
        .bind(mapped_to)
        .bind(TOP_STUDENT_LIMIT)
        .fetch_all(db)
        .await
        .context("Failed to fetch top students")
        .map_err(AppError::database)?;

        Ok(rows
            .into_iter()
            .map(
                |(registration_number, name, branch, achievement_count, cgpa)| TopStudent {
                    registration_number,
                    name,
                    branch,
                    achievement_count,
                    cgpa,
                },
            )
            .collect())
    }

    async fn recent_activities(
        db: &PgPool,
        mapped_to: Option<&str>,
    ) -> Result<Vec<RecentActivity>, AppError> {
        let rows: Vec<(String, String, String, String, Option<NaiveDate>)> =
            sqlx::query_as(&format!(
                r#"SELECT kind, registration_number, student_name, title, activity_date
                   FROM (
                       SELECT 'achievement' AS kind, a.registration_number, s.name AS student_name,
                              a.title, a.achievement_date AS activity_date, a.created_at
                       FROM achievements a
                       JOIN students s ON s.registration_number = a.registration_number
                       WHERE {achievements}
                       UNION ALL
                       SELECT 'certification', ce.registration_number, s.name, ce.title,
                              ce.issue_date, ce.created_at
                       FROM certifications ce
                       JOIN students s ON s.registration_number = ce.registration_number
                       WHERE {certifications}
                   ) activity
                   ORDER BY activity_date DESC NULLS LAST, created_at DESC
                   LIMIT $2"#,
                achievements = scope("a.registration_number"),
                certifications = scope("ce.registration_number"),
            ))
            .bind(mapped_to)
            .bind(RECENT_ACTIVITY_LIMIT)
            .fetch_all(db)
            .await
            .context("Failed to fetch recent activity")
            .map_err(AppError::database)?;

        Ok(rows
            .into_iter()
            .map(
                |(kind, registration_number, student_name, title, date)| RecentActivity {
                    kind,
                    registration_number,
                    student_name,
                    title,
                    date,
                },
            )
            .collect())
    }

    async fn performance_data(
        db: &PgPool,
        mapped_to: Option<&str>,
    ) -> Result<Vec<SemesterAverage>, AppError> {
        let rows: Vec<(i32, f64)> = sqlx::query_as(&format!(
            r#"SELECT semester, ROUND(AVG(sgpa)::numeric, 2)::float8
               FROM (
                   SELECT g.registration_number, c.semester,
                          SUM(g.grade_points * c.credits) / NULLIF(SUM(c.credits), 0) AS sgpa
                   FROM grades g
                   JOIN courses c ON c.course_code = g.course_code
                   WHERE {}
                   GROUP BY g.registration_number, c.semester
               ) per_semester
               WHERE sgpa IS NOT NULL
               GROUP BY semester
               ORDER BY semester"#,
            scope("g.registration_number")
        ))
        .bind(mapped_to)
        .fetch_all(db)
        .await
        .context("Failed to compute semester averages")
        .map_err(AppError::database)?;

        Ok(rows
            .into_iter()
            .map(|(semester, average_sgpa)| SemesterAverage {
                semester,
                average_sgpa,
            })
            .collect())
    }

    async fn branch_distribution(
        db: &PgPool,
        mapped_to: Option<&str>,
    ) -> Result<Vec<BranchCount>, AppError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
            r#"SELECT s.branch, COUNT(*) FROM students s
               WHERE {}
               GROUP BY s.branch
               ORDER BY COUNT(*) DESC, s.branch"#,
            scope("s.registration_number")
        ))
        .bind(mapped_to)
        .fetch_all(db)
        .await
        .context("Failed to compute branch distribution")
        .map_err(AppError::database)?;

        Ok(rows
            .into_iter()
            .map(|(branch, count)| BranchCount { branch, count })
            .collect())
    }

    /// Dashboard figures over the students mapped to `mapped_to`, or over
    /// every student when `None`.
    #[instrument(skip(db))]
    pub async fn dashboard(
        db: &PgPool,
        mapped_to: Option<&str>,
    ) -> Result<FacultyDashboard, AppError> {
        let (stats, top_students, recent_activities, performance_data, branch_distribution) = tokio::try_join!(
            Self::stats(db, mapped_to),
            Self::top_students(db, mapped_to),
            Self::recent_activities(db, mapped_to),
            Self::performance_data(db, mapped_to),
            Self::branch_distribution(db, mapped_to),
        )?;

        Ok(FacultyDashboard {
            stats,
            top_students,
            recent_activities,
            performance_data,
            branch_distribution,
        })
    }
}
