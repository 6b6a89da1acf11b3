use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;

use campuslens_core::AppError;
use campuslens_models::{Course, CourseFilterParams, CreateCourseDto};

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn get_courses(
        db: &PgPool,
        filters: &CourseFilterParams,
    ) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"SELECT course_code, course_name, credits, semester
               FROM courses
               WHERE ($1::int IS NULL OR semester = $1)
               ORDER BY semester, course_code"#,
        )
        .bind(filters.semester)
        .fetch_all(db)
        .await
        .context("Failed to fetch courses")
        .map_err(AppError::database)?;

        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let code = dto.course_code.as_str();

        let course = sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (course_code, course_name, credits, semester)
               VALUES ($1, $2, $3, $4)
               RETURNING course_code, course_name, credits, semester"#,
        )
        .bind(code)
        .bind(dto.course_name.trim())
        .bind(dto.credits)
        .bind(dto.semester)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow!("Course '{}' already exists", code));
            }
            AppError::database(anyhow::Error::new(e).context("Failed to insert course"))
        })?;

        Ok(course)
    }
}
