use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;

use campuslens_core::{AppError, hash_password};
use campuslens_models::{
    AcademicStatus, CreateStudentDto, GradeDetail, Student, StudentDetail, StudentSummary,
    UpdateStudentDto, UpsertGradeDto,
};
use campuslens_reports::grading;

use crate::modules::achievements::service::AchievementService;
use crate::modules::certifications::service::CertificationService;
use crate::modules::counseling::service::CounselingService;

pub(crate) const STUDENT_COLUMNS: &str = "s.registration_number, s.name, s.email, s.phone, s.gender, s.branch, s.current_semester, s.address_line, s.city, s.state, s.pincode, s.created_at, s.updated_at";

/// Credit-weighted CGPA over a student's grades, `0` without grades.
pub(crate) const CGPA_EXPR: &str = "COALESCE(ROUND((SUM(g.grade_points * c.credits) / NULLIF(SUM(c.credits), 0))::numeric, 2), 0)::float8";

/// Filters for the student list queries. `mapped_to` limits the result to
/// students proctored by that faculty username.
#[derive(Debug, Default, Clone, Copy)]
pub struct StudentQuery<'a> {
    pub branch: Option<&'a str>,
    pub semester: Option<i32>,
    pub mapped_to: Option<&'a str>,
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn list_students(
        db: &PgPool,
        query: StudentQuery<'_>,
    ) -> Result<Vec<StudentSummary>, AppError> {
        let mut students = sqlx::query_as::<_, StudentSummary>(&format!(
            r#"SELECT {STUDENT_COLUMNS}, {CGPA_EXPR} AS cgpa
               FROM students s
               LEFT JOIN grades g ON g.registration_number = s.registration_number
               LEFT JOIN courses c ON c.course_code = g.course_code
               WHERE ($1::text IS NULL OR s.branch = $1)
                 AND ($2::int IS NULL OR s.current_semester = $2)
                 AND ($3::text IS NULL OR s.registration_number IN (
                     SELECT registration_number FROM faculty_username_mapping
                     WHERE faculty_username = $3))
               GROUP BY s.registration_number
               ORDER BY s.registration_number"#
        ))
        .bind(query.branch)
        .bind(query.semester)
        .bind(query.mapped_to)
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        for summary in &mut students {
            summary.status = AcademicStatus::from_cgpa(summary.cgpa);
        }

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, registration_number: &str) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students s WHERE s.registration_number = $1"
        ))
        .bind(registration_number)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    /// Loads several students, failing with 404 on the first unknown number.
    /// The result follows the order of `registration_numbers`.
    #[instrument(skip(db))]
    pub async fn get_students_by_numbers(
        db: &PgPool,
        registration_numbers: &[String],
    ) -> Result<Vec<Student>, AppError> {
        let found = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students s WHERE s.registration_number = ANY($1)"
        ))
        .bind(registration_numbers)
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        registration_numbers
            .iter()
            .map(|reg| {
                found
                    .iter()
                    .find(|s| &s.registration_number == reg)
                    .cloned()
                    .ok_or_else(|| AppError::not_found(anyhow!("Student {} not found", reg)))
            })
            .collect()
    }

    pub async fn ensure_exists(db: &PgPool, registration_number: &str) -> Result<(), AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM students WHERE registration_number = $1)",
        )
        .bind(registration_number)
        .fetch_one(db)
        .await
        .context("Failed to check student")
        .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }
        Ok(())
    }

    /// Grades joined with their course, ordered by semester then course code.
    #[instrument(skip(db))]
    pub async fn get_grades(
        db: &PgPool,
        registration_number: &str,
    ) -> Result<Vec<GradeDetail>, AppError> {
        let grades = sqlx::query_as::<_, GradeDetail>(
            r#"SELECT g.id, g.registration_number, g.course_code, c.course_name, c.credits,
                      c.semester, g.grade_points
               FROM grades g
               JOIN courses c ON c.course_code = g.course_code
               WHERE g.registration_number = $1
               ORDER BY c.semester, g.course_code"#,
        )
        .bind(registration_number)
        .fetch_all(db)
        .await
        .context("Failed to fetch grades")
        .map_err(AppError::database)?;

        Ok(grades)
    }

    /// Full record with grade figures, achievements and certifications.
    /// Counseling notes are loaded only when `include_counseling` is set.
    #[instrument(skip(db))]
    pub async fn get_student_detail(
        db: &PgPool,
        registration_number: &str,
        include_counseling: bool,
    ) -> Result<StudentDetail, AppError> {
        let student = Self::get_student(db, registration_number).await?;
        let grades = Self::get_grades(db, registration_number).await?;
        let achievements = AchievementService::get_by_student(db, registration_number).await?;
        let certifications = CertificationService::get_by_student(db, registration_number).await?;
        let counseling_notes = if include_counseling {
            Some(CounselingService::list_notes(db, registration_number).await?)
        } else {
            None
        };

        let cgpa = grading::cgpa(&grades);
        Ok(StudentDetail {
            student,
            cgpa,
            status: AcademicStatus::from_cgpa(cgpa),
            total_credits: grading::total_credits(&grades),
            completed_credits: grading::earned_credits(&grades),
            sgpa_data: grading::sgpa_by_semester(&grades),
            grades,
            achievements,
            certifications,
            counseling_notes,
        })
    }

    /// Creates the student and, when a password is given, its portal login.
    #[instrument(skip(db, dto), fields(registration_number = %dto.registration_number))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;
        let registration_number = dto.registration_number.as_str();

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student = sqlx::query_as::<_, Student>(
            r#"INSERT INTO students (registration_number, name, email, phone, gender, branch,
                                     current_semester, address_line, city, state, pincode)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING registration_number, name, email, phone, gender, branch, current_semester,
                         address_line, city, state, pincode, created_at, updated_at"#,
        )
        .bind(registration_number)
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.gender)
        .bind(dto.branch.trim())
        .bind(dto.current_semester)
        .bind(&dto.address_line)
        .bind(&dto.city)
        .bind(&dto.state)
        .bind(&dto.pincode)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow!(
                    "Student '{}' already exists",
                    registration_number
                ));
            }
            AppError::database(anyhow::Error::new(e).context("Failed to insert student"))
        })?;

        if let Some(hash) = password_hash {
            sqlx::query(
                "INSERT INTO student_users (registration_number, password_hash) VALUES ($1, $2)",
            )
            .bind(&student.registration_number)
            .bind(&hash)
            .execute(&mut *tx)
            .await
            .context("Failed to create student login")
            .map_err(AppError::database)?;
        }

        tx.commit()
            .await
            .context("Failed to commit student")
            .map_err(AppError::database)?;

        Ok(student)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        registration_number: &str,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request(anyhow!("No fields to update")));
        }

        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let student = sqlx::query_as::<_, Student>(
            r#"UPDATE students SET
                   name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   phone = COALESCE($4, phone),
                   gender = COALESCE($5, gender),
                   branch = COALESCE($6, branch),
                   current_semester = COALESCE($7, current_semester),
                   address_line = COALESCE($8, address_line),
                   city = COALESCE($9, city),
                   state = COALESCE($10, state),
                   pincode = COALESCE($11, pincode),
                   updated_at = NOW()
               WHERE registration_number = $1
               RETURNING registration_number, name, email, phone, gender, branch, current_semester,
                         address_line, city, state, pincode, created_at, updated_at"#,
        )
        .bind(registration_number)
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&dto.phone)
        .bind(&dto.gender)
        .bind(&dto.branch)
        .bind(dto.current_semester)
        .bind(&dto.address_line)
        .bind(&dto.city)
        .bind(&dto.state)
        .bind(&dto.pincode)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to update student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        if let Some(hash) = password_hash {
            sqlx::query(
                r#"INSERT INTO student_users (registration_number, password_hash)
                   VALUES ($1, $2)
                   ON CONFLICT (registration_number)
                   DO UPDATE SET password_hash = EXCLUDED.password_hash, refresh_token = NULL"#,
            )
            .bind(&student.registration_number)
            .bind(&hash)
            .execute(&mut *tx)
            .await
            .context("Failed to update student login")
            .map_err(AppError::database)?;
        }

        tx.commit()
            .await
            .context("Failed to commit student update")
            .map_err(AppError::database)?;

        Ok(student)
    }

    /// Deleting a student cascades to grades, achievements, certifications,
    /// counseling notes, mappings and the portal login.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, registration_number: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM students WHERE registration_number = $1")
            .bind(registration_number)
            .execute(db)
            .await
            .context("Failed to delete student")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }
        Ok(())
    }

    /// Inserts or replaces the grade for a course. The semester comes from
    /// the course.
    #[instrument(skip(db))]
    pub async fn upsert_grade(
        db: &PgPool,
        registration_number: &str,
        dto: UpsertGradeDto,
    ) -> Result<GradeDetail, AppError> {
        Self::ensure_exists(db, registration_number).await?;

        let course_semester: i32 =
            sqlx::query_scalar("SELECT semester FROM courses WHERE course_code = $1")
                .bind(&dto.course_code)
                .fetch_optional(db)
                .await
                .context("Failed to fetch course")
                .map_err(AppError::database)?
                .ok_or_else(|| AppError::not_found(anyhow!("Course not found")))?;

        let grade = sqlx::query_as::<_, GradeDetail>(
            r#"WITH upserted AS (
                   INSERT INTO grades (registration_number, course_code, semester, grade_points)
                   VALUES ($1, $2, $3, $4)
                   ON CONFLICT (registration_number, course_code)
                   DO UPDATE SET grade_points = EXCLUDED.grade_points,
                                 semester = EXCLUDED.semester,
                                 updated_at = NOW()
                   RETURNING id, registration_number, course_code, grade_points
               )
               SELECT u.id, u.registration_number, u.course_code, c.course_name, c.credits,
                      c.semester, u.grade_points
               FROM upserted u
               JOIN courses c ON c.course_code = u.course_code"#,
        )
        .bind(registration_number)
        .bind(&dto.course_code)
        .bind(course_semester)
        .bind(dto.grade_points)
        .fetch_one(db)
        .await
        .context("Failed to save grade")
        .map_err(AppError::database)?;

        Ok(grade)
    }
}
