//! Courses and grades.

use fake::Fake;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{CourseSeed, GradeSeed, SEED_COURSE_PREFIX, StudentSeed};
use super::{batch_size, placeholders};

const SUBJECTS: [&str; 12] = [
    "Engineering Mathematics",
    "Programming Fundamentals",
    "Data Structures",
    "Digital Logic",
    "Database Systems",
    "Operating Systems",
    "Computer Networks",
    "Signals and Systems",
    "Engineering Mechanics",
    "Technical Communication",
    "Machine Learning",
    "Software Engineering",
];

/// Share of grades drawn below the pass mark.
const FAIL_RATE: f64 = 0.08;

/// `courses_per_semester` courses for each of `semesters`, coded `SD<sem><nn>`.
pub fn generate_courses(semesters: i32, courses_per_semester: usize) -> Vec<CourseSeed> {
    (1..=semesters)
        .flat_map(|semester| {
            (0..courses_per_semester).map(move |idx| {
                let subject = SUBJECTS[(semester as usize * 3 + idx) % SUBJECTS.len()];
                CourseSeed {
                    course_code: format!("{SEED_COURSE_PREFIX}{semester}{:02}", idx + 1),
                    course_name: format!("{subject} {}", roman(semester)),
                    credits: (2i32..5).fake(),
                    semester,
                }
            })
        })
        .collect()
}

fn roman(n: i32) -> &'static str {
    match n {
        1 => "I",
        2 => "II",
        3 => "III",
        4 => "IV",
        5 => "V",
        6 => "VI",
        7 => "VII",
        8 => "VIII",
        9 => "IX",
        10 => "X",
        11 => "XI",
        _ => "XII",
    }
}

fn grade_points() -> f64 {
    let points: f64 = if (0.0f64..1.0).fake::<f64>() < FAIL_RATE {
        (0.0f64..4.0).fake()
    } else {
        (4.0f64..10.0).fake()
    };
    (points * 10.0).round() / 10.0
}

/// Grades for every course of every completed semester.
pub fn generate_grades(students: &[StudentSeed], courses: &[CourseSeed]) -> Vec<GradeSeed> {
    students
        .par_iter()
        .flat_map_iter(|student| {
            courses
                .iter()
                .filter(|course| course.semester < student.current_semester)
                .map(|course| GradeSeed {
                    registration_number: student.registration_number.clone(),
                    course_code: course.course_code.clone(),
                    semester: course.semester,
                    grade_points: grade_points(),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub async fn seed_courses(
    db: &PgPool,
    semesters: i32,
    courses_per_semester: usize,
) -> anyhow::Result<Vec<CourseSeed>> {
    let start_time = Instant::now();
    let courses = generate_courses(semesters, courses_per_semester);
    println!("📘 Seeding {} courses...", courses.len());

    if !courses.is_empty() {
        let query = format!(
            "INSERT INTO courses (course_code, course_name, credits, semester) VALUES {} \
             ON CONFLICT (course_code) DO NOTHING",
            placeholders(courses.len(), 4)
        );
        let mut q = sqlx::query(&query);
        for course in &courses {
            q = q
                .bind(&course.course_code)
                .bind(&course.course_name)
                .bind(course.credits)
                .bind(course.semester);
        }
        q.execute(db).await?;
    }

    println!(
        "   ✓ Inserted {} courses in {:?}",
        courses.len(),
        start_time.elapsed()
    );

    Ok(courses)
}

pub async fn seed_grades(
    db: &PgPool,
    students: &[StudentSeed],
    courses: &[CourseSeed],
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let grades = generate_grades(students, courses);
    println!("📝 Seeding {} grades...", grades.len());

    let mut tx = db.begin().await?;
    for chunk in grades.chunks(batch_size(4)) {
        insert_grades_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} grades in {:?}",
        grades.len(),
        start_time.elapsed()
    );

    Ok(grades.len())
}

async fn insert_grades_chunk(
    tx: &mut Transaction<'_, Postgres>,
    grades: &[GradeSeed],
) -> anyhow::Result<()> {
    if grades.is_empty() {
        return Ok(());
    }

    let query = format!(
        "INSERT INTO grades (registration_number, course_code, semester, grade_points) VALUES {} \
         ON CONFLICT (registration_number, course_code) DO NOTHING",
        placeholders(grades.len(), 4)
    );

    let mut q = sqlx::query(&query);
    for grade in grades {
        q = q
            .bind(&grade.registration_number)
            .bind(&grade.course_code)
            .bind(grade.semester)
            .bind(grade.grade_points);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

/// Deletes seeded courses. Run after the seeded students are gone, since
/// grades reference courses.
pub async fn clear_courses(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded courses...");

    let result = sqlx::query(
        r#"DELETE FROM courses c
           WHERE starts_with(c.course_code, $1)
             AND NOT EXISTS (SELECT 1 FROM grades g WHERE g.course_code = c.course_code)"#,
    )
    .bind(SEED_COURSE_PREFIX)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} courses in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeder::students::generate_students;

    #[test]
    fn courses_cover_each_semester() {
        let courses = generate_courses(3, 2);
        assert_eq!(courses.len(), 6);
        assert_eq!(courses[0].course_code, "SD101");
        assert_eq!(courses[5].course_code, "SD302");
        assert!(courses.iter().all(|c| (2..5).contains(&c.credits)));
        assert!(courses[2].course_name.ends_with(" II"));
    }

    #[test]
    fn grades_only_for_completed_semesters() {
        let students = generate_students(20, 8);
        let courses = generate_courses(8, 3);
        let grades = generate_grades(&students, &courses);

        for grade in &grades {
            let student = students
                .iter()
                .find(|s| s.registration_number == grade.registration_number)
                .unwrap();
            assert!(grade.semester < student.current_semester);
            assert!((0.0..=10.0).contains(&grade.grade_points));
        }

        let expected: usize = students
            .iter()
            .map(|s| 3 * (s.current_semester as usize - 1))
            .sum();
        assert_eq!(grades.len(), expected);
    }
}
