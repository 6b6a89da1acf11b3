//! Database seeding for demos and local development.
//!
//! # Module Structure
//!
//! - [`staff`] - admin and faculty accounts
//! - [`students`] - student records and portal logins
//! - [`academics`] - courses and grades
//! - [`activities`] - achievements, certifications, proctor mappings and calendar events
//! - [`admissions`] - admission records for the analytics screens
//! - [`models`] - row shapes and [`SeedConfig`]
//!
//! Rows are generated in parallel with Rayon and written with multi-value
//! INSERT statements. Everything seeded carries a recognisable prefix so
//! that [`clear_all`] removes it without touching real data.

pub mod academics;
pub mod activities;
pub mod admissions;
pub mod models;
pub mod staff;
pub mod students;

pub use models::SeedConfig;

use anyhow::Context;
use sqlx::PgPool;
use std::time::Instant;

/// Low bcrypt cost for seeded accounts (about 6ms per hash instead of 250ms).
pub const SEED_BCRYPT_COST: u32 = 4;

/// Seeds staff, students, grades, activities, admissions and events.
pub async fn seed_all(db: &PgPool, config: &SeedConfig) -> anyhow::Result<()> {
    let start_time = Instant::now();

    println!("🌱 Starting full database seeding...");
    println!(
        "   - Students: {}, Faculty: {}",
        config.students, config.faculty
    );
    println!(
        "   - Courses: {} ({} semesters)",
        config.total_courses(),
        config.semesters
    );
    println!(
        "   - Admissions: {}, Calendar events: {}",
        config.admissions, config.events
    );

    let staff_hash = bcrypt::hash(models::STAFF_PASSWORD, SEED_BCRYPT_COST)
        .context("Failed to hash staff password")?;

    let staff = staff::seed_staff(db, config.faculty, &staff_hash).await?;
    let students = students::seed_students(db, config.students, config.semesters).await?;
    let courses = academics::seed_courses(db, config.semesters, config.courses_per_semester).await?;
    academics::seed_grades(db, &students, &courses).await?;

    let faculty_usernames: Vec<String> = staff
        .iter()
        .filter(|member| member.role == staff::FACULTY_ROLE)
        .map(|member| member.username.clone())
        .collect();
    activities::seed_mappings(db, &faculty_usernames, &students).await?;
    activities::seed_achievements(db, &students, config.achievements_per_student).await?;
    activities::seed_certifications(db, &students, config.certifications_per_student).await?;

    let created_by = staff.first().map(|member| member.id);
    activities::seed_events(db, config.events, created_by).await?;
    admissions::seed_admissions(db, config.admissions).await?;

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    println!(
        "\n📝 Staff password: {}. Students sign in with their registration number.",
        models::STAFF_PASSWORD
    );

    Ok(())
}

/// Removes seeded rows. Admission records have no owner column, so they are
/// only wiped when `include_admissions` is set.
pub async fn clear_all(db: &PgPool, include_admissions: bool) -> anyhow::Result<()> {
    let start_time = Instant::now();
    println!("🗑️  Clearing all seeded data...");

    // Events reference staff; grades reference courses.
    activities::clear_events(db).await?;
    students::clear_students(db).await?;
    academics::clear_courses(db).await?;
    staff::clear_staff(db).await?;
    if include_admissions {
        admissions::clear_admissions(db).await?;
    }

    println!("✅ All seeded data cleared in {:?}", start_time.elapsed());
    Ok(())
}

/// `($1, $2), ($3, $4)` for `rows` tuples of `columns` parameters each.
pub(crate) fn placeholders(rows: usize, columns: usize) -> String {
    let mut out = String::with_capacity(rows * columns * 5);
    for row in 0..rows {
        if row > 0 {
            out.push_str(", ");
        }
        out.push('(');
        for column in 0..columns {
            if column > 0 {
                out.push_str(", ");
            }
            out.push_str(&format!("${}", row * columns + column + 1));
        }
        out.push(')');
    }
    out
}

/// Rows per INSERT so the statement stays under the Postgres bind limit.
pub(crate) fn batch_size(columns: usize) -> usize {
    (60_000 / columns).max(1)
}

/// Uniform pick from a non-empty slice.
pub(crate) fn pick<T: Copy>(items: &[T]) -> T {
    use fake::Fake;
    items[(0..items.len()).fake::<usize>()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_number_rows_sequentially() {
        assert_eq!(placeholders(2, 3), "($1, $2, $3), ($4, $5, $6)");
        assert_eq!(placeholders(1, 1), "($1)");
        assert_eq!(placeholders(0, 4), "");
    }

    #[test]
    fn batches_fit_bind_limit() {
        assert_eq!(batch_size(10), 6000);
        assert!(batch_size(10) * 10 <= u16::MAX as usize);
    }

    #[test]
    fn pick_returns_member() {
        let items = ["a", "b", "c"];
        for _ in 0..20 {
            assert!(items.contains(&pick(&items)));
        }
    }
}
