//! Student records and their portal logins.

use anyhow::Context;
use fake::Fake;
use fake::faker::address::en::{CityName, ZipCode};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::CellNumber;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;

use super::models::{BRANCHES, SEED_REGISTRATION_PREFIX, StudentSeed};
use super::{SEED_BCRYPT_COST, batch_size, pick, placeholders};

pub const INDIAN_STATES: [&str; 8] = [
    "Andhra Pradesh",
    "Telangana",
    "Karnataka",
    "Tamil Nadu",
    "Kerala",
    "Maharashtra",
    "Odisha",
    "West Bengal",
];

const GENDERS: [&str; 2] = ["Male", "Female"];
const LATEST_INTAKE: i32 = 24;

/// Registration numbers encode the intake year and branch code, e.g. `SEED22CSE0007`.
pub fn registration_number(intake: i32, branch_code: &str, idx: usize) -> String {
    format!("{SEED_REGISTRATION_PREFIX}{intake:02}{branch_code}{idx:04}")
}

pub fn generate_students(count: usize, semesters: i32) -> Vec<StudentSeed> {
    let semesters = semesters.max(1);
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let (branch, code) = BRANCHES[idx % BRANCHES.len()];
            let current_semester: i32 = (1..semesters + 1).fake();
            let intake = LATEST_INTAKE - (current_semester - 1) / 2;
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let registration_number = registration_number(intake, code, idx + 1);

            StudentSeed {
                email: format!("{}@example.com", registration_number.to_lowercase()),
                name: format!("{first_name} {last_name}"),
                registration_number,
                phone: CellNumber().fake(),
                gender: pick(&GENDERS),
                branch,
                current_semester,
                city: CityName().fake(),
                state: pick(&INDIAN_STATES).to_string(),
                pincode: ZipCode().fake(),
            }
        })
        .collect()
}

/// Portal password hashes, one per student, computed in parallel. The
/// password is the registration number.
pub fn hash_portal_passwords(students: &[StudentSeed]) -> anyhow::Result<Vec<String>> {
    students
        .par_iter()
        .map(|student| bcrypt::hash(&student.registration_number, SEED_BCRYPT_COST))
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to hash student passwords")
}

pub async fn seed_students(
    db: &PgPool,
    count: usize,
    semesters: i32,
) -> anyhow::Result<Vec<StudentSeed>> {
    let start_time = Instant::now();
    println!("🎓 Seeding {} students...", count);

    let students = generate_students(count, semesters);
    let hashes = hash_portal_passwords(&students)?;
    println!("   ✓ Hashed portal passwords in {:?}", start_time.elapsed());

    let mut tx = db.begin().await?;
    for chunk in students.chunks(batch_size(10)) {
        insert_students_chunk(&mut tx, chunk).await?;
    }
    let logins: Vec<(&str, &str)> = students
        .iter()
        .zip(&hashes)
        .map(|(student, hash)| (student.registration_number.as_str(), hash.as_str()))
        .collect();
    for chunk in logins.chunks(batch_size(2)) {
        insert_logins_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students in {:?}",
        students.len(),
        start_time.elapsed()
    );

    Ok(students)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
) -> anyhow::Result<()> {
    if students.is_empty() {
        return Ok(());
    }

    let query = format!(
        r#"INSERT INTO students (registration_number, name, email, phone, gender, branch,
                                 current_semester, city, state, pincode)
           VALUES {}
           ON CONFLICT (registration_number) DO NOTHING"#,
        placeholders(students.len(), 10)
    );

    let mut q = sqlx::query(&query);
    for student in students {
        q = q
            .bind(&student.registration_number)
            .bind(&student.name)
            .bind(&student.email)
            .bind(&student.phone)
            .bind(student.gender)
            .bind(student.branch)
            .bind(student.current_semester)
            .bind(&student.city)
            .bind(&student.state)
            .bind(&student.pincode);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

async fn insert_logins_chunk(
    tx: &mut Transaction<'_, Postgres>,
    logins: &[(&str, &str)],
) -> anyhow::Result<()> {
    if logins.is_empty() {
        return Ok(());
    }

    let query = format!(
        "INSERT INTO student_users (registration_number, password_hash) VALUES {} \
         ON CONFLICT (registration_number) DO NOTHING",
        placeholders(logins.len(), 2)
    );

    let mut q = sqlx::query(&query);
    for (registration_number, hash) in logins {
        q = q.bind(*registration_number).bind(*hash);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

/// Deletes seeded students. Grades, logins, achievements, certifications,
/// notes and mappings go with them.
pub async fn clear_students(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded students...");

    let result = sqlx::query("DELETE FROM students WHERE starts_with(registration_number, $1)")
        .bind(SEED_REGISTRATION_PREFIX)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} students in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_numbers_fit_column() {
        let reg = registration_number(21, "CIVIL", 12345);
        assert_eq!(reg, "SEED21CIVIL12345");
        assert!(reg.len() <= 20);
    }

    #[test]
    fn students_spread_over_branches_and_semesters() {
        let students = generate_students(12, 8);
        assert_eq!(students.len(), 12);
        assert_eq!(students[0].branch, BRANCHES[0].0);
        assert_eq!(students[1].branch, BRANCHES[1].0);
        assert!(
            students
                .iter()
                .all(|s| (1..=8).contains(&s.current_semester))
        );
        assert!(
            students
                .iter()
                .all(|s| s.registration_number.starts_with(SEED_REGISTRATION_PREFIX))
        );
    }

    #[test]
    fn portal_passwords_verify_against_registration_number() {
        let students = generate_students(2, 4);
        let hashes = hash_portal_passwords(&students).unwrap();
        assert!(bcrypt::verify(&students[1].registration_number, &hashes[1]).unwrap());
    }
}
