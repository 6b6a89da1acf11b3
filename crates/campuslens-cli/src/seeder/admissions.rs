//! Admission records for the analytics screens.

use fake::Fake;
use fake::faker::name::en::Name;
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;

use super::models::{AdmissionSeed, BRANCHES};
use super::students::INDIAN_STATES;
use super::{batch_size, pick, placeholders};

const GENDERS: [&str; 2] = ["Male", "Female"];
const SEAT_TYPES: [&str; 4] = ["Convener", "Management", "NRI", "Lateral Entry"];
const FIRST_INTAKE: i32 = 2019;
const LAST_INTAKE: i32 = 2025;

pub fn generate_admissions(count: usize) -> Vec<AdmissionSeed> {
    (0..count)
        .into_par_iter()
        .map(|_| {
            // A handful of international students.
            let international = (0u8..100).fake::<u8>() < 3;
            AdmissionSeed {
                student_name: Name().fake(),
                branch: pick(&BRANCHES).0,
                gender: pick(&GENDERS),
                seat_type: if international { "NRI" } else { pick(&SEAT_TYPES) },
                state: if international {
                    "Outside India".to_string()
                } else {
                    pick(&INDIAN_STATES).to_string()
                },
                country: if international { "Nepal" } else { "India" },
                admission_year: (FIRST_INTAKE..LAST_INTAKE + 1).fake(),
            }
        })
        .collect()
}

pub async fn seed_admissions(db: &PgPool, count: usize) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let admissions = generate_admissions(count);
    println!("🏫 Seeding {} admissions...", admissions.len());

    let mut tx = db.begin().await?;
    for chunk in admissions.chunks(batch_size(7)) {
        let query = format!(
            r#"INSERT INTO admissions (student_name, branch, gender, seat_type, state, country,
                                       admission_year)
               VALUES {}"#,
            placeholders(chunk.len(), 7)
        );
        let mut q = sqlx::query(&query);
        for admission in chunk {
            q = q
                .bind(&admission.student_name)
                .bind(admission.branch)
                .bind(admission.gender)
                .bind(admission.seat_type)
                .bind(&admission.state)
                .bind(admission.country)
                .bind(admission.admission_year);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} admissions in {:?}",
        admissions.len(),
        start_time.elapsed()
    );
    Ok(admissions.len())
}

pub async fn clear_admissions(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing admissions...");

    let result = sqlx::query("DELETE FROM admissions")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} admissions in {:?}",
        result,
        start_time.elapsed()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admissions_fall_in_intake_window() {
        let admissions = generate_admissions(50);
        assert_eq!(admissions.len(), 50);
        for admission in &admissions {
            assert!((FIRST_INTAKE..=LAST_INTAKE).contains(&admission.admission_year));
            assert!(SEAT_TYPES.contains(&admission.seat_type));
            if admission.country != "India" {
                assert_eq!(admission.seat_type, "NRI");
            }
        }
    }
}
