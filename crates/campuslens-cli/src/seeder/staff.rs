//! Admin and faculty accounts.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

use super::models::{BRANCHES, SEED_USERNAME_PREFIX, StaffSeed};
use super::{pick, placeholders};

pub const ADMIN_ROLE: &str = "admin";
pub const FACULTY_ROLE: &str = "faculty";

pub struct SeededStaff {
    pub id: Uuid,
    pub username: String,
    pub role: String,
}

/// One admin followed by `faculty` faculty members.
pub fn generate_staff(faculty: usize) -> Vec<StaffSeed> {
    (0..=faculty)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let (role, username) = if idx == 0 {
                (ADMIN_ROLE, format!("{SEED_USERNAME_PREFIX}admin"))
            } else {
                (FACULTY_ROLE, format!("{SEED_USERNAME_PREFIX}faculty{idx:02}"))
            };

            StaffSeed {
                email: format!("{username}@example.com"),
                username,
                first_name,
                last_name,
                role,
                department: pick(&BRANCHES).1.to_string(),
            }
        })
        .collect()
}

pub async fn seed_staff(
    db: &PgPool,
    faculty: usize,
    password_hash: &str,
) -> anyhow::Result<Vec<SeededStaff>> {
    let start_time = Instant::now();
    println!("👥 Seeding 1 admin and {} faculty...", faculty);

    let staff = generate_staff(faculty);

    let query = format!(
        r#"INSERT INTO users (username, password_hash, first_name, last_name, email, role, department)
           SELECT username, password_hash, first_name, last_name, email, role::user_role, department
           FROM (VALUES {}) AS v(username, password_hash, first_name, last_name, email, role, department)
           ON CONFLICT (username) DO NOTHING
           RETURNING id, username, role::text"#,
        placeholders(staff.len(), 7)
    );

    let mut q = sqlx::query_as::<_, (Uuid, String, String)>(&query);
    for member in &staff {
        q = q
            .bind(&member.username)
            .bind(password_hash)
            .bind(&member.first_name)
            .bind(&member.last_name)
            .bind(&member.email)
            .bind(member.role)
            .bind(&member.department);
    }

    let mut seeded: Vec<SeededStaff> = q
        .fetch_all(db)
        .await?
        .into_iter()
        .map(|(id, username, role)| SeededStaff { id, username, role })
        .collect();
    seeded.sort_by(|a, b| a.username.cmp(&b.username));
    // Admin first so it can own calendar events.
    seeded.sort_by_key(|member| member.role != ADMIN_ROLE);

    println!(
        "   ✓ Inserted {} staff users in {:?}",
        seeded.len(),
        start_time.elapsed()
    );

    Ok(seeded)
}

pub async fn clear_staff(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded staff...");

    let result = sqlx::query("DELETE FROM users WHERE starts_with(username, $1)")
        .bind(SEED_USERNAME_PREFIX)
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} staff users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_generated_member_is_admin() {
        let staff = generate_staff(3);
        assert_eq!(staff.len(), 4);
        assert_eq!(staff[0].role, ADMIN_ROLE);
        assert_eq!(staff[0].username, "seed_admin");
        assert!(staff[1..].iter().all(|s| s.role == FACULTY_ROLE));
        assert_eq!(staff[2].username, "seed_faculty02");
    }
}
