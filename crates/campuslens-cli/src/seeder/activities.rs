//! Achievements, certifications, proctor mappings and calendar events.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::{
    AchievementSeed, CertificationSeed, EventSeed, SEED_USERNAME_PREFIX, StudentSeed,
};
use super::{batch_size, pick, placeholders};

const CATEGORIES: [&str; 6] = [
    "Technical",
    "Sports",
    "Cultural",
    "Academic",
    "Research",
    "Social Service",
];
const SCOPES: [&str; 2] = ["Inside the College", "Outside the College"];
const ACHIEVEMENT_TITLES: [&str; 6] = [
    "Hackathon Winner",
    "Paper Presentation",
    "Inter-College Tournament",
    "Cultural Fest Performance",
    "Research Publication",
    "Volunteer Drive Lead",
];
const ISSUERS: [&str; 6] = ["NPTEL", "Coursera", "AWS", "Google", "Microsoft", "Cisco"];
const CERTIFICATE_TOPICS: [&str; 6] = [
    "Cloud Practitioner",
    "Python for Data Science",
    "Networking Essentials",
    "Machine Learning Foundations",
    "Web Development",
    "Cyber Security Basics",
];
const CERTIFICATION_TYPES: [&str; 4] = ["course", "professional", "workshop", "other"];
const EVENT_TYPES: [&str; 6] = [
    "holiday",
    "exam",
    "workshop",
    "seminar",
    "submission",
    "event",
];
const STUDENT_YEARS: [&str; 7] = ["all", "1", "2", "3", "4", "1,2", "3,4"];
const LOCATIONS: [&str; 4] = ["Main Auditorium", "Seminar Hall", "Block A", "Sports Ground"];

fn days_ago(max_days: i64) -> NaiveDate {
    Utc::now().date_naive() - Duration::days((0..max_days).fake::<i64>())
}

/// `2024-25` style year for the academic year containing `date` (June start).
pub fn academic_year(date: NaiveDate) -> String {
    let start = if date.month() >= 6 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{:02}", start, (start + 1) % 100)
}

pub fn generate_achievements(students: &[StudentSeed], per_student: usize) -> Vec<AchievementSeed> {
    students
        .par_iter()
        .flat_map_iter(|student| {
            (0..per_student)
                .map(|_| AchievementSeed {
                    registration_number: student.registration_number.clone(),
                    title: pick(&ACHIEVEMENT_TITLES).to_string(),
                    description: Sentence(6..12).fake(),
                    category: pick(&CATEGORIES),
                    achievement_date: days_ago(720),
                    scope: pick(&SCOPES),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_certifications(
    students: &[StudentSeed],
    per_student: usize,
) -> Vec<CertificationSeed> {
    students
        .par_iter()
        .flat_map_iter(|student| {
            (0..per_student)
                .map(|n| {
                    let certification_type = pick(&CERTIFICATION_TYPES);
                    let issue_date = days_ago(900);
                    CertificationSeed {
                        registration_number: student.registration_number.clone(),
                        title: pick(&CERTIFICATE_TOPICS).to_string(),
                        issuing_organization: pick(&ISSUERS).to_string(),
                        issue_date,
                        expiry_date: (certification_type == "professional")
                            .then(|| issue_date + Duration::days(3 * 365)),
                        credential_id: format!("{}-{}", student.registration_number, n + 1),
                        certification_type,
                    }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn generate_events(count: usize) -> Vec<EventSeed> {
    (0..count)
        .into_par_iter()
        .map(|_| {
            let event_type = pick(&EVENT_TYPES);
            let start_date = Utc::now() + Duration::days((-60i64..120).fake::<i64>());
            let end_date = start_date + Duration::hours((2i64..72).fake::<i64>());
            let mut title = event_type.to_string();
            title[..1].make_ascii_uppercase();

            EventSeed {
                title: format!("{title}: {}", Sentence(2..4).fake::<String>()),
                description: Sentence(8..16).fake(),
                start_date,
                end_date,
                event_type,
                academic_year: academic_year(start_date.date_naive()),
                student_years: pick(&STUDENT_YEARS).to_string(),
                location: pick(&LOCATIONS).to_string(),
            }
        })
        .collect()
}

/// Spreads students over faculty round-robin.
pub async fn seed_mappings(
    db: &PgPool,
    faculty_usernames: &[String],
    students: &[StudentSeed],
) -> anyhow::Result<()> {
    if faculty_usernames.is_empty() || students.is_empty() {
        return Ok(());
    }

    let start_time = Instant::now();
    println!("🧭 Mapping {} students to faculty...", students.len());

    let pairs: Vec<(&str, &str)> = students
        .iter()
        .enumerate()
        .map(|(idx, student)| {
            (
                faculty_usernames[idx % faculty_usernames.len()].as_str(),
                student.registration_number.as_str(),
            )
        })
        .collect();

    let mut tx = db.begin().await?;
    for chunk in pairs.chunks(batch_size(2)) {
        let query = format!(
            "INSERT INTO faculty_username_mapping (faculty_username, registration_number) VALUES {} \
             ON CONFLICT (faculty_username, registration_number) DO NOTHING",
            placeholders(chunk.len(), 2)
        );
        let mut q = sqlx::query(&query);
        for (username, registration_number) in chunk {
            q = q.bind(*username).bind(*registration_number);
        }
        q.execute(&mut *tx).await?;
    }
    tx.commit().await?;

    println!("   ✓ Mapped students in {:?}", start_time.elapsed());
    Ok(())
}

pub async fn seed_achievements(
    db: &PgPool,
    students: &[StudentSeed],
    per_student: usize,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let achievements = generate_achievements(students, per_student);
    println!("🏆 Seeding {} achievements...", achievements.len());

    let mut tx = db.begin().await?;
    for chunk in achievements.chunks(batch_size(6)) {
        insert_achievements_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} achievements in {:?}",
        achievements.len(),
        start_time.elapsed()
    );
    Ok(achievements.len())
}

async fn insert_achievements_chunk(
    tx: &mut Transaction<'_, Postgres>,
    achievements: &[AchievementSeed],
) -> anyhow::Result<()> {
    if achievements.is_empty() {
        return Ok(());
    }

    let query = format!(
        r#"INSERT INTO achievements (registration_number, title, description, category,
                                     achievement_date, scope)
           VALUES {}"#,
        placeholders(achievements.len(), 6)
    );

    let mut q = sqlx::query(&query);
    for achievement in achievements {
        q = q
            .bind(&achievement.registration_number)
            .bind(&achievement.title)
            .bind(&achievement.description)
            .bind(achievement.category)
            .bind(achievement.achievement_date)
            .bind(achievement.scope);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

pub async fn seed_certifications(
    db: &PgPool,
    students: &[StudentSeed],
    per_student: usize,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let certifications = generate_certifications(students, per_student);
    println!("📜 Seeding {} certifications...", certifications.len());

    let mut tx = db.begin().await?;
    for chunk in certifications.chunks(batch_size(7)) {
        insert_certifications_chunk(&mut tx, chunk).await?;
    }
    tx.commit().await?;

    println!(
        "   ✓ Inserted {} certifications in {:?}",
        certifications.len(),
        start_time.elapsed()
    );
    Ok(certifications.len())
}

async fn insert_certifications_chunk(
    tx: &mut Transaction<'_, Postgres>,
    certifications: &[CertificationSeed],
) -> anyhow::Result<()> {
    if certifications.is_empty() {
        return Ok(());
    }

    let query = format!(
        r#"INSERT INTO certifications (registration_number, title, issuing_organization,
                                       issue_date, expiry_date, credential_id, certification_type)
           VALUES {}"#,
        placeholders(certifications.len(), 7)
    );

    let mut q = sqlx::query(&query);
    for certification in certifications {
        q = q
            .bind(&certification.registration_number)
            .bind(&certification.title)
            .bind(&certification.issuing_organization)
            .bind(certification.issue_date)
            .bind(certification.expiry_date)
            .bind(&certification.credential_id)
            .bind(certification.certification_type);
    }

    q.execute(&mut **tx).await?;
    Ok(())
}

pub async fn seed_events(
    db: &PgPool,
    count: usize,
    created_by: Option<Uuid>,
) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    let events = generate_events(count);
    println!("📅 Seeding {} calendar events...", events.len());

    if !events.is_empty() {
        let query = format!(
            r#"INSERT INTO calendar_events (title, description, start_date, end_date, event_type,
                                            academic_year, student_years, location,
                                            created_by, updated_by)
               VALUES {}"#,
            placeholders(events.len(), 10)
        );

        let mut q = sqlx::query(&query);
        for event in &events {
            q = q
                .bind(&event.title)
                .bind(&event.description)
                .bind(event.start_date)
                .bind(event.end_date)
                .bind(event.event_type)
                .bind(&event.academic_year)
                .bind(&event.student_years)
                .bind(&event.location)
                .bind(created_by)
                .bind(created_by);
        }
        q.execute(db).await?;
    }

    println!(
        "   ✓ Inserted {} events in {:?}",
        events.len(),
        start_time.elapsed()
    );
    Ok(events.len())
}

/// Deletes events created by seeded staff. Runs before the staff are
/// removed, since that nulls `created_by`.
pub async fn clear_events(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded calendar events...");

    let result = sqlx::query(
        r#"DELETE FROM calendar_events
           WHERE created_by IN (SELECT id FROM users WHERE starts_with(username, $1))"#,
    )
    .bind(SEED_USERNAME_PREFIX)
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} events in {:?}",
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
    fn academic_year_starts_in_june() {
        let may = NaiveDate::from_ymd_opt(2025, 5, 31).unwrap();
        let june = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(academic_year(may), "2024-25");
        assert_eq!(academic_year(june), "2025-26");
        let turn_of_century = NaiveDate::from_ymd_opt(2099, 9, 1).unwrap();
        assert_eq!(academic_year(turn_of_century), "2099-00");
    }

    #[test]
    fn professional_certifications_expire() {
        let students = generate_students(10, 4);
        let certifications = generate_certifications(&students, 3);
        assert_eq!(certifications.len(), 30);
        for cert in &certifications {
            match cert.certification_type {
                "professional" => assert!(cert.expiry_date.unwrap() > cert.issue_date),
                _ => assert!(cert.expiry_date.is_none()),
            }
        }
    }

    #[test]
    fn events_end_after_start() {
        let events = generate_events(15);
        assert_eq!(events.len(), 15);
        for event in &events {
            assert!(event.end_date > event.start_date);
            assert!(EVENT_TYPES.contains(&event.event_type));
            assert!(event.title.chars().next().unwrap().is_uppercase());
        }
    }

    #[test]
    fn achievements_are_dated_in_the_past() {
        let students = generate_students(3, 4);
        let achievements = generate_achievements(&students, 2);
        let today = Utc::now().date_naive();
        assert_eq!(achievements.len(), 6);
        assert!(achievements.iter().all(|a| a.achievement_date <= today));
    }
}
