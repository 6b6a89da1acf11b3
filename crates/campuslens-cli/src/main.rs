use anyhow::{Context, bail};
use campuslens_cli::seeder::{self, SeedConfig};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "campuslens-cli")]
#[command(about = "CampusLens CLI - Administrative tools for CampusLens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an administrator account
    CreateAdmin {
        /// Login name
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// First name of the admin
        #[arg(short = 'f', long)]
        first_name: Option<String>,

        /// Last name of the admin
        #[arg(short = 'l', long)]
        last_name: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake staff, students, grades and activity
    Seed {
        /// Number of students to create
        #[arg(short = 's', long, default_value = "120")]
        students: usize,

        /// Number of faculty members (one admin is always added)
        #[arg(long, default_value = "6")]
        faculty: usize,

        /// Achievements per student
        #[arg(long, default_value = "2")]
        achievements: usize,

        /// Certifications per student
        #[arg(long, default_value = "1")]
        certifications: usize,

        /// Number of admission records
        #[arg(long, default_value = "500")]
        admissions: usize,

        /// Number of calendar events
        #[arg(long, default_value = "30")]
        events: usize,
    },
    /// Clear all seeded data (keeps real accounts and students)
    ClearSeed {
        /// Also delete every admission record
        #[arg(long)]
        include_admissions: bool,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let pool = campuslens_db::connect(&database_url()?, 5).await?;

    match cli.command {
        Commands::CreateAdmin {
            username,
            first_name,
            last_name,
            email,
            password,
        } => handle_create_admin(&pool, username, first_name, last_name, email, password).await,
        Commands::Seed {
            students,
            faculty,
            achievements,
            certifications,
            admissions,
            events,
        } => {
            let config = SeedConfig::new(students)
                .with_faculty(faculty)
                .with_activities(achievements, certifications)
                .with_admissions(admissions)
                .with_events(events);
            seeder::seed_all(&pool, &config)
                .await
                .context("Error seeding database")
        }
        Commands::ClearSeed { include_admissions } => seeder::clear_all(&pool, include_admissions)
            .await
            .context("Error clearing seeded data"),
        Commands::Migrate => {
            campuslens_db::run_migrations(&pool).await?;
            println!("✅ Migrations applied");
            Ok(())
        }
    }
}

fn database_url() -> anyhow::Result<String> {
    std::env::var("DATABASE_URL").context("DATABASE_URL must be set")
}

fn prompt(value: Option<String>, label: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => Input::<String>::new()
            .with_prompt(label)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label.to_lowercase())),
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = prompt(username, "Username")?;
    let first_name = prompt(first_name, "First name")?;
    let last_name = prompt(last_name, "Last name")?;
    let email = prompt(email, "Email address")?;
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    create_admin(pool, &username, &first_name, &last_name, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Username: {}", username);
    println!("   Name: {} {}", first_name, last_name);
    Ok(())
}

async fn create_admin(
    db: &PgPool,
    username: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    if username.trim().is_empty() || password.is_empty() {
        bail!("Username and password are required");
    }

    let hashed_password =
        bcrypt::hash(password, bcrypt::DEFAULT_COST).context("Failed to hash password")?;

    let user_id = sqlx::query_scalar::<_, uuid::Uuid>(
        r#"INSERT INTO users (username, password_hash, first_name, last_name, email, role)
           VALUES ($1, $2, $3, $4, $5, 'admin')
           ON CONFLICT (username) DO NOTHING
           RETURNING id"#,
    )
    .bind(username.trim())
    .bind(&hashed_password)
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .fetch_optional(db)
    .await
    .context("Failed to insert admin")?;

    if user_id.is_none() {
        bail!("User with this username already exists");
    }

    Ok(())
}
