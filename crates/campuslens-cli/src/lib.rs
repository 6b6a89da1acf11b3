//! # CampusLens CLI
//!
//! Database seeding utilities for CampusLens development and demos.
//!
//! ## Usage
//!
//! ```ignore
//! use campuslens_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(120); // 120 students with defaults
//! seed_all(&pool, &config).await?;
//! ```

pub mod seeder;
