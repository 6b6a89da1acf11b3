//! # CampusLens Reports
//!
//! Pure rendering code: nothing in this crate touches the database or HTTP.
//! Services load rows, hand them to these functions and stream the bytes back.
//!
//! - [`grading`]: SGPA, CGPA, credits, letter grades and recommendations
//! - [`charts`]: inline SVG charts for the HTML report
//! - [`html`]: student reports and the sample certificate
//! - [`pdf`]: native PDF rendering for student and achievement reports
//! - [`export`]: tabular CSV and Excel output
//! - [`archive`]: zip bundles of generated files
//! - [`achievements`]: category statistics for achievement exports

pub mod achievements;
pub mod archive;
pub mod charts;
pub mod error;
pub mod export;
pub mod format;
pub mod grading;
pub mod html;
pub mod pdf;

pub use error::{ReportError, Result};
pub use format::DocumentFormat;
pub use grading::build_performance_report;
