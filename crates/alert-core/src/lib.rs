//! Shared domain types for AlertIndia.
//!
//! Rows and tables, the status tiers with their fixed thresholds, errors,
//! display formatting and command-line settings.

pub mod classification;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
