//! Data layer for AlertIndia.
//!
//! Locates and reads the regional CSV dataset, groups rows by region and
//! answers the aggregation queries served by the API and the dashboard.

pub mod aggregator;
pub mod engine;
pub mod reader;

pub use alert_core as core;
pub use engine::AggregationEngine;
