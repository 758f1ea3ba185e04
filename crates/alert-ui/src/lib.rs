//! Terminal dashboard for AlertIndia.
//!
//! Provides themes, share bars, header and status indicator components,
//! the region, preview and alert tables, and the main application event
//! loop built on top of [`ratatui`].

pub mod app;
pub mod components;
pub mod table_view;
pub mod themes;

pub use alert_core as core;
pub use app::{App, Page};
