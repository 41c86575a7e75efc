//! Terminal UI layer for the freedom index dashboard.
//!
//! Provides themes, bar and indicator components, the record table and
//! chart views, and the main application event loop built on top of
//! [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod table_view;
pub mod themes;

pub use freedom_core as core;
