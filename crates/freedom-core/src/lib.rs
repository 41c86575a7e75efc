//! Shared building blocks for the freedom index dashboard.
//!
//! Holds the canonical record model, the column synonym tables used during
//! ingestion, the error taxonomy, display formatting helpers and the CLI
//! settings layer.

pub mod columns;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{DashboardError, Result};
