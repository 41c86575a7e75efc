//! Runtime layer for the freedom index dashboard.
//!
//! Owns the session state between the data pipeline and the terminal UI and
//! runs file ingestion off the UI thread.

pub mod loader;
pub mod session;

pub use freedom_core as core;
pub use freedom_data as data;
pub use loader::{FileLoader, LoadOutcome};
pub use session::DashboardSession;
