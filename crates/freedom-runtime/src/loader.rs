//! Background file ingestion.
//!
//! [`FileLoader`] runs the read → decode → normalise pipeline on tokio's
//! blocking pool and reports each completion as a [`LoadOutcome`] over an
//! `mpsc` channel, so the TUI loop never blocks on disk or parsing.
//!
//! Loads are not cancelled: if two are in flight, whichever completes last
//! is the one the receiver applies last.

use std::path::PathBuf;

use freedom_core::{DashboardError, Result};
use freedom_data::analysis::{ingest_file, IngestionResult};
use tokio::sync::mpsc;

// ── Public types ──────────────────────────────────────────────────────────────

/// Result of one background load.
#[derive(Debug)]
pub struct LoadOutcome {
    /// Sequence number assigned when the load was requested.
    pub generation: u64,
    pub path: PathBuf,
    pub result: Result<IngestionResult>,
}

// ── FileLoader ────────────────────────────────────────────────────────────────

/// Spawns ingestion tasks that report back on a shared channel.
pub struct FileLoader {
    tx: mpsc::Sender<LoadOutcome>,
    generation: u64,
}

impl FileLoader {
    pub fn new(tx: mpsc::Sender<LoadOutcome>) -> Self {
        Self { tx, generation: 0 }
    }

    /// Create a loader together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::Receiver<LoadOutcome>) {
        // A handful of outstanding loads is plenty for manual reloads.
        let (tx, rx) = mpsc::channel(8);
        (Self::new(tx), rx)
    }

    /// Start loading `path` in the background and return its generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(&mut self, path: PathBuf, fallback_year: i32) -> u64 {
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();

        tracing::debug!(generation, path = %path.display(), "starting background load");

        tokio::spawn(async move {
            let task_path = path.clone();
            let result = tokio::task::spawn_blocking(move || ingest_file(&task_path, fallback_year))
                .await
                .unwrap_or_else(|e| {
                    Err(DashboardError::Other(anyhow::anyhow!(
                        "ingestion task failed: {e}"
                    )))
                });

            if let Err(e) = tx.send(LoadOutcome { generation, path, result }).await {
                tracing::warn!(error = %e, "failed to deliver load outcome; receiver dropped");
            }
        });

        generation
    }

    /// Generation of the most recently requested load (0 before any).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
