//! Ingestion pipeline: file on disk → canonical records.
//!
//! Decoding failures abort the whole ingestion; individual rows never fail.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use freedom_core::models::{CanonicalRecord, RawRow};
use freedom_core::Result;
use tracing::{debug, info};

use crate::normalizer::normalize_with_year;
use crate::reader::{load_rows, SourceFormat};

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside an ingestion.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionMetadata {
    /// File the records came from, `None` for in-memory rows.
    pub source: Option<PathBuf>,
    /// Container format, `None` for in-memory rows.
    pub format: Option<SourceFormat>,
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub rows_decoded: usize,
    pub records_produced: usize,
    /// Wall-clock seconds spent reading and decoding the source.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent normalising rows.
    pub normalize_time_seconds: f64,
}

/// The complete output of one ingestion pass.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionResult {
    pub records: Vec<CanonicalRecord>,
    pub metadata: IngestionMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Read, decode and normalise `path`.
///
/// `fallback_year` replaces missing or unparsable years.
pub fn ingest_file(path: &Path, fallback_year: i32) -> Result<IngestionResult> {
    let load_start = Instant::now();
    let (format, rows) = load_rows(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let mut result = ingest_rows(&rows, fallback_year);
    result.metadata.source = Some(path.to_path_buf());
    result.metadata.format = Some(format);
    result.metadata.load_time_seconds = load_time;

    info!(
        path = %path.display(),
        format = %format,
        records = result.records.len(),
        "ingested source file"
    );
    Ok(result)
}

/// Normalise rows that were already decoded.
pub fn ingest_rows(rows: &[RawRow], fallback_year: i32) -> IngestionResult {
    let normalize_start = Instant::now();
    let records = normalize_with_year(rows, fallback_year);
    let normalize_time = normalize_start.elapsed().as_secs_f64();

    debug!(
        rows = rows.len(),
        seconds = normalize_time,
        "normalisation finished"
    );

    IngestionResult {
        metadata: IngestionMetadata {
            source: None,
            format: None,
            generated_at: Utc::now().to_rfc3339(),
            rows_decoded: rows.len(),
            records_produced: records.len(),
            load_time_seconds: 0.0,
            normalize_time_seconds: normalize_time,
        },
        records,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
