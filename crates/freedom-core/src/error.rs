use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the freedom index dashboard.
///
/// Only whole-source failures exist: a malformed row never raises (the
/// normalizer substitutes fallbacks) and aggregation is total.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The source file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source bytes are not a spreadsheet format we can decode.
    #[error("Failed to decode {source_name}: {reason}")]
    Decode { source_name: String, reason: String },

    /// The source decoded but carries no header row to name columns.
    #[error("No header row found in {0}")]
    EmptySource(String),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// Build a [`DashboardError::Decode`] from any displayable cause.
    pub fn decode(source_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// `true` when the underlying byte source could not be read.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::FileRead { .. })
    }

    /// `true` when the bytes were read but could not be decoded.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, Self::Decode { .. } | Self::EmptySource(_))
    }
}

/// Convenience alias used throughout the dashboard crates.
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = DashboardError::FileRead {
            path: PathBuf::from("/data/freedom.xlsx"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/freedom.xlsx"));
        assert!(msg.contains("no such file"));
        assert!(err.is_read_failure());
        assert!(!err.is_decode_failure());
    }

    #[test]
    fn test_error_display_decode() {
        let err = DashboardError::decode("report.xlsx", "invalid zip header");
        assert_eq!(
            err.to_string(),
            "Failed to decode report.xlsx: invalid zip header"
        );
        assert!(err.is_decode_failure());
        assert!(!err.is_read_failure());
    }

    #[test]
    fn test_error_display_empty_source() {
        let err = DashboardError::EmptySource("blank.csv".to_string());
        assert_eq!(err.to_string(), "No header row found in blank.csv");
        assert!(err.is_decode_failure());
    }

    #[test]
    fn test_error_from_anyhow_is_neither_read_nor_decode() {
        let err: DashboardError = anyhow::anyhow!("loader task panicked").into();
        assert_eq!(err.to_string(), "loader task panicked");
        assert!(!err.is_read_failure());
        assert!(!err.is_decode_failure());
    }
}
