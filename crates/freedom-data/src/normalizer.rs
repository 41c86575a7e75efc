//! Raw spreadsheet rows → [`CanonicalRecord`]s.
//!
//! Every row yields exactly one record: missing or unparsable values are
//! replaced by documented fallbacks instead of failing the row.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::Datelike;
use freedom_core::columns::{is_known_column, CanonicalField};
use freedom_core::models::{
    placeholder_country, CanonicalRecord, CellValue, RawRow, Status, UNSPECIFIED,
};
use regex::Regex;
use tracing::{debug, warn};

// ── Public API ────────────────────────────────────────────────────────────────

/// Normalise `rows`, using the current calendar year as the year fallback.
pub fn normalize(rows: &[RawRow]) -> Vec<CanonicalRecord> {
    normalize_with_year(rows, chrono::Local::now().year())
}

/// Normalise `rows` with an explicit fallback year.
///
/// Output order matches input order.
pub fn normalize_with_year(rows: &[RawRow], fallback_year: i32) -> Vec<CanonicalRecord> {
    let mut fallbacks = FallbackCounts::default();
    let records: Vec<CanonicalRecord> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| build_record(index, row, fallback_year, &mut fallbacks))
        .collect();

    debug!(
        rows = rows.len(),
        country_fallbacks = fallbacks.country,
        year_fallbacks = fallbacks.year,
        score_fallbacks = fallbacks.scores,
        "normalised rows"
    );
    if fallbacks.total() > 0 {
        warn!(
            rows = rows.len(),
            fallbacks = fallbacks.total(),
            "substituted fallback values while normalising rows"
        );
    }

    records
}

/// Normalise a single row found at 0-based `index`.
pub fn normalize_row(index: usize, row: &RawRow, fallback_year: i32) -> CanonicalRecord {
    build_record(index, row, fallback_year, &mut FallbackCounts::default())
}

/// Parse an integer the way a lenient spreadsheet user expects.
///
/// * integers pass through;
/// * floats truncate toward zero;
/// * text yields its leading optionally-signed digits after whitespace
///   (`" 7.5"` → 7, `"12abc"` → 12, `"abc"` → `None`).
///
/// Values outside the `i32` range, booleans and empty cells yield `None`.
pub fn parse_int_permissive(value: &CellValue) -> Option<i32> {
    match value {
        CellValue::Int(i) => i32::try_from(*i).ok(),
        CellValue::Float(f) if f.is_finite() => {
            let t = f.trunc();
            if t >= i32::MIN as f64 && t <= i32::MAX as f64 {
                Some(t as i32)
            } else {
                None
            }
        }
        CellValue::Text(s) => leading_integer()
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i32>().ok()),
        _ => None,
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

#[derive(Default)]
struct FallbackCounts {
    country: usize,
    year: usize,
    scores: usize,
}

impl FallbackCounts {
    fn total(&self) -> usize {
        self.country + self.year + self.scores
    }
}

fn leading_integer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("regex is valid"))
}

fn build_record(
    index: usize,
    row: &RawRow,
    fallback_year: i32,
    fallbacks: &mut FallbackCounts,
) -> CanonicalRecord {
    let country = resolve_text(row, CanonicalField::Country).unwrap_or_else(|| {
        fallbacks.country += 1;
        placeholder_country(index)
    });
    let region =
        resolve_text(row, CanonicalField::Region).unwrap_or_else(|| UNSPECIFIED.to_string());
    let status = resolve_text(row, CanonicalField::Status)
        .map(|s| Status::from_label(&s))
        .unwrap_or_else(|| Status::Other(UNSPECIFIED.to_string()));

    let year = resolve_int(row, CanonicalField::Year).unwrap_or_else(|| {
        fallbacks.year += 1;
        fallback_year
    });

    let political_rights = resolve_int(row, CanonicalField::PoliticalRights);
    let civil_liberties = resolve_int(row, CanonicalField::CivilLiberties);
    if political_rights.is_none() || civil_liberties.is_none() {
        fallbacks.scores += 1;
    }

    let extra: BTreeMap<String, CellValue> = row
        .iter()
        .filter(|(column, _)| !is_known_column(column))
        .map(|(column, value)| (column.clone(), value.clone()))
        .collect();

    CanonicalRecord {
        country,
        region,
        year,
        status,
        political_rights: political_rights.unwrap_or(0),
        civil_liberties: civil_liberties.unwrap_or(0),
        extra,
    }
}

fn resolve_text(row: &RawRow, field: CanonicalField) -> Option<String> {
    field.resolve(row).map(|value| value.to_string())
}

fn resolve_int(row: &RawRow, field: CanonicalField) -> Option<i32> {
    field.resolve(row).and_then(parse_int_permissive)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Run `f` under a WARN-level subscriber and return what it logged.
    fn captured_warnings(f: impl FnOnce()) -> String {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        struct Sink(Arc<Mutex<Vec<u8>>>);
        impl Write for Sink {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buf = Arc::new(Mutex::new(Vec::new()));
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || Sink(writer.clone()))
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buf.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    // ── Logging ───────────────────────────────────────────────────────────────

    #[test]
    fn test_fallbacks_emit_warning() {
        let rows = vec![row(&[("Pays", "Utopia")]), row(&[("Year", "2020")])];
        let logs = captured_warnings(|| {
            normalize_with_year(&rows, 2024);
        });
        assert!(logs.contains("WARN"), "logs: {logs}");
        assert!(logs.contains("substituted fallback values"), "logs: {logs}");
    }

    #[test]
    fn test_complete_rows_emit_no_warning() {
        let rows = vec![row(&[
            ("Pays", "Utopia"),
            ("Année", "2020"),
            ("Droits politiques", "7"),
            ("Libertés civiles", "6"),
        ])];
        let logs = captured_warnings(|| {
            normalize_with_year(&rows, 2024);
        });
        assert!(logs.is_empty(), "logs: {logs}");
    }

    // ── parse_int_permissive ──────────────────────────────────────────────────

    #[test]
    fn test_parse_int_plain_text() {
        assert_eq!(parse_int_permissive(&CellValue::from("7")), Some(7));
        assert_eq!(parse_int_permissive(&CellValue::from("  -3")), Some(-3));
        assert_eq!(parse_int_permissive(&CellValue::from("+4")), Some(4));
    }

    #[test]
    fn test_parse_int_leading_digits_only() {
        assert_eq!(parse_int_permissive(&CellValue::from("7.5")), Some(7));
        assert_eq!(parse_int_permissive(&CellValue::from("2020abc")), Some(2020));
    }

    #[test]
    fn test_parse_int_rejects_non_numeric() {
        assert_eq!(parse_int_permissive(&CellValue::from("abc")), None);
        assert_eq!(parse_int_permissive(&CellValue::from("")), None);
        assert_eq!(parse_int_permissive(&CellValue::from("n/a 5")), None);
        assert_eq!(parse_int_permissive(&CellValue::Bool(true)), None);
        assert_eq!(parse_int_permissive(&CellValue::Empty), None);
    }

    #[test]
    fn test_parse_int_numeric_cells() {
        assert_eq!(parse_int_permissive(&CellValue::Int(2021)), Some(2021));
        assert_eq!(parse_int_permissive(&CellValue::Float(6.9)), Some(6));
        assert_eq!(parse_int_permissive(&CellValue::Float(-1.5)), Some(-1));
        assert_eq!(parse_int_permissive(&CellValue::Float(f64::NAN)), None);
        assert_eq!(parse_int_permissive(&CellValue::Int(i64::MAX)), None);
    }

    #[test]
    fn test_parse_int_overflowing_text() {
        assert_eq!(
            parse_int_permissive(&CellValue::from("99999999999999")),
            None
        );
    }

    // ── normalize_row ─────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_row_french_columns() {
        let r = row(&[
            ("Pays", "Utopia"),
            ("Année", "2020"),
            ("Droits politiques", "7"),
            ("Libertés civiles", "6"),
        ]);
        let rec = normalize_row(0, &r, 2024);

        assert_eq!(rec.country, "Utopia");
        assert_eq!(rec.year, 2020);
        assert_eq!(rec.political_rights, 7);
        assert_eq!(rec.civil_liberties, 6);
        assert_eq!(rec.total_score(), 13);
        assert_eq!(rec.status.as_str(), "Non spécifié");
        assert_eq!(rec.region, "Non spécifié");
    }

    #[test]
    fn test_normalize_row_english_columns() {
        let r = row(&[
            ("Country", "Chile"),
            ("Region", "Americas"),
            ("Year", "2018"),
            ("Status", "Libre"),
            ("Political Rights", "1"),
            ("Civil Liberties", "1"),
        ]);
        let rec = normalize_row(3, &r, 2024);
        assert_eq!(rec.country, "Chile");
        assert_eq!(rec.region, "Americas");
        assert_eq!(rec.status, Status::Free);
        assert_eq!(rec.total_score(), 2);
    }

    #[test]
    fn test_normalize_row_missing_everything() {
        let rec = normalize_row(4, &RawRow::new(), 2024);
        assert_eq!(rec.country, "Country 5");
        assert_eq!(rec.year, 2024);
        assert_eq!(rec.political_rights, 0);
        assert_eq!(rec.civil_liberties, 0);
        assert_eq!(rec.total_score(), 0);
        assert!(rec.extra.is_empty());
    }

    #[test]
    fn test_normalize_row_unparsable_year_uses_fallback() {
        let r = row(&[("Pays", "X"), ("Année", "unknown")]);
        assert_eq!(normalize_row(0, &r, 1999).year, 1999);
    }

    #[test]
    fn test_normalize_row_unknown_status_preserved() {
        let r = row(&[("Statut", "Semi-libre")]);
        let rec = normalize_row(0, &r, 2024);
        assert_eq!(rec.status, Status::Other("Semi-libre".to_string()));
    }

    #[test]
    fn test_normalize_row_source_total_is_ignored() {
        let r = row(&[
            ("Droits politiques", "2"),
            ("Libertés civiles", "3"),
            ("Score total", "99"),
        ]);
        let rec = normalize_row(0, &r, 2024);
        assert_eq!(rec.total_score(), 5);
        assert!(!rec.extra.contains_key("Score total"));
    }

    #[test]
    fn test_normalize_row_passthrough_columns() {
        let mut r = row(&[("Pays", "Utopia"), ("Source", "survey")]);
        r.insert("Population", CellValue::Int(1_000_000));
        let rec = normalize_row(0, &r, 2024);

        assert_eq!(rec.extra.len(), 2);
        assert_eq!(rec.extra.get("Source"), Some(&CellValue::from("survey")));
        assert_eq!(rec.extra.get("Population"), Some(&CellValue::Int(1_000_000)));
        assert!(!rec.extra.contains_key("Pays"));
    }

    #[test]
    fn test_normalize_row_numeric_cells() {
        let mut r = RawRow::new();
        r.insert("Year", CellValue::Float(2015.0));
        r.insert("PR", CellValue::Int(5));
        r.insert("CL", CellValue::Float(4.0));
        let rec = normalize_row(0, &r, 2024);
        assert_eq!(rec.year, 2015);
        assert_eq!(rec.total_score(), 9);
    }

    // ── normalize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_preserves_order_and_count() {
        let rows = vec![
            row(&[("Pays", "B")]),
            RawRow::new(),
            row(&[("Pays", "A")]),
        ];
        let records = normalize_with_year(&rows, 2024);
        let names: Vec<&str> = records.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["B", "Country 2", "A"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let rows = vec![
            row(&[("Pays", "A"), ("Année", "x"), ("PR", "3")]),
            row(&[("Country", "B"), ("Status", "Pas libre")]),
        ];
        assert_eq!(
            normalize_with_year(&rows, 2024),
            normalize_with_year(&rows, 2024)
        );
    }

    #[test]
    fn test_normalize_uses_current_year_fallback() {
        let records = normalize(&[RawRow::new()]);
        assert_eq!(records[0].year, chrono::Local::now().year());
    }

    #[test]
    fn test_normalize_empty_input() {
        assert!(normalize_with_year(&[], 2024).is_empty());
    }
}
