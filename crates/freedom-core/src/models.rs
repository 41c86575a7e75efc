use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Label used when a region or status is absent from the source row.
pub const UNSPECIFIED: &str = "Non spécifié";

/// Canonical label for the "free" status category.
pub const LABEL_FREE: &str = "Libre";
/// Canonical label for the "partly free" status category.
pub const LABEL_PARTLY_FREE: &str = "Partiellement libre";
/// Canonical label for the "not free" status category.
pub const LABEL_NOT_FREE: &str = "Pas libre";

/// Placeholder country name for the row at 0-based `index`.
pub fn placeholder_country(index: usize) -> String {
    format!("Country {}", index + 1)
}

// ── CellValue ─────────────────────────────────────────────────────────────────

/// One decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Empty,
}

impl CellValue {
    /// `true` for empty cells and text that is only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Compare two cells of compatible kinds.
    ///
    /// Numbers compare numerically (ints and floats mix), text
    /// lexicographically, booleans `false < true`. Any other pairing is not
    /// comparable and yields `None`.
    pub fn compare(&self, other: &CellValue) -> Option<Ordering> {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => return a.partial_cmp(&b),
            (Some(_), None) | (None, Some(_)) => return None,
            (None, None) => {}
        }
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => Some(a.cmp(b)),
            (CellValue::Bool(a), CellValue::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

// ── RawRow ────────────────────────────────────────────────────────────────────

/// One spreadsheet row before normalisation: column name → cell.
///
/// Column names are whatever the source header row says; synonyms are
/// resolved later by the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    cells: BTreeMap<String, CellValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        self.cells.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CellValue)> {
        self.cells.iter()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<CellValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

/// Freedom status of a country-year record.
///
/// Unknown labels are preserved verbatim in [`Status::Other`]; nothing is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Free,
    PartlyFree,
    NotFree,
    Other(String),
}

impl Status {
    /// Classify a label by exact string equality with the canonical labels.
    pub fn from_label(label: &str) -> Self {
        match label {
            LABEL_FREE => Status::Free,
            LABEL_PARTLY_FREE => Status::PartlyFree,
            LABEL_NOT_FREE => Status::NotFree,
            other => Status::Other(other.to_string()),
        }
    }

    /// The status label as it appears in source data.
    pub fn as_str(&self) -> &str {
        match self {
            Status::Free => LABEL_FREE,
            Status::PartlyFree => LABEL_PARTLY_FREE,
            Status::NotFree => LABEL_NOT_FREE,
            Status::Other(s) => s,
        }
    }

    /// The counting bucket this status falls into.
    pub fn bucket(&self) -> StatusBucket {
        match self {
            Status::Free => StatusBucket::Free,
            Status::PartlyFree => StatusBucket::PartlyFree,
            Status::NotFree => StatusBucket::NotFree,
            Status::Other(_) => StatusBucket::Other,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::from_label(&s)
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.as_str().to_string()
    }
}

/// Counting bucket for per-year status breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    Free,
    PartlyFree,
    NotFree,
    Other,
}

// ── CanonicalRecord ───────────────────────────────────────────────────────────

/// A normalised country-year record.
///
/// The total score is derived on demand from the two sub-scores and never
/// stored, so it cannot drift from them.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub country: String,
    pub region: String,
    pub year: i32,
    pub status: Status,
    pub political_rights: i32,
    pub civil_liberties: i32,
    /// Source columns not consumed by any canonical field.
    pub extra: BTreeMap<String, CellValue>,
}

impl CanonicalRecord {
    /// `political_rights + civil_liberties`, widened so that any pair of
    /// parsed sub-scores sums without overflow.
    pub fn total_score(&self) -> i64 {
        i64::from(self.political_rights) + i64::from(self.civil_liberties)
    }
}

impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CanonicalRecord", 8)?;
        s.serialize_field("country", &self.country)?;
        s.serialize_field("region", &self.region)?;
        s.serialize_field("year", &self.year)?;
        s.serialize_field("status", self.status.as_str())?;
        s.serialize_field("politicalRights", &self.political_rights)?;
        s.serialize_field("civilLiberties", &self.civil_liberties)?;
        s.serialize_field("totalScore", &self.total_score())?;
        s.serialize_field("extra", &self.extra)?;
        s.end()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pr: i32, cl: i32) -> CanonicalRecord {
        CanonicalRecord {
            country: "Utopia".to_string(),
            region: "Europe".to_string(),
            year: 2020,
            status: Status::Free,
            political_rights: pr,
            civil_liberties: cl,
            extra: BTreeMap::new(),
        }
    }

    // ── Status ────────────────────────────────────────────────────────────────

    #[test]
    fn test_status_from_canonical_labels() {
        assert_eq!(Status::from_label("Libre"), Status::Free);
        assert_eq!(Status::from_label("Partiellement libre"), Status::PartlyFree);
        assert_eq!(Status::from_label("Pas libre"), Status::NotFree);
    }

    #[test]
    fn test_status_unknown_label_preserved() {
        let s = Status::from_label("libre");
        assert_eq!(s, Status::Other("libre".to_string()));
        assert_eq!(s.as_str(), "libre");
        assert_eq!(s.bucket(), StatusBucket::Other);
    }

    #[test]
    fn test_status_serde_as_plain_string() {
        let json = serde_json::to_string(&Status::PartlyFree).unwrap();
        assert_eq!(json, "\"Partiellement libre\"");
        let back: Status = serde_json::from_str("\"Pas libre\"").unwrap();
        assert_eq!(back, Status::NotFree);
    }

    // ── CanonicalRecord ───────────────────────────────────────────────────────

    #[test]
    fn test_total_score_is_sum() {
        assert_eq!(record(7, 6).total_score(), 13);
        assert_eq!(record(0, 0).total_score(), 0);
    }

    #[test]
    fn test_total_score_does_not_overflow_at_i32_bounds() {
        assert_eq!(record(i32::MAX, 1).total_score(), i64::from(i32::MAX) + 1);
        assert_eq!(record(i32::MIN, -1).total_score(), i64::from(i32::MIN) - 1);
        let value = serde_json::to_value(record(i32::MAX, 1)).unwrap();
        assert_eq!(value["totalScore"], 2_147_483_648_i64);
    }

    #[test]
    fn test_record_serializes_total_score() {
        let value = serde_json::to_value(record(3, 4)).unwrap();
        assert_eq!(value["totalScore"], 7);
        assert_eq!(value["politicalRights"], 3);
        assert_eq!(value["civilLiberties"], 4);
        assert_eq!(value["status"], "Libre");
    }

    #[test]
    fn test_placeholder_country_is_one_based() {
        assert_eq!(placeholder_country(0), "Country 1");
        assert_eq!(placeholder_country(41), "Country 42");
    }

    // ── CellValue ─────────────────────────────────────────────────────────────

    #[test]
    fn test_cell_is_blank() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from("x").is_blank());
        assert!(!CellValue::Int(0).is_blank());
    }

    #[test]
    fn test_cell_compare_mixed_numbers() {
        assert_eq!(
            CellValue::Int(2).compare(&CellValue::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            CellValue::from("b").compare(&CellValue::from("a")),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_cell_compare_incompatible_is_none() {
        assert_eq!(CellValue::Int(1).compare(&CellValue::from("1")), None);
        assert_eq!(CellValue::Empty.compare(&CellValue::Empty), None);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::from("abc").to_string(), "abc");
        assert_eq!(CellValue::Empty.to_string(), "");
    }

    // ── RawRow ────────────────────────────────────────────────────────────────

    #[test]
    fn test_raw_row_from_iter() {
        let row: RawRow = [("Pays", "Utopia"), ("Année", "2020")].into_iter().collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row.get("Pays"), Some(&CellValue::from("Utopia")));
        assert!(row.get("Region").is_none());
    }
}
