//! Ordering and pagination of records for the tabular view.

use std::cmp::Ordering;
use std::str::FromStr;

use freedom_core::models::{CanonicalRecord, CellValue};

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

// ── SortKey / SortDirection / SortState ───────────────────────────────────────

/// Column a table can be ordered by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Country,
    Region,
    Year,
    Status,
    PoliticalRights,
    CivilLiberties,
    TotalScore,
    /// A passthrough column, by source name.
    Extra(String),
}

impl SortKey {
    /// The seven canonical columns in display order.
    pub fn canonical() -> [SortKey; 7] {
        [
            SortKey::Country,
            SortKey::Region,
            SortKey::Year,
            SortKey::Status,
            SortKey::PoliticalRights,
            SortKey::CivilLiberties,
            SortKey::TotalScore,
        ]
    }

    /// Column header text.
    pub fn label(&self) -> &str {
        match self {
            SortKey::Country => "Country",
            SortKey::Region => "Region",
            SortKey::Year => "Year",
            SortKey::Status => "Status",
            SortKey::PoliticalRights => "PR",
            SortKey::CivilLiberties => "CL",
            SortKey::TotalScore => "Total",
            SortKey::Extra(name) => name,
        }
    }

    fn compare(&self, a: &CanonicalRecord, b: &CanonicalRecord) -> Ordering {
        match self {
            SortKey::Country => compare_text(&a.country, &b.country),
            SortKey::Region => compare_text(&a.region, &b.region),
            SortKey::Year => a.year.cmp(&b.year),
            SortKey::Status => compare_text(a.status.as_str(), b.status.as_str()),
            SortKey::PoliticalRights => a.political_rights.cmp(&b.political_rights),
            SortKey::CivilLiberties => a.civil_liberties.cmp(&b.civil_liberties),
            SortKey::TotalScore => a.total_score().cmp(&b.total_score()),
            SortKey::Extra(name) => compare_extra(a.extra.get(name), b.extra.get(name)),
        }
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    /// Canonical names use kebab-case; anything else names a passthrough column.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "country" => SortKey::Country,
            "region" => SortKey::Region,
            "year" => SortKey::Year,
            "status" => SortKey::Status,
            "political-rights" => SortKey::PoliticalRights,
            "civil-liberties" => SortKey::CivilLiberties,
            "total-score" => SortKey::TotalScore,
            other => SortKey::Extra(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// `▲` or `▼`, for column headers.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Current table ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Country,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Selecting the current column flips direction; a new column starts
    /// ascending.
    pub fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Ascending;
        }
    }
}

/// Return `records` ordered by `state`.
///
/// The sort is stable: equal keys keep their input order in both
/// directions.
pub fn sort_records(records: &[CanonicalRecord], state: &SortState) -> Vec<CanonicalRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ord = state.key.compare(a, b);
        match state.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

// ── Pagination ────────────────────────────────────────────────────────────────

/// One page of a record slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub items: &'a [CanonicalRecord],
    /// 1-based page number, clamped to `1..=total_pages`.
    pub page: usize,
    pub page_size: usize,
    /// Always at least 1, even when there are no items.
    pub total_pages: usize,
    pub total_items: usize,
}

impl Page<'_> {
    /// 1-based index of the first item on this page (0 when empty).
    pub fn first_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last item on this page (0 when empty).
    pub fn last_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_item() + self.items.len() - 1
        }
    }
}

/// Cut `records` into pages of `page_size` and return page `page` (1-based).
///
/// Out-of-range pages clamp to the nearest valid page; a zero page size is
/// treated as 1.
pub fn paginate(records: &[CanonicalRecord], page: usize, page_size: usize) -> Page<'_> {
    let page_size = page_size.max(1);
    let total_items = records.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    Page {
        items: &records[start..end],
        page,
        page_size,
        total_pages,
        total_items,
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Total order over passthrough cells: numbers, then text, then booleans,
/// then missing/empty. Values of the same kind compare naturally; missing
/// values tie with each other.
fn compare_extra(a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
    let rank_a = extra_rank(a);
    let rank_b = extra_rank(b);
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }
    match (a, b) {
        (Some(x), Some(y)) => match (x, y) {
            (CellValue::Text(s), CellValue::Text(t)) => compare_text(s, t),
            _ => x
                .compare(y)
                .unwrap_or_else(|| numeric(x).total_cmp(&numeric(y))),
        },
        _ => Ordering::Equal,
    }
}

fn extra_rank(value: Option<&CellValue>) -> u8 {
    match value {
        Some(CellValue::Int(_)) | Some(CellValue::Float(_)) => 0,
        Some(CellValue::Text(s)) if !s.trim().is_empty() => 1,
        Some(CellValue::Bool(_)) => 2,
        _ => 3,
    }
}

fn numeric(value: &CellValue) -> f64 {
    match value {
        CellValue::Int(i) => *i as f64,
        CellValue::Float(f) => *f,
        _ => 0.0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
