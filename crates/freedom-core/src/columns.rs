//! Column synonym tables.
//!
//! Source spreadsheets name the same field differently depending on their
//! language and origin. Each canonical field owns an ordered list of
//! accepted column names; the first present, non-blank cell wins.

use crate::models::{CellValue, RawRow};

const COUNTRY_KEYS: &[&str] = &["Pays", "Country", "country", "pays"];
const REGION_KEYS: &[&str] = &["Région", "Region", "region", "région"];
const YEAR_KEYS: &[&str] = &["Année", "Year", "year", "annee", "Annee"];
const STATUS_KEYS: &[&str] = &["Statut", "Status", "status", "statut"];
const POLITICAL_RIGHTS_KEYS: &[&str] = &[
    "Droits politiques",
    "Political Rights",
    "PR",
    "political_rights",
    "politicalRights",
];
const CIVIL_LIBERTIES_KEYS: &[&str] = &[
    "Libertés civiles",
    "Civil Liberties",
    "CL",
    "civil_liberties",
    "civilLiberties",
];
// Recognised only so a source total is neither read nor passed through.
const TOTAL_SCORE_KEYS: &[&str] = &["Score total", "Total Score", "Total", "totalScore"];

/// A field of the canonical record that is resolved from source columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    Country,
    Region,
    Year,
    Status,
    PoliticalRights,
    CivilLiberties,
    TotalScore,
}

impl CanonicalField {
    /// Every field, in record order.
    pub fn all() -> [CanonicalField; 7] {
        [
            CanonicalField::Country,
            CanonicalField::Region,
            CanonicalField::Year,
            CanonicalField::Status,
            CanonicalField::PoliticalRights,
            CanonicalField::CivilLiberties,
            CanonicalField::TotalScore,
        ]
    }

    /// Accepted column names in priority order.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            CanonicalField::Country => COUNTRY_KEYS,
            CanonicalField::Region => REGION_KEYS,
            CanonicalField::Year => YEAR_KEYS,
            CanonicalField::Status => STATUS_KEYS,
            CanonicalField::PoliticalRights => POLITICAL_RIGHTS_KEYS,
            CanonicalField::CivilLiberties => CIVIL_LIBERTIES_KEYS,
            CanonicalField::TotalScore => TOTAL_SCORE_KEYS,
        }
    }

    /// Probe `row` for this field: the first synonym with a non-blank cell.
    pub fn resolve(self, row: &RawRow) -> Option<&CellValue> {
        self.synonyms()
            .iter()
            .filter_map(|key| row.get(key))
            .find(|value| !value.is_blank())
    }
}

/// `true` when `column` is a synonym of any canonical field.
pub fn is_known_column(column: &str) -> bool {
    CanonicalField::all()
        .iter()
        .any(|field| field.synonyms().contains(&column))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
