//! Derived statistics over a (possibly filtered) record collection.
//!
//! Every function here is pure: the same records always produce the same
//! output, and an empty collection is a well-defined "no data" case rather
//! than an error.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use freedom_core::formatting::{average, percentage, round1};
use freedom_core::models::{CanonicalRecord, Status, StatusBucket};
use serde::Serialize;

/// Regions kept by [`region_summary`] when nothing else is configured.
pub const DEFAULT_TOP_REGIONS: usize = 10;

/// Minimum change in average total score between the earliest and latest
/// year for a trend to count as improving or declining.
pub const TREND_THRESHOLD: f64 = 0.5;

// ── Status distribution ───────────────────────────────────────────────────────

/// Count and share of one distinct status value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusShare {
    pub status: Status,
    pub count: usize,
    /// Percentage of all records, one decimal place.
    pub percentage: f64,
}

/// One entry per distinct status, in order of first occurrence.
///
/// Statuses are grouped by their label, so unknown labels get their own
/// entry rather than being folded together.
pub fn status_distribution(records: &[CanonicalRecord]) -> Vec<StatusShare> {
    let mut order: Vec<&Status> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let label = record.status.as_str();
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            order.push(&record.status);
        }
        *count += 1;
    }

    let total = records.len() as f64;
    order
        .into_iter()
        .map(|status| {
            let count = counts.get(status.as_str()).copied().unwrap_or(0);
            StatusShare {
                status: status.clone(),
                count,
                percentage: percentage(count as f64, total, 1),
            }
        })
        .collect()
}

// ── Region summary ────────────────────────────────────────────────────────────

/// Record count and average scores for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub region: String,
    pub count: usize,
    pub avg_political_rights: f64,
    pub avg_civil_liberties: f64,
}

#[derive(Default)]
struct RegionAccumulator {
    count: usize,
    political_rights: i64,
    civil_liberties: i64,
}

/// The `top_n` regions with the most records, descending by count.
///
/// Regions with equal counts keep their first-encountered order.
pub fn region_summary(records: &[CanonicalRecord], top_n: usize) -> Vec<RegionSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut acc: HashMap<&str, RegionAccumulator> = HashMap::new();

    for record in records {
        let entry = acc.entry(record.region.as_str()).or_insert_with(|| {
            order.push(record.region.as_str());
            RegionAccumulator::default()
        });
        entry.count += 1;
        entry.political_rights += i64::from(record.political_rights);
        entry.civil_liberties += i64::from(record.civil_liberties);
    }

    let mut summaries: Vec<RegionSummary> = order
        .into_iter()
        .filter_map(|region| {
            acc.get(region).map(|a| RegionSummary {
                region: region.to_string(),
                count: a.count,
                avg_political_rights: round1(average(a.political_rights, a.count)),
                avg_civil_liberties: round1(average(a.civil_liberties, a.count)),
            })
        })
        .collect();

    // Stable sort keeps first-encountered order for equal counts.
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries.truncate(top_n);
    summaries
}

// ── Yearly trend ──────────────────────────────────────────────────────────────

/// Per-year totals for the trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSeriesPoint {
    pub year: i32,
    pub count: usize,
    pub political_rights_sum: i64,
    pub civil_liberties_sum: i64,
    pub avg_political_rights: f64,
    pub avg_civil_liberties: f64,
    pub avg_total_score: f64,
    pub free: usize,
    pub partly_free: usize,
    pub not_free: usize,
    /// Records whose status is none of the three canonical labels.
    pub other: usize,
}

impl YearSeriesPoint {
    fn new(year: i32) -> Self {
        Self {
            year,
            count: 0,
            political_rights_sum: 0,
            civil_liberties_sum: 0,
            avg_political_rights: 0.0,
            avg_civil_liberties: 0.0,
            avg_total_score: 0.0,
            free: 0,
            partly_free: 0,
            not_free: 0,
            other: 0,
        }
    }

    fn add_record(&mut self, record: &CanonicalRecord) {
        self.count += 1;
        self.political_rights_sum += i64::from(record.political_rights);
        self.civil_liberties_sum += i64::from(record.civil_liberties);
        match record.status.bucket() {
            StatusBucket::Free => self.free += 1,
            StatusBucket::PartlyFree => self.partly_free += 1,
            StatusBucket::NotFree => self.not_free += 1,
            StatusBucket::Other => self.other += 1,
        }
    }

    fn finish(&mut self) {
        self.avg_political_rights = round1(average(self.political_rights_sum, self.count));
        self.avg_civil_liberties = round1(average(self.civil_liberties_sum, self.count));
        self.avg_total_score = round1(self.raw_total_average());
    }

    /// Unrounded mean total score for the year.
    pub fn raw_total_average(&self) -> f64 {
        average(self.political_rights_sum + self.civil_liberties_sum, self.count)
    }
}

/// One point per distinct year, ascending.
pub fn yearly_trend(records: &[CanonicalRecord]) -> Vec<YearSeriesPoint> {
    let mut by_year: BTreeMap<i32, YearSeriesPoint> = BTreeMap::new();
    for record in records {
        by_year
            .entry(record.year)
            .or_insert_with(|| YearSeriesPoint::new(record.year))
            .add_record(record);
    }

    by_year
        .into_values()
        .map(|mut point| {
            point.finish();
            point
        })
        .collect()
}

// ── Trend classification ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare the earliest and latest year of an ascending series.
///
/// Fewer than two points is always [`Trend::Stable`].
pub fn classify_trend(series: &[YearSeriesPoint]) -> Trend {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (first, last),
        _ => return Trend::Stable,
    };

    let delta = last.raw_total_average() - first.raw_total_average();
    if delta > TREND_THRESHOLD {
        Trend::Improving
    } else if delta < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

// ── Headline ──────────────────────────────────────────────────────────────────

/// Top-line figures for the summary cards.
///
/// The three category counts use exact canonical-label matching, so
/// records with any other status fall into none of them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineStats {
    pub total: usize,
    pub free_count: usize,
    pub partly_free_count: usize,
    pub not_free_count: usize,
    pub free_percentage: f64,
    pub partly_free_percentage: f64,
    pub not_free_percentage: f64,
    pub avg_political_rights: f64,
    pub avg_civil_liberties: f64,
    pub avg_total_score: f64,
    pub distinct_regions: usize,
    pub distinct_years: usize,
}

/// `None` for an empty collection.
pub fn headline(records: &[CanonicalRecord]) -> Option<HeadlineStats> {
    if records.is_empty() {
        return None;
    }

    let mut free = 0usize;
    let mut partly_free = 0usize;
    let mut not_free = 0usize;
    let mut pr_sum = 0i64;
    let mut cl_sum = 0i64;
    let mut regions: HashSet<&str> = HashSet::new();
    let mut years: HashSet<i32> = HashSet::new();

    for record in records {
        match record.status.bucket() {
            StatusBucket::Free => free += 1,
            StatusBucket::PartlyFree => partly_free += 1,
            StatusBucket::NotFree => not_free += 1,
            StatusBucket::Other => {}
        }
        pr_sum += i64::from(record.political_rights);
        cl_sum += i64::from(record.civil_liberties);
        regions.insert(record.region.as_str());
        years.insert(record.year);
    }

    let total = records.len();
    let whole = total as f64;
    Some(HeadlineStats {
        total,
        free_count: free,
        partly_free_count: partly_free,
        not_free_count: not_free,
        free_percentage: percentage(free as f64, whole, 1),
        partly_free_percentage: percentage(partly_free as f64, whole, 1),
        not_free_percentage: percentage(not_free as f64, whole, 1),
        avg_political_rights: round1(average(pr_sum, total)),
        avg_civil_liberties: round1(average(cl_sum, total)),
        avg_total_score: round1(average(pr_sum + cl_sum, total)),
        distinct_regions: regions.len(),
        distinct_years: years.len(),
    })
}

// ── DerivedStats ──────────────────────────────────────────────────────────────

/// Everything the dashboard derives from one record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedStats {
    pub headline: HeadlineStats,
    pub status_distribution: Vec<StatusShare>,
    pub regions: Vec<RegionSummary>,
    pub yearly: Vec<YearSeriesPoint>,
    pub trend: Trend,
}

/// Rebuild all derived views from scratch. `None` for an empty collection.
pub fn compute_stats(records: &[CanonicalRecord], top_n: usize) -> Option<DerivedStats> {
    let headline = headline(records)?;
    let yearly = yearly_trend(records);
    let trend = classify_trend(&yearly);
    Some(DerivedStats {
        headline,
        status_distribution: status_distribution(records),
        regions: region_summary(records, top_n),
        yearly,
        trend,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
