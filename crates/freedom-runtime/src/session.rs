//! The dashboard's working collection and the views derived from it.
//!
//! [`DashboardSession`] owns the loaded records and rebuilds the filtered,
//! ordered and aggregated views explicitly whenever one of their inputs
//! changes. A failed ingestion is recorded but never clears data that is
//! already loaded.

use freedom_core::models::CanonicalRecord;
use freedom_core::Result;
use freedom_data::aggregator::{compute_stats, DerivedStats, DEFAULT_TOP_REGIONS};
use freedom_data::analysis::{IngestionMetadata, IngestionResult};
use freedom_data::filter::RecordFilter;
use freedom_data::table::{paginate, sort_records, Page, SortKey, SortState, DEFAULT_PAGE_SIZE};

// ── DashboardSession ──────────────────────────────────────────────────────────

/// Controller state for one dashboard session.
///
/// # Example
/// ```
/// use freedom_runtime::session::DashboardSession;
/// use freedom_data::analysis::ingest_rows;
///
/// let mut session = DashboardSession::default();
/// session.apply_ingestion(Ok(ingest_rows(&[], 2024)));
/// assert!(session.stats().is_none());
/// assert_eq!(session.current_page().total_pages, 1);
/// ```
#[derive(Debug, Clone)]
pub struct DashboardSession {
    /// Full collection from the last successful ingestion.
    records: Vec<CanonicalRecord>,
    /// Metadata of the last successful ingestion.
    source: Option<IngestionMetadata>,
    filter: RecordFilter,
    sort: SortState,
    /// 1-based; clamped whenever the view is paged.
    page: usize,
    page_size: usize,
    top_regions: usize,
    /// Filtered records in display order.
    view: Vec<CanonicalRecord>,
    stats: Option<DerivedStats>,
    last_error: Option<String>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_TOP_REGIONS)
    }
}

impl DashboardSession {
    pub fn new(page_size: usize, top_regions: usize) -> Self {
        Self {
            records: Vec::new(),
            source: None,
            filter: RecordFilter::default(),
            sort: SortState::default(),
            page: 1,
            page_size: page_size.max(1),
            top_regions,
            view: Vec::new(),
            stats: None,
            last_error: None,
        }
    }

    // ── Ingestion ─────────────────────────────────────────────────────────

    /// Swap in a new collection, or record why it could not be loaded.
    ///
    /// On success the page resets to 1 and every view is rebuilt. On failure
    /// the previous collection and views stay exactly as they were.
    /// Returns `true` when the collection was replaced.
    pub fn apply_ingestion(&mut self, result: Result<IngestionResult>) -> bool {
        match result {
            Ok(ingested) => {
                tracing::debug!(
                    records = ingested.records.len(),
                    "replacing working collection"
                );
                self.records = ingested.records;
                self.source = Some(ingested.metadata);
                self.last_error = None;
                self.page = 1;
                self.recompute();
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "ingestion failed; keeping previous collection");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }

    // ── Filter ────────────────────────────────────────────────────────────

    pub fn set_filter(&mut self, filter: RecordFilter) {
        self.filter = filter;
        self.page = 1;
        self.recompute();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(RecordFilter::default());
    }

    /// Advance the region constraint to the next known region, wrapping back
    /// to "any region" after the last one.
    pub fn cycle_region(&mut self) {
        let regions = self.regions();
        let next = next_in_cycle(&regions, self.filter.region.as_deref());
        let mut filter = self.filter.clone();
        filter.region = next;
        self.set_filter(filter);
    }

    /// Same as [`cycle_region`](Self::cycle_region) for status labels.
    pub fn cycle_status(&mut self) {
        let statuses = self.statuses();
        let next = next_in_cycle(&statuses, self.filter.status.as_deref());
        let mut filter = self.filter.clone();
        filter.status = next;
        self.set_filter(filter);
    }

    // ── Sort ──────────────────────────────────────────────────────────────

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.recompute();
    }

    /// Same key flips direction; a new key sorts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
        self.recompute();
    }

    // ── Paging ────────────────────────────────────────────────────────────

    pub fn set_page(&mut self, page: usize) {
        self.page = paginate(&self.view, page, self.page_size).page;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.set_page(self.page);
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Every record from the last successful ingestion, in source order.
    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    /// Records passing the current filter, in the current sort order.
    pub fn filtered(&self) -> &[CanonicalRecord] {
        &self.view
    }

    /// Aggregates over [`filtered`](Self::filtered); `None` when it is empty.
    pub fn stats(&self) -> Option<&DerivedStats> {
        self.stats.as_ref()
    }

    pub fn current_page(&self) -> Page<'_> {
        paginate(&self.view, self.page, self.page_size)
    }

    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn source(&self) -> Option<&IngestionMetadata> {
        self.source.as_ref()
    }

    /// Distinct regions across the whole collection, first-seen order.
    pub fn regions(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.region.as_str()))
    }

    /// Distinct status labels across the whole collection, first-seen order.
    pub fn statuses(&self) -> Vec<String> {
        distinct(self.records.iter().map(|r| r.status.as_str()))
    }

    /// Passthrough column names across the whole collection, first-seen
    /// order.
    pub fn extra_columns(&self) -> Vec<String> {
        distinct(
            self.records
                .iter()
                .flat_map(|r| r.extra.keys().map(String::as_str)),
        )
    }

    // ── Private ───────────────────────────────────────────────────────────

    fn recompute(&mut self) {
        let filtered = self.filter.apply(&self.records);
        self.stats = compute_stats(&filtered, self.top_regions);
        self.view = sort_records(&filtered, &self.sort);
        self.page = paginate(&self.view, self.page, self.page_size).page;
        tracing::debug!(
            total = self.records.len(),
            visible = self.view.len(),
            filter = %self.filter.describe(),
            "views recomputed"
        );
    }
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for v in values {
        if !seen.iter().any(|s| s == v) {
            seen.push(v.to_string());
        }
    }
    seen
}

/// `None` → first; last → `None`; otherwise the following value.
fn next_in_cycle(values: &[String], current: Option<&str>) -> Option<String> {
    match current {
        None => values.first().cloned(),
        Some(cur) => match values.iter().position(|v| v == cur) {
            Some(i) => values.get(i + 1).cloned(),
            None => values.first().cloned(),
        },
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
