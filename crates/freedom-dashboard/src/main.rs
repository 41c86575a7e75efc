mod bootstrap;

use anyhow::{Context, Result};
use chrono::Datelike;
use freedom_core::settings::Settings;
use freedom_data::aggregator::compute_stats;
use freedom_data::analysis::{ingest_file, IngestionResult};
use freedom_data::filter::RecordFilter;
use freedom_data::table::{paginate, sort_records, SortDirection, SortKey, SortState};
use freedom_runtime::loader::FileLoader;
use freedom_runtime::session::DashboardSession;
use freedom_ui::app::{App, ViewMode};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    // The TUI owns the terminal, so it always logs to a file.
    let log_file = match (&settings.log_file, settings.json) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => None,
        (None, false) => Some(bootstrap::default_log_file()),
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Freedom Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Page size: {}",
        settings.view,
        settings.theme,
        settings.page_size
    );

    let fallback_year = chrono::Local::now().year();

    if settings.json {
        let path = settings
            .file
            .as_deref()
            .context("no input file given; pass a spreadsheet path")?;
        let result = ingest_file(path, fallback_year)?;
        let report = headless_report(&settings, &result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut session =
        DashboardSession::new(settings.page_size as usize, settings.top_regions as usize);
    session.set_filter(build_filter(&settings));
    session.set_sort(build_sort(&settings));

    let (loader, rx) = FileLoader::channel();
    let app = App::new(&settings.theme, ViewMode::from_name(&settings.view), session)
        .with_source(settings.file.clone(), fallback_year);

    // The TUI exits on 'q' / Ctrl+C itself; the OS-level handler covers
    // signals that arrive outside raw mode.
    tokio::select! {
        result = app.run(loader, rx) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
        }
    }

    Ok(())
}

/// Filter from `--country`, `--region` and `--status`.
fn build_filter(settings: &Settings) -> RecordFilter {
    RecordFilter {
        country_query: settings.country.clone(),
        region: settings.region.clone(),
        status: settings.status.clone(),
    }
}

/// Ordering from `--sort` and `--desc`.
fn build_sort(settings: &Settings) -> SortState {
    let key = settings.sort.parse().unwrap_or(SortKey::Country);
    let direction = if settings.desc {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    SortState::new(key, direction)
}

/// Everything `--json` prints: ingestion metadata, the active filter, the
/// derived statistics (`null` when nothing matches) and the first page of
/// records in the requested order.
fn headless_report(settings: &Settings, result: &IngestionResult) -> serde_json::Value {
    let filter = build_filter(settings);
    let filtered = filter.apply(&result.records);
    let stats = compute_stats(&filtered, settings.top_regions as usize);
    let sorted = sort_records(&filtered, &build_sort(settings));
    let page = paginate(&sorted, 1, settings.page_size as usize);

    serde_json::json!({
        "metadata": result.metadata,
        "filter": filter.describe(),
        "stats": stats,
        "page": {
            "number": page.page,
            "totalPages": page.total_pages,
            "totalItems": page.total_items,
            "items": page.items,
        },
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
