//! End-to-end checks: decoded rows through normalisation, filtering,
//! ordering and aggregation.

use chrono::Datelike;
use freedom_core::formatting::format_ratio;
use freedom_core::models::{RawRow, Status, UNSPECIFIED};
use freedom_data::aggregator::{compute_stats, Trend, DEFAULT_TOP_REGIONS};
use freedom_data::analysis::ingest_file;
use freedom_data::filter::RecordFilter;
use freedom_data::normalizer::{normalize, normalize_with_year};
use freedom_data::table::{paginate, sort_records, SortDirection, SortKey, SortState};
use tempfile::TempDir;

fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

fn scored(country: &str, year: &str, status: &str, pr: &str, cl: &str) -> RawRow {
    row(&[
        ("Country", country),
        ("Year", year),
        ("Status", status),
        ("Political Rights", pr),
        ("Civil Liberties", cl),
    ])
}

#[test]
fn test_utopia_scenario() {
    let rows = vec![row(&[
        ("Pays", "Utopia"),
        ("Année", "2020"),
        ("Droits politiques", "7"),
        ("Libertés civiles", "6"),
    ])];
    let records = normalize(&rows);
    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.country, "Utopia");
    assert_eq!(r.year, 2020);
    assert_eq!(r.political_rights, 7);
    assert_eq!(r.civil_liberties, 6);
    assert_eq!(r.total_score(), 13);
    assert_eq!(r.status.as_str(), UNSPECIFIED);
}

#[test]
fn test_missing_year_and_rights_scenario() {
    let records = normalize(&[row(&[("Country", "Nowhere")])]);
    let r = &records[0];
    assert_eq!(r.year, chrono::Local::now().year());
    assert_eq!(r.political_rights, 0);
    assert_eq!(r.civil_liberties, 0);
    assert_eq!(r.total_score(), 0);
}

#[test]
fn test_trend_scenarios() {
    let improving = normalize_with_year(
        &[scored("A", "2019", "Libre", "2", "1"), scored("B", "2021", "Libre", "3", "2")],
        2024,
    );
    let stats = compute_stats(&improving, DEFAULT_TOP_REGIONS).unwrap();
    assert_eq!(stats.trend, Trend::Improving);

    let declining = normalize_with_year(
        &[scored("A", "2019", "Libre", "3", "2"), scored("B", "2021", "Libre", "2", "1")],
        2024,
    );
    let stats = compute_stats(&declining, DEFAULT_TOP_REGIONS).unwrap();
    assert_eq!(stats.trend, Trend::Declining);

    let stable = normalize_with_year(
        &[scored("A", "2019", "Libre", "2", "1"), scored("B", "2021", "Libre", "2", "1")],
        2024,
    );
    let stats = compute_stats(&stable, DEFAULT_TOP_REGIONS).unwrap();
    assert_eq!(stats.trend, Trend::Stable);
}

#[test]
fn test_four_three_three_headline_scenario() {
    let mut rows = Vec::new();
    for (status, n) in [("Libre", 4), ("Partiellement libre", 3), ("Pas libre", 3)] {
        for i in 0..n {
            rows.push(scored(&format!("{status}{i}"), "2020", status, "4", "4"));
        }
    }
    let records = normalize_with_year(&rows, 2024);
    let stats = compute_stats(&records, DEFAULT_TOP_REGIONS).unwrap();

    assert_eq!(format_ratio(stats.headline.free_percentage), "40.0");
    assert_eq!(format_ratio(stats.headline.partly_free_percentage), "30.0");
    assert_eq!(format_ratio(stats.headline.not_free_percentage), "30.0");

    let sum: f64 = stats.status_distribution.iter().map(|s| s.percentage).sum();
    assert!((sum - 100.0).abs() <= 0.1 + 1e-9);
}

#[test]
fn test_every_row_yields_a_record_with_consistent_total() {
    let rows = vec![
        scored("A", "garbage", "???", "x", "-3"),
        RawRow::new(),
        row(&[("PR", "12abc"), ("CL", " 4 "), ("Total", "999")]),
    ];
    let records = normalize_with_year(&rows, 2024);
    assert_eq!(records.len(), rows.len());
    for r in &records {
        assert_eq!(
            r.total_score(),
            i64::from(r.political_rights) + i64::from(r.civil_liberties)
        );
    }
    assert_eq!(records[0].status, Status::Other("???".to_string()));
    assert_eq!(records[2].total_score(), 16);
}

#[test]
fn test_extreme_scores_sort_and_serialize_without_overflow() {
    let rows = vec![
        scored("Big", "2020", "Libre", "2147483647", "1"),
        scored("Small", "2020", "Libre", "3", "4"),
    ];
    let records = normalize_with_year(&rows, 2024);
    assert_eq!(records[0].political_rights, i32::MAX);
    assert_eq!(records[0].total_score(), 2_147_483_648);

    let sorted = sort_records(
        &records,
        &SortState::new(SortKey::TotalScore, SortDirection::Descending),
    );
    assert_eq!(sorted[0].country, "Big");

    let json = serde_json::to_value(&records[0]).unwrap();
    assert_eq!(json["totalScore"], 2_147_483_648_i64);
    assert!(compute_stats(&records, DEFAULT_TOP_REGIONS).is_some());
}

#[test]
fn test_filter_then_aggregate_then_page() {
    let rows = vec![
        row(&[("Country", "France"), ("Region", "Europe"), ("Status", "Libre"), ("PR", "7"), ("CL", "6")]),
        row(&[("Country", "Finland"), ("Region", "Europe"), ("Status", "Libre"), ("PR", "7"), ("CL", "7")]),
        row(&[("Country", "Chad"), ("Region", "Africa"), ("Status", "Pas libre"), ("PR", "1"), ("CL", "2")]),
    ];
    let records = normalize_with_year(&rows, 2020);

    let filter = RecordFilter {
        region: Some("Europe".to_string()),
        ..Default::default()
    };
    let europe = filter.apply(&records);
    assert_eq!(europe.len(), 2);

    let stats = compute_stats(&europe, DEFAULT_TOP_REGIONS).unwrap();
    assert_eq!(stats.headline.total, 2);
    assert_eq!(stats.regions.len(), 1);
    assert_eq!(stats.headline.avg_total_score, 13.5);

    let sorted = sort_records(&records, &SortState::new(SortKey::TotalScore, SortDirection::Descending));
    let page = paginate(&sorted, 1, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items[0].country, "Finland");

    let none = RecordFilter {
        status: Some("Partiellement libre".to_string()),
        ..Default::default()
    }
    .apply(&records);
    assert!(compute_stats(&none, DEFAULT_TOP_REGIONS).is_none());
}

#[test]
fn test_ingest_csv_file_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scores.csv");
    std::fs::write(
        &path,
        "Pays,Région,Année,Statut,Droits politiques,Libertés civiles,Population\n\
         Utopia,Europe,2019,Libre,6,5,1200\n\
         Erewhon,Océanie,2021,Partiellement libre,4,3,\n",
    )
    .unwrap();

    let result = ingest_file(&path, 2024).unwrap();
    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[0].region, "Europe");
    assert!(result.records[0].extra.contains_key("Population"));
    assert!(!result.records[1].extra.contains_key("Population"));

    let stats = compute_stats(&result.records, DEFAULT_TOP_REGIONS).unwrap();
    assert_eq!(stats.trend, Trend::Declining);
    assert_eq!(stats.yearly.len(), 2);
}

#[test]
fn test_ingest_xlsx_fixture_end_to_end() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("freedom_index.xlsx");

    let result = ingest_file(&path, 2024).unwrap();
    assert_eq!(result.metadata.rows_decoded, 2);
    assert_eq!(result.records.len(), 2);

    let utopia = &result.records[0];
    assert_eq!(utopia.country, "Utopia");
    assert_eq!(utopia.region, "Europe");
    assert_eq!(utopia.year, 2020);
    assert_eq!(utopia.status, Status::Free);
    assert_eq!(utopia.political_rights, 7);
    assert_eq!(utopia.civil_liberties, 6);
    assert_eq!(utopia.total_score(), 13);
    assert!(utopia.extra.contains_key("Population"));

    let erewhon = &result.records[1];
    assert_eq!(erewhon.year, 2024);
    assert_eq!(erewhon.status, Status::NotFree);
    assert_eq!(erewhon.political_rights, 2);
    assert_eq!(erewhon.civil_liberties, 3);

    let stats = compute_stats(&result.records, DEFAULT_TOP_REGIONS).unwrap();
    assert_eq!(stats.headline.free_count, 1);
    assert_eq!(stats.headline.not_free_count, 1);
}

#[test]
fn test_corrupt_workbook_is_a_single_decode_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("upload.xlsx");
    std::fs::write(&path, b"this is not a spreadsheet").unwrap();

    let err = ingest_file(&path, 2024).unwrap_err();
    assert!(err.is_decode_failure());
    assert!(!err.is_read_failure());
}
