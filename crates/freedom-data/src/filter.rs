//! Record filtering applied before tabulation and aggregation.

use freedom_core::models::CanonicalRecord;

/// Optional constraints on country, region and status.
///
/// Empty strings are treated the same as "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Case-insensitive substring of the country name.
    pub country_query: Option<String>,
    /// Exact region label.
    pub region: Option<String>,
    /// Exact status label.
    pub status: Option<String>,
}

impl RecordFilter {
    /// `true` when at least one constraint is set.
    pub fn is_active(&self) -> bool {
        non_empty(&self.country_query).is_some()
            || non_empty(&self.region).is_some()
            || non_empty(&self.status).is_some()
    }

    /// `true` when `record` satisfies every set constraint.
    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        if let Some(query) = non_empty(&self.country_query) {
            if !record
                .country
                .to_lowercase()
                .contains(&query.to_lowercase())
            {
                return false;
            }
        }
        if let Some(region) = non_empty(&self.region) {
            if record.region != region {
                return false;
            }
        }
        if let Some(status) = non_empty(&self.status) {
            if record.status.as_str() != status {
                return false;
            }
        }
        true
    }

    /// Keep the matching records, in input order.
    pub fn apply(&self, records: &[CanonicalRecord]) -> Vec<CanonicalRecord> {
        if !self.is_active() {
            return records.to_vec();
        }
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// Short human-readable description, e.g. `region=Europe status=Libre`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(q) = non_empty(&self.country_query) {
            parts.push(format!("country~{}", q));
        }
        if let Some(r) = non_empty(&self.region) {
            parts.push(format!("region={}", r));
        }
        if let Some(s) = non_empty(&self.status) {
            parts.push(format!("status={}", s));
        }
        if parts.is_empty() {
            "no filter".to_string()
        } else {
            parts.join(" ")
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use freedom_core::models::Status;
    use std::collections::BTreeMap;

    fn record(country: &str, region: &str, status: &str) -> CanonicalRecord {
        CanonicalRecord {
            country: country.to_string(),
            region: region.to_string(),
            year: 2020,
            status: Status::from_label(status),
            political_rights: 1,
            civil_liberties: 1,
            extra: BTreeMap::new(),
        }
    }

    fn sample() -> Vec<CanonicalRecord> {
        vec![
            record("France", "Europe", "Libre"),
            record("Finland", "Europe", "Libre"),
            record("Russia", "Europe", "Pas libre"),
            record("Chile", "Americas", "Libre"),
        ]
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        let f = RecordFilter::default();
        assert!(!f.is_active());
        assert_eq!(f.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_country_substring_case_insensitive() {
        let f = RecordFilter {
            country_query: Some("FIN".to_string()),
            ..Default::default()
        };
        let kept = f.apply(&sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].country, "Finland");
    }

    #[test]
    fn test_region_exact_match() {
        let f = RecordFilter {
            region: Some("Europe".to_string()),
            ..Default::default()
        };
        assert_eq!(f.apply(&sample()).len(), 3);

        let partial = RecordFilter {
            region: Some("Euro".to_string()),
            ..Default::default()
        };
        assert!(partial.apply(&sample()).is_empty());
    }

    #[test]
    fn test_combined_constraints_preserve_order() {
        let f = RecordFilter {
            region: Some("Europe".to_string()),
            status: Some("Libre".to_string()),
            ..Default::default()
        };
        let names: Vec<String> = f.apply(&sample()).into_iter().map(|r| r.country).collect();
        assert_eq!(names, vec!["France", "Finland"]);
    }

    #[test]
    fn test_empty_strings_are_no_constraint() {
        let f = RecordFilter {
            country_query: Some(String::new()),
            region: Some(String::new()),
            status: None,
        };
        assert!(!f.is_active());
        assert_eq!(f.apply(&sample()).len(), 4);
    }

    #[test]
    fn test_describe() {
        assert_eq!(RecordFilter::default().describe(), "no filter");
        let f = RecordFilter {
            region: Some("Europe".to_string()),
            status: Some("Libre".to_string()),
            ..Default::default()
        };
        assert_eq!(f.describe(), "region=Europe status=Libre");
    }
}
