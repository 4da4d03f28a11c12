//! Grouped counts and percentages.

use std::collections::BTreeMap;

use risk_map_risk_models::{
    AggregateSummary, CategoryBreakdown, GroupBreakdown, GroupKey, IncidentFeature,
};

/// Returns `count / total` as a percentage rounded to two decimals.
///
/// Returns `0.0` when `total` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 10_000.0).round() / 100.0
}

/// Counts incidents per distinct value of each key in `keys`.
///
/// Categories appear in the order their first incident appears in
/// `incidents`. The total is always `incidents.len()`, and the counts of
/// every breakdown sum to it.
#[must_use]
pub fn summarize(incidents: &[IncidentFeature], keys: &[GroupKey]) -> AggregateSummary {
    let total = incidents.len() as u64;

    let groups = keys
        .iter()
        .map(|&key| GroupBreakdown {
            key,
            categories: count_by(incidents, key)
                .into_iter()
                .map(|(value, count)| CategoryBreakdown {
                    value,
                    count,
                    percentage: percentage(count, total),
                })
                .collect(),
        })
        .collect();

    AggregateSummary { total, groups }
}

/// Returns the `n` largest categories, largest first.
///
/// The sort is stable, so ties keep their first-encountered order.
#[must_use]
pub fn top_n(breakdown: &GroupBreakdown, n: usize) -> Vec<CategoryBreakdown> {
    let mut categories = breakdown.categories.clone();
    categories.sort_by(|a, b| b.count.cmp(&a.count));
    categories.truncate(n);
    categories
}

/// Returns the distinct values of `key`, in first-encountered order.
#[must_use]
pub fn distinct_values(incidents: &[IncidentFeature], key: GroupKey) -> Vec<String> {
    count_by(incidents, key)
        .into_iter()
        .map(|(value, _)| value)
        .collect()
}

fn count_by(incidents: &[IncidentFeature], key: GroupKey) -> Vec<(String, u64)> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut counts: Vec<(String, u64)> = Vec::new();

    for incident in incidents {
        let value = incident.group_value(key);
        if let Some(&i) = index.get(value) {
            counts[i].1 += 1;
        } else {
            index.insert(value, counts.len());
            counts.push((value.to_string(), 1));
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_map_risk_models::DEFAULT_STATUS_LABEL;

    fn incident(district: Option<&str>, status: Option<&str>) -> IncidentFeature {
        IncidentFeature {
            district: district.map(str::to_string),
            status: status.map(str::to_string),
            ..IncidentFeature::default()
        }
    }

    fn by_district(districts: &[&str]) -> Vec<IncidentFeature> {
        districts.iter().map(|d| incident(Some(d), None)).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_close(percentage(1, 3), 33.33);
        assert_close(percentage(2, 3), 66.67);
        assert_close(percentage(1, 4), 25.0);
        assert_close(percentage(4, 4), 100.0);
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_close(percentage(0, 0), 0.0);
    }

    #[test]
    fn groups_by_district_with_percentages() {
        let summary = summarize(&by_district(&["A", "A", "B", "C"]), &[GroupKey::District]);
        let districts = summary.group(GroupKey::District).unwrap();

        assert_eq!(summary.total, 4);
        let values: Vec<(&str, u64)> = districts
            .categories
            .iter()
            .map(|c| (c.value.as_str(), c.count))
            .collect();
        assert_eq!(values, vec![("A", 2), ("B", 1), ("C", 1)]);
        assert_close(districts.get("A").unwrap().percentage, 50.0);
        assert_close(districts.get("B").unwrap().percentage, 25.0);
        assert_close(districts.get("C").unwrap().percentage, 25.0);
    }

    #[test]
    fn missing_statuses_share_the_default_bucket() {
        let incidents = vec![
            incident(None, Some("resolved")),
            incident(None, Some("resolved")),
            incident(None, Some("")),
            incident(None, None),
            incident(None, Some("in progress")),
        ];
        let summary = summarize(&incidents, &[GroupKey::Status]);
        let statuses = summary.group(GroupKey::Status).unwrap();

        assert_eq!(summary.total, 5);
        assert_eq!(statuses.categories.len(), 3);
        assert_eq!(statuses.get("resolved").unwrap().count, 2);
        assert_eq!(statuses.get("in progress").unwrap().count, 1);
        assert_eq!(statuses.get(DEFAULT_STATUS_LABEL).unwrap().count, 2);
    }

    #[test]
    fn counts_sum_to_total_and_percentages_to_hundred() {
        let incidents = vec![
            incident(Some("A"), Some("x")),
            incident(Some("B"), Some("y")),
            incident(Some("C"), Some("z")),
            incident(Some("A"), None),
            incident(None, Some("x")),
            incident(Some("D"), Some("y")),
            incident(Some("E"), Some("w")),
        ];
        let summary = summarize(&incidents, &[GroupKey::Status, GroupKey::District]);

        assert_eq!(summary.groups.len(), 2);
        for group in &summary.groups {
            let count: u64 = group.categories.iter().map(|c| c.count).sum();
            let pct: f64 = group.categories.iter().map(|c| c.percentage).sum();
            assert_eq!(count, summary.total);
            assert_eq!(count, incidents.len() as u64);
            assert!((pct - 100.0).abs() <= 0.05, "{:?} sums to {pct}", group.key);
        }
    }

    #[test]
    fn empty_input_has_zero_total_and_no_categories() {
        let summary = summarize(&[], &[GroupKey::Status, GroupKey::District]);
        assert_eq!(summary.total, 0);
        assert!(summary.groups.iter().all(|g| g.categories.is_empty()));
    }

    #[test]
    fn top_n_breaks_ties_by_first_appearance() {
        let incidents = by_district(&["B", "A", "C", "A", "B", "A", "B"]);
        let summary = summarize(&incidents, &[GroupKey::District]);
        let districts = summary.group(GroupKey::District).unwrap();

        let top: Vec<String> = top_n(districts, 2).into_iter().map(|c| c.value).collect();
        assert_eq!(top, vec!["B".to_string(), "A".to_string()]);

        let again: Vec<String> = top_n(districts, 2).into_iter().map(|c| c.value).collect();
        assert_eq!(top, again);
    }

    #[test]
    fn top_n_with_tied_leaders() {
        let incidents = by_district(&["A", "B", "A", "C", "B", "A", "B"]);
        let summary = summarize(&incidents, &[GroupKey::District]);
        let top = top_n(summary.group(GroupKey::District).unwrap(), 2);

        assert_eq!(top.len(), 2);
        assert_eq!((top[0].value.as_str(), top[0].count), ("A", 3));
        assert_eq!((top[1].value.as_str(), top[1].count), ("B", 3));
    }

    #[test]
    fn top_n_larger_than_categories_returns_all() {
        let summary = summarize(&by_district(&["A", "B"]), &[GroupKey::District]);
        assert_eq!(top_n(summary.group(GroupKey::District).unwrap(), 5).len(), 2);
    }

    #[test]
    fn distinct_values_keep_first_seen_order() {
        let incidents = vec![
            incident(Some("C"), Some("in progress")),
            incident(Some("A"), None),
            incident(Some("C"), Some("resolved")),
        ];
        assert_eq!(
            distinct_values(&incidents, GroupKey::District),
            vec!["C".to_string(), "A".to_string()]
        );
        assert_eq!(
            distinct_values(&incidents, GroupKey::Status),
            vec![
                "in progress".to_string(),
                DEFAULT_STATUS_LABEL.to_string(),
                "resolved".to_string()
            ]
        );
    }
}
