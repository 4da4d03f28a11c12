//! Status and choropleth classification.
//!
//! Maps raw status labels to display buckets and area incident counts to
//! fill classes. Both functions are total; anything unrecognized lands in
//! the default bucket.

use risk_map_risk_models::{ChoroplethBucket, StatusBucket};

/// Classifies a raw status label.
///
/// Recognizes the Bangkok Metropolitan Administration's Thai status labels
/// and their English equivalents (case-insensitive). Missing, blank, and
/// unrecognized labels map to [`StatusBucket::Unresolved`], the same
/// bucket missing statuses are grouped under in summaries.
#[must_use]
pub fn classify_status(status: Option<&str>) -> StatusBucket {
    let Some(status) = status else {
        return StatusBucket::Unresolved;
    };

    match status.trim().to_lowercase().as_str() {
        "แก้ไขแล้วเสร็จ" | "resolved" => StatusBucket::Resolved,
        "แก้ไขแล้วเสร็จบางส่วน" | "partially resolved" => {
            StatusBucket::PartiallyResolved
        }
        "อยู่ระหว่างดำเนินการแก้ไข" | "in progress" => StatusBucket::InProgress,
        _ => StatusBucket::Unresolved,
    }
}

/// Returns the fill class for an area with `count` incidents.
#[must_use]
pub const fn choropleth_bucket(count: u64) -> ChoroplethBucket {
    match count {
        21.. => ChoroplethBucket::Severe,
        16..=20 => ChoroplethBucket::High,
        11..=15 => ChoroplethBucket::Moderate,
        6..=10 => ChoroplethBucket::Low,
        _ => ChoroplethBucket::Minimal,
    }
}

/// A single row of the choropleth legend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Bucket this row describes.
    pub bucket: ChoroplethBucket,
    /// Row label, e.g. `"5–10"` or `"20+"`.
    pub label: String,
    /// Fill color.
    pub color: &'static str,
}

/// Returns the legend rows, lowest bucket first.
#[must_use]
pub fn legend() -> Vec<LegendEntry> {
    let buckets = ChoroplethBucket::ALL;
    buckets
        .iter()
        .enumerate()
        .map(|(i, &bucket)| {
            let label = buckets.get(i + 1).map_or_else(
                || format!("{}+", bucket.grade()),
                |next| format!("{}–{}", bucket.grade(), next.grade()),
            );
            LegendEntry {
                bucket,
                label,
                color: bucket.color(),
            }
        })
        .collect()
}
