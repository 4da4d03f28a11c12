//! Area/incident join.

use std::collections::{BTreeMap, BTreeSet};

use risk_map_risk_models::{AreaFeature, IncidentFeature, JoinKey};

/// Writes the number of matching incidents onto each area.
///
/// An incident matches an area when its district key exactly equals the
/// area's [`AreaFeature::join_value`] for `key` (case-sensitive, no
/// normalization). Every area is overwritten, so areas with no matches end
/// up at zero and re-running the join never accumulates. Incidents that
/// match no area are left out of every area count.
pub fn join(areas: &mut [AreaFeature], incidents: &[IncidentFeature], key: JoinKey) {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for district in incidents.iter().filter_map(|i| i.district.as_deref()) {
        *counts.entry(district).or_default() += 1;
    }

    let keys: BTreeSet<&str> = areas.iter().filter_map(|a| a.join_value(key)).collect();
    let unmatched: u64 = counts
        .iter()
        .filter(|(district, _)| !keys.contains(*district))
        .map(|(_, count)| count)
        .sum();
    if unmatched > 0 {
        log::debug!("{unmatched} incidents matched no area by {key}");
    }

    for area in areas.iter_mut() {
        area.incident_count = area
            .join_value(key)
            .and_then(|value| counts.get(value).copied())
            .unwrap_or(0);
    }
}
