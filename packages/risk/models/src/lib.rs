#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area, incident, filter, and summary types for the risk map.
//!
//! These are the typed records every other crate works with. Raw `GeoJSON`
//! property bags are decoded into [`AreaFeature`] and [`IncidentFeature`]
//! once at load time; missing fields are represented explicitly as `None`
//! and resolved to defaults through the accessor methods here rather than
//! at each call site.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Category label used for incidents whose status is missing or blank.
pub const DEFAULT_STATUS_LABEL: &str = "unresolved/other";

/// Category label used for incidents with no district key.
pub const UNKNOWN_DISTRICT_LABEL: &str = "unknown";

/// Which area property incidents are joined against.
///
/// The incident `district` property is matched against either the area's
/// subdistrict name or its containing district name, depending on how the
/// incident dataset was keyed.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JoinKey {
    /// Join on the subdistrict (area) name.
    #[default]
    Subdistrict,
    /// Join on the containing district name.
    District,
}

/// One administrative subdistrict polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaFeature {
    /// Subdistrict name.
    pub name: String,
    /// Containing district name.
    pub district: Option<String>,
    /// Containing province name.
    pub province: Option<String>,
    /// Area in square kilometers, as reported by the source.
    pub area_sq_km: Option<f64>,
    /// `GeoJSON` geometry as a JSON string. Opaque to the aggregation.
    pub geometry_json: Option<String>,
    /// Number of incidents joined to this area.
    pub incident_count: u64,
}

impl AreaFeature {
    /// Creates an area with only a name and a zero incident count.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            district: None,
            province: None,
            area_sq_km: None,
            geometry_json: None,
            incident_count: 0,
        }
    }

    /// Returns the value incidents are matched against for `key`.
    ///
    /// An area with an empty name or no district name never matches on the
    /// corresponding key.
    #[must_use]
    pub fn join_value(&self, key: JoinKey) -> Option<&str> {
        match key {
            JoinKey::Subdistrict => Some(self.name.as_str()).filter(|name| !name.is_empty()),
            JoinKey::District => self.district.as_deref(),
        }
    }
}

/// A finite latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Location {
    /// Returns `None` unless both coordinates are finite.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }
}

/// One reported risk point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFeature {
    /// Point location. `None` excludes the incident from marker placement
    /// but not from any count.
    pub location: Option<Location>,
    /// Road the risk point is on.
    pub road_name: Option<String>,
    /// Free-text problem description.
    pub problem: Option<String>,
    /// District key, joined against [`AreaFeature::join_value`].
    pub district: Option<String>,
    /// Raw status label.
    pub status: Option<String>,
    /// Associated remediation project.
    pub project: Option<String>,
}

impl IncidentFeature {
    /// Returns the status used for grouping and filtering.
    ///
    /// Missing or blank statuses collapse into [`DEFAULT_STATUS_LABEL`].
    #[must_use]
    pub fn status_label(&self) -> &str {
        non_blank(self.status.as_deref()).unwrap_or(DEFAULT_STATUS_LABEL)
    }

    /// Returns the district used for grouping, or [`UNKNOWN_DISTRICT_LABEL`].
    #[must_use]
    pub fn district_label(&self) -> &str {
        non_blank(self.district.as_deref()).unwrap_or(UNKNOWN_DISTRICT_LABEL)
    }

    /// Returns the label of this incident under the given grouping key.
    #[must_use]
    pub fn group_value(&self, key: GroupKey) -> &str {
        match key {
            GroupKey::Status => self.status_label(),
            GroupKey::District => self.district_label(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// The current status/district constraint on the active incident subset.
///
/// `None` on either side means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Required status label, compared against
    /// [`IncidentFeature::status_label`].
    pub status: Option<String>,
    /// Required district label, compared against
    /// [`IncidentFeature::district_label`].
    pub district: Option<String>,
}

impl FilterState {
    /// Returns `true` if neither constraint is set.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.status.is_none() && self.district.is_none()
    }

    /// Returns `true` if `incident` satisfies both constraints.
    #[must_use]
    pub fn matches(&self, incident: &IncidentFeature) -> bool {
        let status_ok = self
            .status
            .as_deref()
            .is_none_or(|status| incident.status_label() == status);
        let district_ok = self
            .district
            .as_deref()
            .is_none_or(|district| incident.district_label() == district);
        status_ok && district_ok
    }
}

/// Incident property an aggregate is grouped by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupKey {
    /// Group by [`IncidentFeature::status_label`].
    Status,
    /// Group by [`IncidentFeature::district_label`].
    District,
}

/// Count and share of a single category value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// Category value (status label or district name).
    pub value: String,
    /// Number of incidents with this value.
    pub count: u64,
    /// Share of the total, rounded to two decimals. `0` when the total is `0`.
    pub percentage: f64,
}

/// All category values observed for one [`GroupKey`], in first-encountered
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupBreakdown {
    /// The property grouped by.
    pub key: GroupKey,
    /// Category counts.
    pub categories: Vec<CategoryBreakdown>,
}

impl GroupBreakdown {
    /// Returns the entry for `value`, if observed.
    #[must_use]
    pub fn get(&self, value: &str) -> Option<&CategoryBreakdown> {
        self.categories.iter().find(|c| c.value == value)
    }
}

/// Totals and grouped breakdowns over an incident collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSummary {
    /// Number of incidents summarized.
    pub total: u64,
    /// One breakdown per requested key, in request order.
    pub groups: Vec<GroupBreakdown>,
}

impl AggregateSummary {
    /// Returns the breakdown for `key`, if it was requested.
    #[must_use]
    pub fn group(&self, key: GroupKey) -> Option<&GroupBreakdown> {
        self.groups.iter().find(|g| g.key == key)
    }
}

/// Display class of an incident status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusBucket {
    /// Fully fixed.
    Resolved,
    /// Partly fixed.
    PartiallyResolved,
    /// Work underway.
    InProgress,
    /// Not fixed, missing, or unrecognized. The default bucket.
    Unresolved,
}

impl StatusBucket {
    /// Marker fill color.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Resolved => "#1a9850",
            Self::PartiallyResolved => "#ffa500",
            Self::InProgress => "#ffff00",
            Self::Unresolved => "#ff0000",
        }
    }
}

/// Fill class of an area by incident count.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChoroplethBucket {
    /// 0-5 incidents.
    Minimal,
    /// 6-10 incidents.
    Low,
    /// 11-15 incidents.
    Moderate,
    /// 16-20 incidents.
    High,
    /// More than 20 incidents.
    Severe,
}

impl ChoroplethBucket {
    /// All buckets, lowest first.
    pub const ALL: [Self; 5] = [
        Self::Minimal,
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::Severe,
    ];

    /// Area fill color.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Minimal => "#91cf60",
            Self::Low => "#d9ef8b",
            Self::Moderate => "#fee08b",
            Self::High => "#fc8d59",
            Self::Severe => "#d73027",
        }
    }

    /// Lowest legend grade of this bucket (`0, 5, 10, 15, 20`).
    #[must_use]
    pub const fn grade(self) -> u64 {
        match self {
            Self::Minimal => 0,
            Self::Low => 5,
            Self::Moderate => 10,
            Self::High => 15,
            Self::Severe => 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(district: Option<&str>, status: Option<&str>) -> IncidentFeature {
        IncidentFeature {
            district: district.map(str::to_string),
            status: status.map(str::to_string),
            ..IncidentFeature::default()
        }
    }

    #[test]
    fn blank_status_uses_default_label() {
        assert_eq!(incident(None, None).status_label(), DEFAULT_STATUS_LABEL);
        assert_eq!(incident(None, Some("")).status_label(), DEFAULT_STATUS_LABEL);
        assert_eq!(
            incident(None, Some("   ")).status_label(),
            DEFAULT_STATUS_LABEL
        );
        assert_eq!(incident(None, Some("resolved")).status_label(), "resolved");
    }

    #[test]
    fn missing_district_uses_unknown_label() {
        assert_eq!(incident(None, None).district_label(), UNKNOWN_DISTRICT_LABEL);
        assert_eq!(incident(Some("A"), None).district_label(), "A");
    }

    #[test]
    fn rejects_non_finite_locations() {
        assert!(Location::new(13.7, 100.5).is_some());
        assert!(Location::new(f64::NAN, 100.5).is_none());
        assert!(Location::new(13.7, f64::INFINITY).is_none());
    }

    #[test]
    fn unconstrained_filter_matches_everything() {
        let filter = FilterState::default();
        assert!(filter.is_unconstrained());
        assert!(filter.matches(&incident(None, None)));
        assert!(filter.matches(&incident(Some("A"), Some("resolved"))));
    }

    #[test]
    fn filter_requires_both_constraints() {
        let filter = FilterState {
            status: Some("resolved".to_string()),
            district: Some("A".to_string()),
        };
        assert!(filter.matches(&incident(Some("A"), Some("resolved"))));
        assert!(!filter.matches(&incident(Some("B"), Some("resolved"))));
        assert!(!filter.matches(&incident(Some("A"), Some("in progress"))));
        assert!(!filter.matches(&incident(None, Some("resolved"))));
    }

    #[test]
    fn district_filter_can_select_unknown_bucket() {
        let filter = FilterState {
            status: None,
            district: Some(UNKNOWN_DISTRICT_LABEL.to_string()),
        };
        assert!(filter.matches(&incident(None, None)));
        assert!(filter.matches(&incident(Some(" "), None)));
        assert!(!filter.matches(&incident(Some("A"), None)));
    }

    #[test]
    fn district_filter_compares_raw_value() {
        let filter = FilterState {
            status: None,
            district: Some("Bang Rak".to_string()),
        };
        assert!(!filter.matches(&incident(Some("Bang Rak "), None)));
        assert!(!filter.matches(&incident(Some("bang rak"), None)));
    }

    #[test]
    fn status_filter_can_select_default_bucket() {
        let filter = FilterState {
            status: Some(DEFAULT_STATUS_LABEL.to_string()),
            district: None,
        };
        assert!(filter.matches(&incident(None, None)));
        assert!(filter.matches(&incident(None, Some(""))));
        assert!(!filter.matches(&incident(None, Some("resolved"))));
    }

    #[test]
    fn join_value_follows_key() {
        let mut area = AreaFeature::named("Lumphini");
        assert_eq!(area.join_value(JoinKey::Subdistrict), Some("Lumphini"));
        assert_eq!(area.join_value(JoinKey::District), None);
        area.district = Some("Pathum Wan".to_string());
        assert_eq!(area.join_value(JoinKey::District), Some("Pathum Wan"));

        let unnamed = AreaFeature::named("");
        assert_eq!(unnamed.join_value(JoinKey::Subdistrict), None);
    }

    #[test]
    fn join_key_parses_from_snake_case() {
        assert_eq!("district".parse::<JoinKey>().ok(), Some(JoinKey::District));
        assert_eq!(
            serde_json::to_string(&JoinKey::Subdistrict).unwrap(),
            "\"subdistrict\""
        );
    }

    #[test]
    fn choropleth_grades_are_ascending() {
        let grades: Vec<u64> = ChoroplethBucket::ALL.iter().map(|b| b.grade()).collect();
        assert_eq!(grades, vec![0, 5, 10, 15, 20]);
    }
}
