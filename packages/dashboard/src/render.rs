//! Render instructions produced by the dashboard.
//!
//! A [`RenderPlan`] is everything a presentation layer needs to draw the
//! dashboard: it never has to look at features or filters itself.

use risk_map_aggregate::{choropleth_bucket, classify_status, legend};
use risk_map_risk_models::{
    AreaFeature, CategoryBreakdown, ChoroplethBucket, FilterState, IncidentFeature, StatusBucket,
};
use serde::Serialize;

use crate::bounds::Bounds;

/// Placeholder for missing popup fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// The complete draw instruction set for one dashboard state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    /// Area polygons to fill. Empty when the area layer is hidden.
    pub areas: Vec<AreaStyle>,
    /// Incident markers to place. Empty when the incident layer is hidden.
    pub markers: Vec<Marker>,
    /// Choropleth legend rows.
    pub legend: Vec<LegendRow>,
    /// Sidebar statistics over the active incident subset.
    pub insights: Insights,
    /// Whether the sidebar is shown.
    pub sidebar_visible: bool,
    /// Extent of the area layer, for fitting the map view.
    pub bounds: Option<Bounds>,
}

/// Fill instructions for one area.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaStyle {
    /// Subdistrict name.
    pub name: String,
    /// District name.
    pub district: Option<String>,
    /// Province name.
    pub province: Option<String>,
    /// Area in square kilometers.
    pub area_sq_km: Option<f64>,
    /// Joined incident count.
    pub incident_count: u64,
    /// Fill class.
    pub bucket: ChoroplethBucket,
    /// Fill color.
    pub fill_color: &'static str,
}

impl From<&AreaFeature> for AreaStyle {
    fn from(area: &AreaFeature) -> Self {
        let bucket = choropleth_bucket(area.incident_count);
        Self {
            name: area.name.clone(),
            district: area.district.clone(),
            province: area.province.clone(),
            area_sq_km: area.area_sq_km,
            incident_count: area.incident_count,
            bucket,
            fill_color: bucket.color(),
        }
    }
}

/// One incident marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Status class.
    pub bucket: StatusBucket,
    /// Marker fill color.
    pub color: &'static str,
    /// Popup text.
    pub popup: Popup,
}

impl Marker {
    /// Builds a marker, or `None` if the incident has no usable location.
    #[must_use]
    pub fn from_incident(incident: &IncidentFeature) -> Option<Self> {
        let location = incident.location?;
        let bucket = classify_status(incident.status.as_deref());
        Some(Self {
            latitude: location.latitude,
            longitude: location.longitude,
            bucket,
            color: bucket.color(),
            popup: Popup::from(incident),
        })
    }
}

/// Popup text fields for an incident marker. Missing values read `"N/A"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    /// Road name.
    pub title: String,
    /// Problem description.
    pub problem: String,
    /// District key.
    pub district: String,
    /// Raw status label.
    pub status: String,
    /// Project name.
    pub project: String,
}

impl From<&IncidentFeature> for Popup {
    fn from(incident: &IncidentFeature) -> Self {
        let text = |value: Option<&str>| value.unwrap_or(NOT_AVAILABLE).to_string();
        Self {
            title: text(incident.road_name.as_deref()),
            problem: text(incident.problem.as_deref()),
            district: text(incident.district.as_deref()),
            status: text(incident.status.as_deref()),
            project: text(incident.project.as_deref()),
        }
    }
}

/// One row of the legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendRow {
    /// Grade range label.
    pub label: String,
    /// Fill color.
    pub color: &'static str,
}

/// Returns the choropleth legend rows.
#[must_use]
pub fn legend_rows() -> Vec<LegendRow> {
    legend()
        .into_iter()
        .map(|entry| LegendRow {
            label: entry.label,
            color: entry.color,
        })
        .collect()
}

/// Sidebar statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// Filter the statistics were computed under.
    pub filter: FilterState,
    /// Number of incidents in the active subset.
    pub total: u64,
    /// Per-status counts, first-seen order. Also the chart data.
    pub status_breakdown: Vec<CategoryBreakdown>,
    /// Districts with the most incidents.
    pub top_districts: Vec<CategoryBreakdown>,
}
