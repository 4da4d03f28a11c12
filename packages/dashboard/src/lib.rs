#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation-agnostic dashboard state for the risk map.
//!
//! [`DashboardState`] owns the loaded dataset, the current filter, and the
//! layer/sidebar visibility. UI events arrive as [`Message`]s; each
//! [`DashboardState::update`] applies the message and returns a fresh
//! [`RenderPlan`] computed from the full incident collection. There are no
//! layer handles or callbacks here, so any front end (terminal, web, or
//! tests) drives the same pipeline.

pub mod bounds;
pub mod render;

use risk_map_aggregate::{distinct_values, filter, join, summarize, top_n};
use risk_map_dataset::Dataset;
use risk_map_risk_models::{
    AreaFeature, FilterState, GroupKey, IncidentFeature, JoinKey,
};

use crate::bounds::{Bounds, area_bounds};
use crate::render::{AreaStyle, Insights, Marker, RenderPlan, legend_rows};

/// A toggleable map layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Subdistrict polygons.
    Areas,
    /// Incident markers.
    Incidents,
}

/// A UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Constrain (or, with `None`, release) the status filter.
    SetStatusFilter(Option<String>),
    /// Constrain (or, with `None`, release) the district filter.
    SetDistrictFilter(Option<String>),
    /// Release both filters.
    ClearFilters,
    /// Show or hide a layer.
    SetLayerVisible(Layer, bool),
    /// Flip a layer's visibility.
    ToggleLayer(Layer),
    /// Flip the sidebar's visibility.
    ToggleSidebar,
}

/// Values available in the filter drop-downs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Distinct status labels, first-seen order.
    pub statuses: Vec<String>,
    /// Distinct district labels, first-seen order. Includes the unknown
    /// label when any incident lacks a district.
    pub districts: Vec<String>,
}

/// The dashboard's full application state.
#[derive(Debug, Clone)]
pub struct DashboardState {
    areas: Vec<AreaFeature>,
    incidents: Vec<IncidentFeature>,
    filter: FilterState,
    areas_visible: bool,
    incidents_visible: bool,
    sidebar_visible: bool,
    top_districts: usize,
    bounds: Option<Bounds>,
}

impl DashboardState {
    /// Joins the dataset's incidents onto its areas and starts with no
    /// filter and every layer visible.
    #[must_use]
    pub fn new(dataset: Dataset, join_key: JoinKey, top_districts: usize) -> Self {
        let Dataset {
            mut areas,
            incidents,
        } = dataset;
        join(&mut areas, &incidents, join_key);
        let bounds = area_bounds(&areas);

        log::info!(
            "Dashboard ready: {} areas, {} incidents",
            areas.len(),
            incidents.len()
        );

        Self {
            areas,
            incidents,
            filter: FilterState::default(),
            areas_visible: true,
            incidents_visible: true,
            sidebar_visible: true,
            top_districts,
            bounds,
        }
    }

    /// Areas with their joined incident counts.
    #[must_use]
    pub fn areas(&self) -> &[AreaFeature] {
        &self.areas
    }

    /// Every loaded incident.
    #[must_use]
    pub fn incidents(&self) -> &[IncidentFeature] {
        &self.incidents
    }

    /// The current filter.
    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Distinct statuses and districts across all incidents.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            statuses: distinct_values(&self.incidents, GroupKey::Status),
            districts: distinct_values(&self.incidents, GroupKey::District),
        }
    }

    /// Applies `message` and returns the resulting render plan.
    pub fn update(&mut self, message: Message) -> RenderPlan {
        log::debug!("Dashboard message: {message:?}");
        match message {
            Message::SetStatusFilter(status) => self.filter.status = status,
            Message::SetDistrictFilter(district) => self.filter.district = district,
            Message::ClearFilters => self.filter = FilterState::default(),
            Message::SetLayerVisible(layer, visible) => *self.layer_mut(layer) = visible,
            Message::ToggleLayer(layer) => {
                let visible = self.layer_mut(layer);
                *visible = !*visible;
            }
            Message::ToggleSidebar => self.sidebar_visible = !self.sidebar_visible,
        }
        self.render()
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut bool {
        match layer {
            Layer::Areas => &mut self.areas_visible,
            Layer::Incidents => &mut self.incidents_visible,
        }
    }

    /// Incidents matching the current filter.
    #[must_use]
    pub fn active_incidents(&self) -> Vec<IncidentFeature> {
        filter(&self.incidents, &self.filter)
    }

    /// Sidebar statistics over the active subset.
    #[must_use]
    pub fn insights(&self) -> Insights {
        insights_for(&self.active_incidents(), &self.filter, self.top_districts)
    }

    /// Builds the render plan for the current state.
    #[must_use]
    pub fn render(&self) -> RenderPlan {
        let active = self.active_incidents();

        let areas = if self.areas_visible {
            self.areas.iter().map(AreaStyle::from).collect()
        } else {
            Vec::new()
        };

        let markers = if self.incidents_visible {
            active.iter().filter_map(Marker::from_incident).collect()
        } else {
            Vec::new()
        };

        RenderPlan {
            areas,
            markers,
            legend: legend_rows(),
            insights: insights_for(&active, &self.filter, self.top_districts),
            sidebar_visible: self.sidebar_visible,
            bounds: self.bounds,
        }
    }
}

fn insights_for(active: &[IncidentFeature], filter: &FilterState, top: usize) -> Insights {
    let summary = summarize(active, &[GroupKey::Status, GroupKey::District]);
    let status_breakdown = summary
        .group(GroupKey::Status)
        .map(|g| g.categories.clone())
        .unwrap_or_default();
    let top_districts = summary
        .group(GroupKey::District)
        .map(|g| top_n(g, top))
        .unwrap_or_default();

    Insights {
        filter: filter.clone(),
        total: summary.total,
        status_breakdown,
        top_districts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_map_dataset::decode;
    use risk_map_dataset_models::{AreaFieldMapping, IncidentFieldMapping};
    use risk_map_risk_models::{ChoroplethBucket, Location, StatusBucket, UNKNOWN_DISTRICT_LABEL};

    fn incident(district: &str, status: Option<&str>, placed: bool) -> IncidentFeature {
        IncidentFeature {
            location: if placed {
                Location::new(13.7, 100.5)
            } else {
                None
            },
            district: Some(district.to_string()),
            status: status.map(str::to_string),
            ..IncidentFeature::default()
        }
    }

    fn state() -> DashboardState {
        let dataset = Dataset {
            areas: vec![AreaFeature::named("A"), AreaFeature::named("B")],
            incidents: vec![
                incident("A", Some("resolved"), true),
                incident("A", Some("in progress"), true),
                incident("B", Some("resolved"), false),
                incident("C", None, true),
            ],
        };
        DashboardState::new(dataset, JoinKey::Subdistrict, 2)
    }

    #[test]
    fn new_state_joins_counts() {
        let state = state();
        let counts: Vec<u64> = state.areas().iter().map(|a| a.incident_count).collect();
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn initial_render_shows_everything() {
        let plan = state().render();

        assert_eq!(plan.areas.len(), 2);
        assert_eq!(plan.areas[0].bucket, ChoroplethBucket::Minimal);
        // The unplaced incident is counted but not drawn.
        assert_eq!(plan.markers.len(), 3);
        assert_eq!(plan.insights.total, 4);
        assert_eq!(plan.legend.len(), 5);
        assert!(plan.sidebar_visible);
        assert!(plan.bounds.is_none());
    }

    #[test]
    fn status_filter_narrows_markers_and_insights() {
        let mut state = state();
        let plan = state.update(Message::SetStatusFilter(Some("resolved".to_string())));

        assert_eq!(plan.insights.total, 2);
        assert_eq!(plan.markers.len(), 1);
        assert_eq!(plan.markers[0].bucket, StatusBucket::Resolved);
        // Area counts always reflect the full set.
        assert_eq!(plan.areas[0].incident_count, 2);
    }

    #[test]
    fn clearing_filters_restores_full_set() {
        let mut state = state();
        let full = state.render();

        state.update(Message::SetDistrictFilter(Some("A".to_string())));
        let narrowed = state.update(Message::SetStatusFilter(Some("in progress".to_string())));
        assert_eq!(narrowed.insights.total, 1);

        let restored = state.update(Message::ClearFilters);
        assert_eq!(restored, full);
    }

    #[test]
    fn hidden_layers_render_nothing() {
        let mut state = state();
        let plan = state.update(Message::ToggleLayer(Layer::Areas));
        assert!(plan.areas.is_empty());
        assert_eq!(plan.markers.len(), 3);

        let plan = state.update(Message::SetLayerVisible(Layer::Incidents, false));
        assert!(plan.markers.is_empty());
        // Insights do not depend on layer visibility.
        assert_eq!(plan.insights.total, 4);

        let plan = state.update(Message::ToggleLayer(Layer::Areas));
        assert_eq!(plan.areas.len(), 2);
    }

    #[test]
    fn toggles_sidebar() {
        let mut state = state();
        assert!(!state.update(Message::ToggleSidebar).sidebar_visible);
        assert!(state.update(Message::ToggleSidebar).sidebar_visible);
    }

    #[test]
    fn insights_list_top_districts() {
        let insights = state().insights();
        let top: Vec<&str> = insights
            .top_districts
            .iter()
            .map(|c| c.value.as_str())
            .collect();
        assert_eq!(top, vec!["A", "B"]);
        assert!((insights.top_districts[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn filter_options_are_first_seen() {
        let options = state().filter_options();
        assert_eq!(options.districts, vec!["A", "B", "C"]);
        assert_eq!(
            options.statuses,
            vec!["resolved", "in progress", risk_map_risk_models::DEFAULT_STATUS_LABEL]
        );
    }

    #[test]
    fn unknown_district_is_a_filter_option() {
        let dataset = Dataset {
            areas: vec![AreaFeature::named("A")],
            incidents: vec![
                incident("A", Some("resolved"), true),
                IncidentFeature::default(),
            ],
        };
        let mut state = DashboardState::new(dataset, JoinKey::Subdistrict, 5);

        let options = state.filter_options();
        assert_eq!(options.districts, vec!["A", UNKNOWN_DISTRICT_LABEL]);

        let plan = state.update(Message::SetDistrictFilter(Some(
            UNKNOWN_DISTRICT_LABEL.to_string(),
        )));
        assert_eq!(plan.insights.total, 1);
        assert_eq!(plan.insights.top_districts[0].value, UNKNOWN_DISTRICT_LABEL);
    }

    #[test]
    fn decoded_keys_join_exactly() {
        let areas_body = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "subdistrict_t": "Bang Rak" }, "geometry": null },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        }"#;
        let incidents_body = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "district": "Bang Rak ", "status_detail": "resolved" },
                    "geometry": { "type": "Point", "coordinates": [100.52, 13.72] }
                },
                {
                    "type": "Feature",
                    "properties": { "district": "Bang Rak", "status_detail": "resolved" },
                    "geometry": null
                }
            ]
        }"#;
        let area_fields = AreaFieldMapping {
            name: "subdistrict_t".to_string(),
            district: None,
            province: None,
            area: None,
        };
        let incident_fields = IncidentFieldMapping {
            district: "district".to_string(),
            status: "status_detail".to_string(),
            problem: None,
            road_name: None,
            project: None,
        };

        let areas = decode::decode_areas(
            &decode::feature_collection("areas", areas_body).unwrap(),
            &area_fields,
        );
        let incidents = decode::decode_incidents(
            &decode::feature_collection("incidents", incidents_body).unwrap(),
            &incident_fields,
        );
        let state = DashboardState::new(Dataset { areas, incidents }, JoinKey::Subdistrict, 5);

        assert_eq!(state.areas().len(), 2);
        assert_eq!(state.areas()[0].name, "Bang Rak");
        assert_eq!(state.areas()[0].incident_count, 1);
        assert_eq!(state.areas()[1].incident_count, 0);

        let districts = state.filter_options().districts;
        assert_eq!(districts, vec!["Bang Rak ", "Bang Rak"]);
    }

    #[test]
    fn popup_defaults_missing_fields() {
        let plan = state().render();
        let popup = &plan.markers[0].popup;
        assert_eq!(popup.title, render::NOT_AVAILABLE);
        assert_eq!(popup.district, "A");
        assert_eq!(popup.status, "resolved");
    }

    #[test]
    fn render_plan_serializes_to_json() {
        let json = serde_json::to_value(state().render()).unwrap();
        assert_eq!(json["insights"]["total"], 4);
        assert_eq!(json["areas"][0]["fillColor"], "#91cf60");
    }
}
