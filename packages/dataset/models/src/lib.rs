#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset definition types.
//!
//! Defines the TOML schema describing where the area and incident
//! `GeoJSON` layers live, which properties hold each field, and how the
//! two layers are joined.

use risk_map_risk_models::JoinKey;
use serde::{Deserialize, Serialize};

/// Number of districts shown in the "top districts" insight when a
/// definition does not override it.
pub const DEFAULT_TOP_DISTRICTS: usize = 5;

/// A risk map dataset, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSource {
    /// Unique dataset identifier (e.g., `"bangkok_subdistricts"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Where the area polygons are loaded from.
    pub areas: LayerSource<AreaFieldMapping>,
    /// Where the incident points are loaded from.
    pub incidents: LayerSource<IncidentFieldMapping>,
    /// Which area property incident districts are matched against.
    #[serde(default)]
    pub join: JoinKey,
    /// How many districts the top-districts insight lists.
    pub top_districts: Option<usize>,
}

impl DatasetSource {
    /// Returns the dataset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the configured top-districts size.
    #[must_use]
    pub fn top_districts(&self) -> usize {
        self.top_districts.unwrap_or(DEFAULT_TOP_DISTRICTS)
    }
}

/// Location and field mapping for one `GeoJSON` layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSource<F> {
    /// HTTP(S) URL or local file path of a `GeoJSON` `FeatureCollection`.
    pub location: String,
    /// Property names to read fields from.
    pub fields: F,
}

/// Property names on area features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaFieldMapping {
    /// Subdistrict name property.
    pub name: String,
    /// District name property.
    pub district: Option<String>,
    /// Province name property.
    pub province: Option<String>,
    /// Area (square kilometers) property.
    pub area: Option<String>,
}

/// Property names on incident features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentFieldMapping {
    /// District key property.
    pub district: String,
    /// Status label property.
    pub status: String,
    /// Problem description property.
    pub problem: Option<String>,
    /// Road name property.
    pub road_name: Option<String>,
    /// Project name property.
    pub project: Option<String>,
}
