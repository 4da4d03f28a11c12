//! Map bounds of the area layer.

use geo::BoundingRect;
use geojson::GeoJson;
use risk_map_risk_models::AreaFeature;
use serde::Serialize;

/// Latitude/longitude bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    /// Southern edge.
    pub min_latitude: f64,
    /// Western edge.
    pub min_longitude: f64,
    /// Northern edge.
    pub max_latitude: f64,
    /// Eastern edge.
    pub max_longitude: f64,
}

impl Bounds {
    fn from_rect(rect: geo::Rect<f64>) -> Self {
        Self {
            min_latitude: rect.min().y,
            min_longitude: rect.min().x,
            max_latitude: rect.max().y,
            max_longitude: rect.max().x,
        }
    }

    fn union(self, other: Self) -> Self {
        Self {
            min_latitude: self.min_latitude.min(other.min_latitude),
            min_longitude: self.min_longitude.min(other.min_longitude),
            max_latitude: self.max_latitude.max(other.max_latitude),
            max_longitude: self.max_longitude.max(other.max_longitude),
        }
    }
}

/// Returns the combined bounds of every area geometry.
///
/// Areas without a parseable geometry are ignored. Returns `None` when no
/// area has one.
#[must_use]
pub fn area_bounds(areas: &[AreaFeature]) -> Option<Bounds> {
    areas
        .iter()
        .filter_map(|area| area.geometry_json.as_deref())
        .filter_map(geometry_rect)
        .map(Bounds::from_rect)
        .reduce(Bounds::union)
}

/// Parses a `GeoJSON` geometry string and returns its bounding rectangle.
fn geometry_rect(geojson_str: &str) -> Option<geo::Rect<f64>> {
    let geojson: GeoJson = geojson_str.parse().ok()?;
    if let GeoJson::Geometry(geom) = geojson {
        let geo_geom: geo::Geometry<f64> = geom.try_into().ok()?;
        geo_geom.bounding_rect()
    } else {
        None
    }
}
