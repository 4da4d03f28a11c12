//! Decodes `GeoJSON` feature collections into typed features.
//!
//! Only the document shape is strict: the body must be a JSON object with
//! `"type": "FeatureCollection"` and a `features` array. Individual
//! features are decoded leniently through the dataset's field mapping, with
//! missing or oddly-typed properties left as `None`. String values are kept
//! exactly as they appear in the source, since they are join keys.

use risk_map_dataset_models::{AreaFieldMapping, IncidentFieldMapping};
use risk_map_risk_models::{AreaFeature, IncidentFeature, Location};
use serde_json::Value;

use crate::LoadError;

/// Parses `body` and returns its raw `features` array.
///
/// # Errors
///
/// Returns [`LoadError::DataMalformed`] if the body is not JSON or is not
/// a `FeatureCollection`.
pub fn feature_collection(location: &str, body: &str) -> Result<Vec<Value>, LoadError> {
    let malformed = |message: String| LoadError::DataMalformed {
        location: location.to_string(),
        message,
    };

    let mut json: Value = serde_json::from_str(body)
        .map_err(|e| malformed(format!("Failed to parse GeoJSON response: {e}")))?;

    match json.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {}
        Some(other) => {
            return Err(malformed(format!(
                "Expected a FeatureCollection, found {other}"
            )));
        }
        None => return Err(malformed("Missing GeoJSON type".to_string())),
    }

    match json.get_mut("features").map(Value::take) {
        Some(Value::Array(features)) => Ok(features),
        _ => Err(malformed(
            "No features array in GeoJSON response".to_string(),
        )),
    }
}

/// Decodes area features. Never drops a feature; an area without a name
/// keeps its polygon but matches no incident.
#[must_use]
pub fn decode_areas(features: &[Value], fields: &AreaFieldMapping) -> Vec<AreaFeature> {
    features
        .iter()
        .map(|feature| decode_area(feature, fields))
        .collect()
}

fn decode_area(feature: &Value, fields: &AreaFieldMapping) -> AreaFeature {
    let props = feature.get("properties");

    AreaFeature {
        name: property_string(props, Some(&fields.name)).unwrap_or_default(),
        district: property_string(props, fields.district.as_ref()),
        province: property_string(props, fields.province.as_ref()),
        area_sq_km: property_f64(props, fields.area.as_ref()),
        geometry_json: feature.get("geometry").and_then(geometry_json),
        incident_count: 0,
    }
}

/// Decodes incident features. Never drops a feature.
#[must_use]
pub fn decode_incidents(features: &[Value], fields: &IncidentFieldMapping) -> Vec<IncidentFeature> {
    features
        .iter()
        .map(|feature| decode_incident(feature, fields))
        .collect()
}

fn decode_incident(feature: &Value, fields: &IncidentFieldMapping) -> IncidentFeature {
    let props = feature.get("properties");

    IncidentFeature {
        location: feature.get("geometry").and_then(point_location),
        road_name: property_string(props, fields.road_name.as_ref()),
        problem: property_string(props, fields.problem.as_ref()),
        district: property_string(props, Some(&fields.district)),
        status: property_string(props, Some(&fields.status)),
        project: property_string(props, fields.project.as_ref()),
    }
}

/// Reads a property as a non-empty string, unmodified. Numbers are
/// rendered with their JSON representation.
fn property_string(props: Option<&Value>, field: Option<&String>) -> Option<String> {
    match props?.get(field?)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a property as a number, accepting numeric strings.
fn property_f64(props: Option<&Value>, field: Option<&String>) -> Option<f64> {
    match props?.get(field?)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Validates a geometry and re-serializes it for storage.
fn geometry_json(geometry: &Value) -> Option<String> {
    if geometry.is_null() {
        return None;
    }
    geojson::Geometry::from_json_value(geometry.clone()).ok()?;
    serde_json::to_string(geometry).ok()
}

/// Extracts a finite location from a `Point` geometry.
fn point_location(geometry: &Value) -> Option<Location> {
    if geometry.is_null() {
        return None;
    }
    let geometry = geojson::Geometry::from_json_value(geometry.clone()).ok()?;
    match geometry.value {
        geojson::Value::Point(coords) => {
            let longitude = *coords.first()?;
            let latitude = *coords.get(1)?;
            Location::new(latitude, longitude)
        }
        _ => None,
    }
}
