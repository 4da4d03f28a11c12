#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Risk map dataset fetching, decoding, and registry.
//!
//! Loads the area polygon layer and the incident point layer described by
//! a [`DatasetSource`], concurrently, and decodes both into typed records.
//! A failure on either side fails the whole load: callers never see one
//! layer without the other.

pub mod decode;
pub mod fetch;
pub mod progress;
pub mod registry;
pub mod retry;

use std::sync::Arc;

use risk_map_dataset_models::{
    AreaFieldMapping, DatasetSource, IncidentFieldMapping, LayerSource,
};
use risk_map_risk_models::{AreaFeature, IncidentFeature};
use thiserror::Error;

use crate::progress::ProgressCallback;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The layer could not be read (transport failure, missing file, or a
    /// non-success HTTP status).
    #[error("Data unavailable from {location}: {message}")]
    DataUnavailable {
        /// URL or path that was being read.
        location: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The layer was read but is not a `GeoJSON` `FeatureCollection`.
    #[error("Malformed data from {location}: {message}")]
    DataMalformed {
        /// URL or path that was being read.
        location: String,
        /// Description of what went wrong.
        message: String,
    },
}

/// Both layers of a loaded dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Area polygons. Incident counts are zero until joined.
    pub areas: Vec<AreaFeature>,
    /// Every incident in the source, in source order.
    pub incidents: Vec<IncidentFeature>,
}

/// Loads both layers of `source` concurrently.
///
/// # Errors
///
/// Returns the first [`LoadError`] raised by either layer.
pub async fn load(
    client: &reqwest::Client,
    source: &DatasetSource,
    progress: Arc<dyn ProgressCallback>,
) -> Result<Dataset, LoadError> {
    log::info!("Loading dataset {} ({})", source.id(), source.name());
    progress.set_total(2);

    let (areas, incidents) = tokio::try_join!(
        load_areas(client, &source.areas, progress.as_ref()),
        load_incidents(client, &source.incidents, progress.as_ref()),
    )?;

    progress.finish(format!(
        "Loaded {} areas and {} incidents",
        areas.len(),
        incidents.len()
    ));

    Ok(Dataset { areas, incidents })
}

async fn load_areas(
    client: &reqwest::Client,
    layer: &LayerSource<AreaFieldMapping>,
    progress: &dyn ProgressCallback,
) -> Result<Vec<AreaFeature>, LoadError> {
    progress.set_message(format!("Reading {}", layer.location));
    let body = fetch::fetch_text(client, &layer.location).await?;
    let features = decode::feature_collection(&layer.location, &body)?;
    let areas = decode::decode_areas(&features, &layer.fields);

    let unnamed = areas.iter().filter(|a| a.name.is_empty()).count();
    if unnamed > 0 {
        log::warn!(
            "{unnamed} area features in {} have no '{}' property",
            layer.location,
            layer.fields.name
        );
    }
    log::debug!("Decoded {} areas from {}", areas.len(), layer.location);
    progress.inc(1);

    Ok(areas)
}

async fn load_incidents(
    client: &reqwest::Client,
    layer: &LayerSource<IncidentFieldMapping>,
    progress: &dyn ProgressCallback,
) -> Result<Vec<IncidentFeature>, LoadError> {
    progress.set_message(format!("Reading {}", layer.location));
    let body = fetch::fetch_text(client, &layer.location).await?;
    let features = decode::feature_collection(&layer.location, &body)?;
    let incidents = decode::decode_incidents(&features, &layer.fields);

    let unplaced = incidents.iter().filter(|i| i.location.is_none()).count();
    if unplaced > 0 {
        log::warn!(
            "{unplaced} of {} incidents in {} have no usable point location",
            incidents.len(),
            layer.location
        );
    }
    log::debug!(
        "Decoded {} incidents from {}",
        incidents.len(),
        layer.location
    );
    progress.inc(1);

    Ok(incidents)
}
