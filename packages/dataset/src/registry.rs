//! Compile-time registry of dataset definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a dataset requires creating a TOML file in `sources/` and adding
//! a corresponding entry here.

use risk_map_dataset_models::DatasetSource;

/// Number of registered datasets. Enforced by a test.
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 2;

/// Dataset used when none is requested.
pub const DEFAULT_DATASET_ID: &str = "bangkok_subdistricts";

/// Embedded TOML dataset definitions.
const SOURCE_TOMLS: &[(&str, &str)] = &[
    (
        "bangkok_subdistricts",
        include_str!("../sources/bangkok_subdistricts.toml"),
    ),
    (
        "bangkok_districts",
        include_str!("../sources/bangkok_districts.toml"),
    ),
];

/// Returns all registered datasets.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_sources() -> Vec<DatasetSource> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse dataset source '{name}': {e}"))
        })
        .collect()
}

/// Returns the dataset with the given id.
#[must_use]
pub fn find_source(id: &str) -> Option<DatasetSource> {
    all_sources().into_iter().find(|source| source.id == id)
}
