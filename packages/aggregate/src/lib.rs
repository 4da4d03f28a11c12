#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Join, grouping, filtering, and classification over risk map features.
//!
//! Every function here is a synchronous, total transformation of
//! already-decoded features. Nothing can fail: missing statuses and
//! districts are grouped under their default labels, and an empty input
//! produces an empty (zero-total) summary with zero percentages.
//!
//! The usual flow on every filter change is [`filter`] over the full
//! incident collection, then [`summarize`] and [`top_n`] over the result.
//! [`join`] runs once per incident set to refresh area counts.

pub mod classify;
pub mod filter;
pub mod join;
pub mod summary;

pub use classify::{choropleth_bucket, classify_status, legend};
pub use filter::filter;
pub use join::join;
pub use summary::{distinct_values, percentage, summarize, top_n};
