#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the risk map toolchain.
//!
//! Loads a dataset definition, runs the join/filter/summary pipeline, and
//! prints or exports the dashboard's insights. Without a subcommand it
//! starts an interactive filter loop.

mod interactive;
mod report;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use risk_map_cli_utils::{IndicatifProgress, MultiProgress};
use risk_map_dashboard::{DashboardState, Message};
use risk_map_dataset::registry::{self, DEFAULT_DATASET_ID};
use risk_map_dataset_models::DatasetSource;
use risk_map_risk_models::{FilterState, JoinKey};

/// Environment variable selecting the default dataset id.
const DATASET_ENV: &str = "RISK_MAP_DATASET";

/// Per-request timeout for remote layers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Parser)]
#[command(name = "risk_map", about = "Bangkok risk point map data toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered dataset definitions
    Sources,
    /// Print total, status breakdown, and top districts
    Summary {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Number of top districts to list (overrides the dataset default)
        #[arg(long)]
        top: Option<usize>,
        /// Print the insights as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List areas with their incident counts, busiest first
    Areas {
        #[command(flatten)]
        dataset: DatasetArgs,
        /// Maximum number of areas to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write the full render plan (areas, markers, legend, insights) as JSON
    Export {
        #[command(flatten)]
        dataset: DatasetArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file path
        #[arg(long, short)]
        output: PathBuf,
    },
}

/// Selects a dataset and optionally overrides its layer locations.
#[derive(Args, Clone, Default)]
struct DatasetArgs {
    /// Dataset id (defaults to `RISK_MAP_DATASET`, then `bangkok_subdistricts`)
    #[arg(long)]
    dataset: Option<String>,
    /// Area layer URL or path, replacing the dataset's
    #[arg(long)]
    areas: Option<String>,
    /// Incident layer URL or path, replacing the dataset's
    #[arg(long)]
    incidents: Option<String>,
    /// Join key (`subdistrict` or `district`), replacing the dataset's
    #[arg(long)]
    join: Option<JoinKey>,
}

/// Status/district constraints on the active incident subset.
#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Only incidents with this status label
    #[arg(long)]
    status: Option<String>,
    /// Only incidents in this district
    #[arg(long)]
    district: Option<String>,
}

impl From<FilterArgs> for FilterState {
    fn from(args: FilterArgs) -> Self {
        Self {
            status: args.status,
            district: args.district,
        }
    }
}

/// Resolves the requested dataset definition and applies overrides.
fn resolve_source(args: &DatasetArgs) -> Result<DatasetSource, Box<dyn std::error::Error>> {
    let id = args
        .dataset
        .clone()
        .or_else(|| std::env::var(DATASET_ENV).ok())
        .unwrap_or_else(|| DEFAULT_DATASET_ID.to_string());

    let mut source = registry::find_source(&id).ok_or_else(|| format!("Unknown dataset: {id}"))?;

    if let Some(areas) = &args.areas {
        source.areas.location.clone_from(areas);
    }
    if let Some(incidents) = &args.incidents {
        source.incidents.location.clone_from(incidents);
    }
    if let Some(join) = args.join {
        source.join = join;
    }

    Ok(source)
}

/// Loads both layers and builds the dashboard state.
///
/// # Errors
///
/// Returns an error if either layer fails to load; nothing is rendered in
/// that case.
async fn load_dashboard(
    multi: &MultiProgress,
    source: &DatasetSource,
    top: Option<usize>,
) -> Result<DashboardState, Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let progress = IndicatifProgress::load_bar(multi, &format!("Loading {}", source.name()));

    let dataset = match risk_map_dataset::load(&client, source, progress).await {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Failed to load dataset {}: {e}", source.id());
            return Err(e.into());
        }
    };

    Ok(DashboardState::new(
        dataset,
        source.join,
        top.unwrap_or_else(|| source.top_districts()),
    ))
}

/// Applies both filter constraints to `state`.
fn apply_filter(state: &mut DashboardState, filter: FilterState) {
    state.update(Message::SetStatusFilter(filter.status));
    state.update(Message::SetDistrictFilter(filter.district));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = risk_map_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive::run(&multi).await;
    };

    match command {
        Commands::Sources => report::print_sources(&registry::all_sources()),
        Commands::Summary {
            dataset,
            filter,
            top,
            json,
        } => {
            let source = resolve_source(&dataset)?;
            let top = top.unwrap_or_else(|| source.top_districts());
            let mut state = load_dashboard(&multi, &source, Some(top)).await?;
            apply_filter(&mut state, filter.into());

            let insights = state.insights();
            if json {
                println!("{}", serde_json::to_string_pretty(&insights)?);
            } else {
                report::print_insights(&insights, top);
            }
        }
        Commands::Areas { dataset, limit } => {
            let source = resolve_source(&dataset)?;
            let state = load_dashboard(&multi, &source, None).await?;
            report::print_areas(state.areas(), limit);
        }
        Commands::Export {
            dataset,
            filter,
            output,
        } => {
            let source = resolve_source(&dataset)?;
            let mut state = load_dashboard(&multi, &source, None).await?;
            apply_filter(&mut state, filter.into());
            report::export_plan(&state.render(), &output)?;
            log::info!("Exported render plan to {}", output.display());
        }
    }

    Ok(())
}
