//! Interactive filter loop.
//!
//! Loads a dataset chosen from the registry, then lets the user narrow
//! the incident set by status and district (the same drop-downs the map
//! sidebar offers), printing fresh insights after every change.

use dialoguer::{Input, Select};
use risk_map_cli_utils::MultiProgress;
use risk_map_dashboard::{DashboardState, Layer, Message};
use risk_map_dataset::registry;

use crate::{DatasetArgs, load_dashboard, report, resolve_source};

/// Label for the "no constraint" entry of a filter menu.
const ANY: &str = "(any)";

/// Actions offered after each render.
enum Action {
    FilterStatus,
    FilterDistrict,
    ClearFilters,
    ListAreas,
    ToggleMarkers,
    Export,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::FilterStatus,
        Self::FilterDistrict,
        Self::ClearFilters,
        Self::ListAreas,
        Self::ToggleMarkers,
        Self::Export,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::FilterStatus => "Filter by status",
            Self::FilterDistrict => "Filter by district",
            Self::ClearFilters => "Clear filters",
            Self::ListAreas => "List subdistricts",
            Self::ToggleMarkers => "Toggle risk point markers",
            Self::Export => "Export render plan (JSON)",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive loop until the user quits.
///
/// # Errors
///
/// Returns an error if the dataset fails to load, a prompt fails, or an
/// export cannot be written.
pub async fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Bangkok Risk Map");
    println!();

    let sources = registry::all_sources();
    let labels: Vec<String> = sources
        .iter()
        .map(|s| format!("{} - {}", s.id(), s.name()))
        .collect();
    let idx = Select::new()
        .with_prompt("Which dataset?")
        .items(&labels)
        .default(0)
        .interact()?;

    let source = resolve_source(&DatasetArgs {
        dataset: Some(sources[idx].id.clone()),
        ..DatasetArgs::default()
    })?;
    let top = source.top_districts();
    let mut state = load_dashboard(multi, &source, None).await?;
    let options = state.filter_options();

    report::print_insights(&state.insights(), top);

    let action_labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();
    loop {
        println!();
        let idx = Select::new()
            .with_prompt("What next?")
            .items(&action_labels)
            .default(0)
            .interact()?;

        let plan = match Action::ALL[idx] {
            Action::FilterStatus => {
                let prompt = format!("Status ({})", source.incidents.fields.status);
                let status = pick(&prompt, &options.statuses)?;
                state.update(Message::SetStatusFilter(status))
            }
            Action::FilterDistrict => {
                let district = pick("District", &options.districts)?;
                state.update(Message::SetDistrictFilter(district))
            }
            Action::ClearFilters => state.update(Message::ClearFilters),
            Action::ListAreas => {
                report::print_areas(state.areas(), Some(20));
                continue;
            }
            Action::ToggleMarkers => {
                let plan = state.update(Message::ToggleLayer(Layer::Incidents));
                println!("{} markers visible", plan.markers.len());
                continue;
            }
            Action::Export => {
                export(&state)?;
                continue;
            }
            Action::Quit => break,
        };

        report::print_insights(&plan.insights, top);
    }

    Ok(())
}

/// Prompts for one of `values`, or `None` for no constraint.
fn pick(prompt: &str, values: &[String]) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let mut items: Vec<&str> = vec![ANY];
    items.extend(values.iter().map(String::as_str));

    let idx = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .max_length(20)
        .interact()?;

    Ok(if idx == 0 {
        None
    } else {
        Some(values[idx - 1].clone())
    })
}

fn export(state: &DashboardState) -> Result<(), Box<dyn std::error::Error>> {
    let path: String = Input::new()
        .with_prompt("Output file")
        .default("bangkok-risk-points.json".to_string())
        .interact_text()?;

    report::export_plan(&state.render(), std::path::Path::new(&path))?;
    println!("Exported to {path}");
    Ok(())
}
