//! Text and JSON output for the CLI.

use std::path::Path;

use risk_map_aggregate::choropleth_bucket;
use risk_map_dashboard::render::{Insights, RenderPlan};
use risk_map_dataset_models::DatasetSource;
use risk_map_risk_models::{AreaFeature, CategoryBreakdown};

/// Prints the registered datasets as a table.
pub fn print_sources(sources: &[DatasetSource]) {
    println!("{:<24} {:<12} NAME", "ID", "JOIN");
    println!("{}", "-".repeat(70));
    for source in sources {
        println!("{:<24} {:<12} {}", source.id(), source.join, source.name());
    }
}

/// Prints the sidebar insights.
pub fn print_insights(insights: &Insights, top: usize) {
    if let Some(status) = &insights.filter.status {
        println!("Status filter: {status}");
    }
    if let Some(district) = &insights.filter.district {
        println!("District filter: {district}");
    }
    println!("Total Risk Points: {}", insights.total);
    println!();
    print_breakdown("Status Breakdown", &insights.status_breakdown);
    println!();
    print_breakdown(&format!("Top {top} Districts"), &insights.top_districts);
}

fn print_breakdown(title: &str, categories: &[CategoryBreakdown]) {
    println!("{title}:");
    if categories.is_empty() {
        println!("  (none)");
    }
    for category in categories {
        println!(
            "  {}: {} ({:.2}%)",
            category.value, category.count, category.percentage
        );
    }
}

/// Prints areas by descending incident count.
pub fn print_areas(areas: &[AreaFeature], limit: Option<usize>) {
    let mut sorted: Vec<&AreaFeature> = areas.iter().collect();
    sorted.sort_by(|a, b| b.incident_count.cmp(&a.incident_count));

    println!("{:<32} {:<24} {:>6}  BUCKET", "SUBDISTRICT", "DISTRICT", "POINTS");
    println!("{}", "-".repeat(80));
    for area in sorted.into_iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{:<32} {:<24} {:>6}  {}",
            area.name,
            area.district.as_deref().unwrap_or("-"),
            area.incident_count,
            choropleth_bucket(area.incident_count),
        );
    }
}

/// Writes the render plan as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn export_plan(plan: &RenderPlan, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(plan)?;
    std::fs::write(path, json)?;
    Ok(())
}
