//! Active-subset filtering.

use risk_map_risk_models::{FilterState, IncidentFeature};

/// Returns the incidents matching `state`, in input order.
///
/// The input is never modified. Callers pass the full collection on every
/// filter change, so clearing a constraint restores the full set.
#[must_use]
pub fn filter(incidents: &[IncidentFeature], state: &FilterState) -> Vec<IncidentFeature> {
    if state.is_unconstrained() {
        return incidents.to_vec();
    }

    let active: Vec<IncidentFeature> = incidents
        .iter()
        .filter(|incident| state.matches(incident))
        .cloned()
        .collect();

    log::debug!(
        "Filter {state:?} kept {} of {} incidents",
        active.len(),
        incidents.len()
    );

    active
}
