//! Native status to canonical alarm state.

use infragraph_types::AlarmState;

/// Map a source status onto the two-state alarm model.
///
/// Only an exact match of the source's healthy sentinel is `Inactive`;
/// everything else, unknown statuses included, is `Active`.
pub fn map_state(native_status: &str, ok_value: &str) -> AlarmState {
    if native_status == ok_value {
        AlarmState::Inactive
    } else {
        AlarmState::Active
    }
}
