//! Chart interaction hooks that feed back into the query state.
//!
//! The plot widget itself is external; these helpers translate its
//! selection rectangles and legend clicks into query mutations.

use tracing::debug;

use crate::core::query::QueryState;

/// Selection rectangles snap to this grid, in seconds.
const SELECTION_SNAP_SECONDS: i64 = 600;

/// Applies a plot-selection rectangle as the new query window.
///
/// The selection arrives in display-timezone milliseconds (the chart's
/// x axis); both the resulting start and duration snap to the nearest
/// 10 minute boundary.
pub fn apply_selection_zoom(state: &mut QueryState, from_ms: i64, to_ms: i64, offset_hours: i32) {
    let start = from_ms / 1000 - i64::from(offset_hours) * 3600;
    state.start_time = snap_to_grid(start);
    state.duration = snap_to_grid((to_ms - from_ms) / 1000);
    debug!(
        start_time = state.start_time,
        duration = state.duration,
        "selection zoom"
    );
}

/// Derives a flow filter from a clicked legend label.
///
/// The proto view keys flows by their first label token; every other
/// view keys them by the first two. Labels with fewer tokens pass
/// through unchanged.
#[must_use]
pub fn filter_for_flow(view: &str, label: &str) -> String {
    let keep = if view == "proto" { 1 } else { 2 };
    let tokens: Vec<&str> = label.split_whitespace().collect();
    if tokens.len() <= keep {
        return label.to_owned();
    }
    tokens[..keep].join(" ")
}

fn snap_to_grid(seconds: i64) -> i64 {
    (seconds + SELECTION_SNAP_SECONDS / 2) / SELECTION_SNAP_SECONDS * SELECTION_SNAP_SECONDS
}
