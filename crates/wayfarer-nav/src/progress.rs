//! Waypoint progress state machine.
//!
//! Pure functions over `NavigationState`: the engine measures the distance to
//! the next waypoint and these decide how the cursor moves. Only the next
//! waypoint is ever compared, so the cursor never moves backwards when a fix
//! regresses.

use wayfarer_core::types::NavigationState;

/// Outcome of one proximity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WaypointStep {
    /// Check skipped by the rate limiter.
    Skipped,
    /// Next waypoint not yet within the threshold.
    Hold,
    /// Cursor advanced to `index`.
    Advanced { index: usize, progress: f64 },
    /// Final waypoint reached.
    Completed,
}

/// Cursor at the start of a route with `waypoint_count` points.
pub fn initial_state(waypoint_count: usize) -> NavigationState {
    let last = waypoint_count.saturating_sub(1);
    NavigationState {
        current_waypoint_index: 0,
        next_waypoint_index: 1.min(last),
        progress: 0.0,
        is_navigating: true,
    }
}

/// Fraction of the route passed when standing on waypoint `index`.
pub fn progress_at(index: usize, last_index: usize) -> f64 {
    if last_index == 0 {
        1.0
    } else {
        (index.min(last_index) as f64 / last_index as f64).clamp(0.0, 1.0)
    }
}

/// Apply one distance measurement to the next waypoint.
///
/// Arriving at the last waypoint sets progress to 1, then completes.
pub fn evaluate(
    state: &mut NavigationState,
    distance_to_next_m: f64,
    threshold_m: f64,
    last_index: usize,
) -> WaypointStep {
    if !state.is_navigating || !distance_to_next_m.is_finite() {
        return WaypointStep::Hold;
    }
    if distance_to_next_m >= threshold_m {
        return WaypointStep::Hold;
    }

    let reached = state.next_waypoint_index;
    state.current_waypoint_index = state.current_waypoint_index.max(reached);
    state.next_waypoint_index = (reached + 1).min(last_index);
    state.progress = progress_at(state.current_waypoint_index, last_index);

    if reached >= last_index {
        state.is_navigating = false;
        WaypointStep::Completed
    } else {
        WaypointStep::Advanced {
            index: state.current_waypoint_index,
            progress: state.progress,
        }
    }
}
