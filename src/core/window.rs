use tracing::debug;

use crate::core::calendar::{civil_from_epoch, epoch_from_civil, normalize, weekday_from_sunday};
use crate::core::query::{LastWindow, QueryState};

pub const DAY_SECONDS: i64 = 86_400;
pub const WEEK_SECONDS: i64 = 7 * DAY_SECONDS;

/// Canonical zoom durations: 1h, 6h, 1d, 7d, 31d, 90d, 180d, 365d.
pub const DURATION_LADDER: [i64; 8] = [
    3_600,
    21_600,
    DAY_SECONDS,
    WEEK_SECONDS,
    31 * DAY_SECONDS,
    90 * DAY_SECONDS,
    180 * DAY_SECONDS,
    365 * DAY_SECONDS,
];

/// Moves the query window one step into the past.
///
/// Sub-week windows are fixed-size tiles aligned to timezone-local
/// boundaries: a misaligned start first snaps back to its tile start,
/// an aligned start shifts by a full duration. Week-or-longer windows
/// switch to civil calendar arithmetic and recompute the duration from
/// the resulting boundaries.
pub fn step_back(state: &mut QueryState, last: &LastWindow) {
    prepare(state, last);

    if state.duration < WEEK_SECONDS {
        let phase = tile_phase(state, last.offset_hours);
        state.start_time -= if phase != 0 { phase } else { state.duration };
    } else if let Some((start, duration)) =
        calendar_window_back(state.start_time, state.duration, last.offset_hours)
    {
        state.start_time = start;
        state.duration = duration;
    } else {
        debug!(
            start_time = state.start_time,
            "calendar step back out of range, keeping window"
        );
    }
    debug!(
        start_time = state.start_time,
        duration = state.duration,
        "step window back"
    );
}

/// Moves the query window one step into the future; mirror of
/// [`step_back`] except that a misaligned sub-week start snaps forward
/// to the next tile boundary.
pub fn step_forward(state: &mut QueryState, last: &LastWindow) {
    prepare(state, last);

    if state.duration < WEEK_SECONDS {
        let phase = tile_phase(state, last.offset_hours);
        state.start_time += if phase != 0 {
            state.duration - phase
        } else {
            state.duration
        };
    } else if let Some((start, duration)) =
        calendar_window_forward(state.start_time, state.duration, last.offset_hours)
    {
        state.start_time = start;
        state.duration = duration;
    } else {
        debug!(
            start_time = state.start_time,
            "calendar step forward out of range, keeping window"
        );
    }
    debug!(
        start_time = state.start_time,
        duration = state.duration,
        "step window forward"
    );
}

/// Steps `duration` down to the next smaller ladder rung.
///
/// A ladder-exact duration moves to the rung below it; anything at or
/// under the bottom rung stays on the bottom rung.
pub fn zoom_in(state: &mut QueryState) {
    state.end_time = 0;
    let current = effective_duration(state);
    state.duration = DURATION_LADDER
        .iter()
        .rev()
        .copied()
        .find(|rung| *rung < current)
        .unwrap_or(DURATION_LADDER[0]);
    debug!(duration = state.duration, "zoom in");
}

/// Steps `duration` up to the next larger ladder rung.
///
/// When the widened window would spill past `now`, the start time is
/// cleared so the next query asks for the latest data instead of a
/// future window.
pub fn zoom_out(state: &mut QueryState, now: i64) {
    state.end_time = 0;
    let current = effective_duration(state);
    state.duration = DURATION_LADDER
        .iter()
        .copied()
        .find(|rung| *rung > current)
        .unwrap_or(DURATION_LADDER[DURATION_LADDER.len() - 1]);
    if state.start_time != 0 && state.start_time + state.duration > now {
        state.start_time = 0;
    }
    debug!(
        duration = state.duration,
        start_time = state.start_time,
        "zoom out"
    );
}

fn prepare(state: &mut QueryState, last: &LastWindow) {
    state.end_time = 0;
    if state.duration == 0 {
        state.duration = DAY_SECONDS;
    }
    if state.start_time == 0 {
        state.start_time = last.start_time;
    }
}

fn effective_duration(state: &QueryState) -> i64 {
    if state.duration == 0 {
        DAY_SECONDS
    } else {
        state.duration
    }
}

/// Offset of the window start inside its tile, in the display timezone.
fn tile_phase(state: &QueryState, offset_hours: i32) -> i64 {
    (state.start_time + i64::from(offset_hours) * 3600).rem_euclid(state.duration)
}

fn calendar_window_back(start_time: i64, duration: i64, offset_hours: i32) -> Option<(i64, i64)> {
    let date = civil_from_epoch(start_time, offset_hours)?;
    let mut y = date.year;
    let mut m = i64::from(date.month);
    let mut d = i64::from(date.day);
    let (y2, m2, d2);

    if duration == WEEK_SECONDS {
        // Snap to this week's Sunday, or the previous one when already there.
        let dow = i64::from(weekday_from_sunday(date)?);
        d -= if dow != 0 { dow } else { 7 };
        y2 = y;
        m2 = m;
        d2 = d + 7;
    } else if duration <= 186 * DAY_SECONDS {
        if d != 1 {
            d = 1;
        } else {
            m -= 1;
        }
        if duration <= 31 * DAY_SECONDS {
            m2 = m + 1;
        } else if duration <= 93 * DAY_SECONDS {
            m -= 2;
            m2 = m + 3;
        } else {
            m -= 5;
            m2 = m + 6;
        }
        y2 = y;
        d2 = 1;
    } else {
        if m != 1 || d != 1 {
            m = 1;
            d = 1;
        } else {
            y -= 1;
        }
        y2 = y + 1;
        m2 = 1;
        d2 = 1;
    }

    window_from_bounds((y, m, d), (y2, m2, d2), offset_hours)
}

fn calendar_window_forward(
    start_time: i64,
    duration: i64,
    offset_hours: i32,
) -> Option<(i64, i64)> {
    let date = civil_from_epoch(start_time, offset_hours)?;
    let mut y = date.year;
    let mut m = i64::from(date.month);
    let mut d = i64::from(date.day);
    let (y2, m2, d2);

    if duration == WEEK_SECONDS {
        // Snap to the next Sunday, or a full week when already aligned.
        let dow = i64::from(weekday_from_sunday(date)?);
        d += if dow != 0 { 7 - dow } else { 7 };
        y2 = y;
        m2 = m;
        d2 = d + 7;
    } else if duration <= 186 * DAY_SECONDS {
        d = 1;
        if duration <= 31 * DAY_SECONDS {
            m += 1;
            m2 = m + 1;
        } else if duration <= 93 * DAY_SECONDS {
            m += 3;
            m2 = m + 3;
        } else {
            // A half-year window advances by one quarter.
            m += 3;
            m2 = m + 6;
        }
        y2 = y;
        d2 = 1;
    } else {
        m = 1;
        d = 1;
        y += 1;
        y2 = y + 1;
        m2 = 1;
        d2 = 1;
    }

    window_from_bounds((y, m, d), (y2, m2, d2), offset_hours)
}

fn window_from_bounds(
    lower: (i32, i64, i64),
    upper: (i32, i64, i64),
    offset_hours: i32,
) -> Option<(i64, i64)> {
    let day1 = epoch_from_civil(normalize(lower.0, lower.1, lower.2), offset_hours)?;
    let day2 = epoch_from_civil(normalize(upper.0, upper.1, upper.2), offset_hours)?;
    Some((day1, day2 - day1))
}
