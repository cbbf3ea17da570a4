//! Pause normalization.
//!
//! Terminals report pause length either in minutes or in seconds. Minutes take
//! precedence when valid; a pause with neither value yields no exclusion at all
//! (it is not treated as a zero-length pause).

use crate::algorithms::intervals::Interval;
use crate::models::time::add_minutes;
use crate::models::Pause;

fn valid_non_negative(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

/// Canonical pause length in minutes, or `None` when the pause carries no usable value.
pub fn pause_minutes(pause: &Pause) -> Option<f64> {
    valid_non_negative(pause.duration_minutes)
        .or_else(|| valid_non_negative(pause.duration_seconds).map(|secs| secs / 60.0))
}

/// Wall-clock window removed from the task's active interval by this pause.
///
/// Anchored on `paused_at` when known, otherwise ending at `resumed_at`.
pub fn exclusion_window(pause: &Pause) -> Option<Interval> {
    let minutes = pause_minutes(pause)?;

    if let Some(paused_at) = pause.paused_at {
        let end = add_minutes(paused_at, minutes)?;
        return Some(Interval::new(paused_at, end));
    }

    let resumed_at = pause.resumed_at?;
    let start = add_minutes(resumed_at, -minutes)?;
    Some(Interval::new(start, resumed_at))
}

/// Exclusion windows for every pause that has both a value and an anchor.
pub fn exclusion_windows(pauses: &[Pause]) -> Vec<Interval> {
    pauses.iter().filter_map(exclusion_window).collect()
}

/// Sum of the defined pause lengths.
pub fn total_pause_minutes(pauses: &[Pause]) -> f64 {
    pauses.iter().filter_map(pause_minutes).sum()
}
