//! Pure time-window predicate for the scope conflict scan.
//!
//! The SQL side narrows candidates by vendor, boost type, scope type, scope
//! intersection, and live status; this predicate decides whether two
//! candidates actually collide in time. Windows are half-open `[start, end)`,
//! so back-to-back boosts (one ending exactly when the next starts) do not
//! conflict.

use crate::domain::TimeMs;

pub fn windows_overlap(a_start: TimeMs, a_end: TimeMs, b_start: TimeMs, b_end: TimeMs) -> bool {
    a_start < b_end && b_start < a_end
}
