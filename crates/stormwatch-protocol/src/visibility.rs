//! Visibility policy: which event updates is a given viewer alerted to?
//!
//! Admins see everything. Everyone else only sees events that both carry a
//! real disaster category and clear the quality bar (high aggregation
//! confidence, or verified with independent source confirmation).

use crate::event::EventSummary;

/// Confidence at or above which an event is alert-worthy on its own.
pub const CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Minimum independent sources for a verified event to qualify.
pub const MIN_CONFIRMING_SOURCES: u32 = 2;

/// True when the event carries a real disaster category rather than one of
/// the catch-all buckets.
pub fn is_known_type(ev: &EventSummary) -> bool {
    ev.disaster_type != "unknown" && ev.disaster_type != "other"
}

/// True when the event clears the quality bar: confident enough on its own,
/// or verified and confirmed by at least two independent sources.
pub fn is_high_quality(ev: &EventSummary) -> bool {
    ev.confidence >= CONFIDENCE_THRESHOLD
        || (ev.needs_verification == 0 && ev.sources_count >= MIN_CONFIRMING_SOURCES)
}

/// Whether a viewer with the given role should be alerted to this event.
///
/// A missing session is treated as a non-admin viewer; the quality rules
/// still apply.
pub fn is_visible(role: Option<&str>, ev: &EventSummary) -> bool {
    role == Some("admin") || (is_high_quality(ev) && is_known_type(ev))
}
