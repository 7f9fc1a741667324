//! Minute arithmetic over the day grid.
//!
//! Both the realignment engine and the import normalizer express points
//! in a day as integer minutes since midnight; this module is the single
//! place that arithmetic lives so the two always agree on minute
//! semantics.

/// Convert an hour/minute pair to absolute minutes since midnight.
pub fn to_minutes(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

/// Split absolute minutes since midnight back into an hour/minute pair.
pub fn from_minutes(total: u32) -> (u32, u32) {
    (total / 60, total % 60)
}

/// Format an hour/minute pair as a zero-padded `HH:MM` string.
pub fn format_time(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}
