//! Database utility functions.

use chrono::{Duration, Utc};

/// Timestamp layout used for every stored date. Lexicographic order matches
/// chronological order, which the session expiry queries rely on.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Generate an 8-character hex ID for database entities.
pub fn generate_entity_id() -> String {
    let mut bytes = [0u8; 4];
    if getrandom::fill(&mut bytes).is_err() {
        // Entropy source unavailable; fall back to the clock.
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        bytes = (nanos as u32).to_be_bytes();
    }
    format!("{:08x}", u32::from_be_bytes(bytes))
}

/// Get current datetime as string in SQLite format.
pub fn current_timestamp() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Get the datetime `offset` from now as string in SQLite format.
pub fn timestamp_after(offset: Duration) -> String {
    (Utc::now() + offset).format(TIMESTAMP_FORMAT).to_string()
}
