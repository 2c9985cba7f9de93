//! util — общие утилиты.
//!
//! Содержит:
//! - now_secs(): текущее Unix-время в секундах.
//! - now_stamp(): человекочитаемая метка времени (UTC) для created_at/joined_at.
//! - parse_bool_flag(): разбор булевых ENV значений (1|true|on|yes).

use chrono::Utc;

/// Placeholder for string fields missing in older snapshots.
pub const UNKNOWN: &str = "unknown";

/// Текущее Unix-время в секундах (saturating при сбое часов).
#[inline]
pub fn now_secs() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// UTC timestamp in the `YYYY-MM-DD HH:MM:SS` form the front-end displays.
pub fn now_stamp() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// "1|true|on|yes" (case-insensitive, trimmed) => true.
pub fn parse_bool_flag(v: &str) -> bool {
    let s = v.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "on" || s == "yes"
}
