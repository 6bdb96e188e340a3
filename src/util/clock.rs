//! Wall-clock time in milliseconds since the Unix epoch.

#[cfg(test)]
#[path = "clock_test.rs"]
mod clock_test;

/// Current time in whole milliseconds since the Unix epoch.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

/// Current time in whole milliseconds since the Unix epoch.
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
#[must_use]
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
