// Logging and formatting helpers shared by the board and its components.

use std::cell::Cell;

thread_local! {
    static DEBUG_LOG: Cell<bool> = const { Cell::new(false) };
}

pub fn set_debug_logging(enabled: bool) {
    DEBUG_LOG.with(|flag| flag.set(enabled));
}

pub fn debug_logging() -> bool {
    DEBUG_LOG.with(|flag| flag.get())
}

/// Debug console log; silent unless enabled through the board config.
pub fn clog(msg: &str) {
    if !debug_logging() {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    gloo::console::log!(msg);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

/// Always-on console warning for failures the board swallows.
pub fn cwarn(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::warn!(msg);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

/// Caption time for a polaroid, e.g. `3:07 PM`.
///
/// `tz_offset_minutes` follows `Date.getTimezoneOffset()`: minutes to add to
/// local time to reach UTC (positive west of Greenwich).
pub fn format_capture_time(timestamp_ms: f64, tz_offset_minutes: f64) -> String {
    const MINUTES_PER_DAY: i64 = 24 * 60;
    let total_minutes = (timestamp_ms / 60_000.0).floor() as i64 - tz_offset_minutes as i64;
    let minute_of_day = total_minutes.rem_euclid(MINUTES_PER_DAY);
    let h24 = minute_of_day / 60;
    let m = minute_of_day % 60;
    let suffix = if h24 < 12 { "AM" } else { "PM" };
    let h12 = match h24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", h12, m, suffix)
}
