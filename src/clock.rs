//! Wall-clock source for instance ids.

/// Milliseconds since the Unix epoch.
#[cfg(feature = "browser")]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_millis() -> i64 {
    js_sys::Date::now() as i64
}

/// Milliseconds since the Unix epoch, or 0 if the system clock is before it.
#[cfg(not(feature = "browser"))]
#[must_use]
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
}
