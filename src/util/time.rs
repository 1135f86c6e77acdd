// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback time formatting.

/// Format a playback position as `M:SS`.
///
/// Minutes are not wrapped into hours, so an hour renders as `60:00`.
/// Negative and non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}

/// Parse a length typed by the user, either `M:SS` or plain seconds.
///
/// Returns `None` for blank, negative or malformed input.
pub fn parse_time(input: &str) -> Option<f64> {
    let input = input.trim();
    let seconds = match input.split_once(':') {
        Some((minutes, secs)) => {
            let minutes: u64 = minutes.trim().parse().ok()?;
            let secs: f64 = secs.trim().parse().ok()?;
            if !(0.0..60.0).contains(&secs) {
                return None;
            }
            minutes as f64 * 60.0 + secs
        }
        None => input.parse().ok()?,
    };
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}
