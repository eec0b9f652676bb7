//! Timestamp formatting for plan offsets.
//!
//! Offsets are stored once in the compilation plan as seconds. These helpers
//! only format a stored value; they never accumulate durations themselves.

/// Format an offset as a `HH:MM:SS` chapter marker.
///
/// Fractional seconds are truncated toward zero. Negative and non-finite
/// inputs clamp to `00:00:00`. Hours are not wrapped at 24.
///
/// # Examples
/// ```
/// use dclip_models::timestamp::chapter_marker;
/// assert_eq!(chapter_marker(0.0), "00:00:00");
/// assert_eq!(chapter_marker(61.9), "00:01:01");
/// assert_eq!(chapter_marker(3725.0), "01:02:05");
/// ```
pub fn chapter_marker(offset_secs: f64) -> String {
    let total = whole_seconds(offset_secs);
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

/// Format an offset as a caption cue timestamp (`HH:MM:SS,mmm`).
///
/// Rounded to the nearest millisecond; negative and non-finite inputs
/// clamp to zero.
///
/// # Examples
/// ```
/// use dclip_models::timestamp::format_caption_timestamp;
/// assert_eq!(format_caption_timestamp(90.5), "00:01:30,500");
/// ```
pub fn format_caption_timestamp(offset_secs: f64) -> String {
    let total_ms = if offset_secs.is_finite() && offset_secs > 0.0 {
        (offset_secs * 1000.0).round() as u64
    } else {
        0
    };
    let hours = total_ms / 3_600_000;
    let mins = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

fn whole_seconds(secs: f64) -> u64 {
    if secs.is_finite() && secs > 0.0 {
        secs.trunc() as u64
    } else {
        0
    }
}
