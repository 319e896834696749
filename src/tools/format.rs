//! Small formatting helpers shared by the tool renderers.

/// Marker appended to truncated text.
pub const ELLIPSIS: &str = "...";

/// Truncate `text` to at most `limit` characters, ending in [`ELLIPSIS`] when
/// anything was cut. Text already within the limit is returned unchanged, so
/// truncation is idempotent.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Share of `count` in `total` as a percentage; `0.0` for an empty total.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}

/// Round half up, matching how temperatures are presented.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
