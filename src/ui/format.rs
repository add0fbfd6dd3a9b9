use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a player name is drawn before it gets cut
pub const NAME_COLUMN_WIDTH: usize = 16;

/// Remaining seconds as MM:SS; negative values clamp to zero
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

pub fn format_speed(lps: f64) -> String {
    format!("{lps:.2}")
}

/// Cuts `name` to at most `max` terminal columns, marking the cut with an ellipsis
pub fn fit_width(name: &str, max: usize) -> String {
    if name.width() <= max {
        return name.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in name.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
