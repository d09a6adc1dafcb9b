use chrono::DateTime;
use chrono_tz::Tz;

use crate::config::{ClockStyle, Config};

/// Renders the channel display name for the given instant: prefix, time,
/// label, suffix joined by single spaces, empty segments omitted.
///
/// Pure and infallible; the timezone was validated at config load.
pub fn display_name(now: DateTime<Tz>, config: &Config) -> String {
    let time = match config.clock_style {
        ClockStyle::TwentyFour => now.format("%H:%M").to_string(),
        ClockStyle::Twelve => now.format("%-I:%M %p").to_string(),
    };

    let mut name = String::new();
    for segment in [
        config.name_prefix.as_str(),
        time.as_str(),
        config.label.as_str(),
        config.name_suffix.as_str(),
    ] {
        if segment.is_empty() {
            continue;
        }
        if !name.is_empty() {
            name.push(' ');
        }
        name.push_str(segment);
    }

    name.trim().to_string()
}
