//! Wall-clock formatting and the hour-of-day greeting.

use chrono::{DateTime, Local, Timelike};

/// 24-hour `HH:MM`, zero-padded.
pub fn hours_minutes(now: &DateTime<Local>) -> String {
    format!("{:02}:{:02}", now.hour(), now.minute())
}

/// Standalone `:SS`, zero-padded.
pub fn seconds(now: &DateTime<Local>) -> String {
    format!(":{:02}", now.second())
}

/// Long date, e.g. `Monday, June 2, 2025`.
pub fn long_date(now: &DateTime<Local>) -> String {
    now.format("%A, %B %-d, %Y").to_string()
}

/// Greeting bands: [0,12) morning, [12,17) afternoon, [17,21) evening,
/// [21,24) night.
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning"
    } else if hour < 17 {
        "Good Afternoon"
    } else if hour < 21 {
        "Good Evening"
    } else {
        "Good Night"
    }
}
