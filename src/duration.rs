use std::sync::LazyLock;

use regex::Regex;

/// ISO 8601 durations as YouTube reports them, e.g. `PT1H2M3S` or `P1DT30M`.
/// Every component is optional.
static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:[.,]\d+)?S)?)?$",
    )
    .expect("duration pattern is valid")
});

/// Total whole seconds in an ISO 8601 duration, or `None` if it does not parse
pub fn parse_seconds(raw: &str) -> Option<u64> {
    let caps = ISO_DURATION.captures(raw.trim())?;

    let component = |index: usize| -> Option<u64> {
        match caps.get(index) {
            Some(m) => m.as_str().parse::<u64>().ok(),
            None => Some(0),
        }
    };

    let weeks = component(1)?;
    let days = component(2)?;
    let hours = component(3)?;
    let minutes = component(4)?;
    let seconds = component(5)?;

    weeks
        .checked_mul(7 * 86_400)?
        .checked_add(days.checked_mul(86_400)?)?
        .checked_add(hours.checked_mul(3_600)?)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Format seconds as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Convert a YouTube duration to `HH:MM:SS`; anything unparseable is `00:00:00`
pub fn normalize(raw: &str) -> String {
    format_hms(parse_seconds(raw).unwrap_or(0))
}
