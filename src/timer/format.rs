use std::time::Duration;

/// Format elapsed time as `HH:MM:SS`, truncating fractional seconds.
/// Hours widen past two digits instead of wrapping.
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Parse a `HH:MM:SS` duration back into whole seconds.
/// Hour counts too large for a `u64` of seconds are rejected.
pub(crate) fn parse_elapsed(s: &str) -> Option<Duration> {
    let mut parts = s.trim().split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?;
    Some(Duration::from_secs(total))
}
