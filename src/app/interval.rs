//! Relative time intervals such as `30s`, `10m`, `3h` or `7d`

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};

/// Parse `<integer><unit>` where unit is one of `s`, `m`, `h`, `d`
pub fn parse_interval(text: &str) -> Result<Duration> {
    let text = text.trim();
    let Some(unit) = text.chars().last() else {
        bail!("time interval is empty");
    };

    let amount = &text[..text.len() - unit.len_utf8()];
    let amount: i64 = amount
        .parse()
        .with_context(|| format!("invalid amount in time interval {}", text))?;

    let seconds_per_unit = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        _ => bail!("time scale {} is not supported", text),
    };

    amount
        .checked_mul(seconds_per_unit)
        .and_then(Duration::try_seconds)
        .with_context(|| format!("time interval {} is out of range", text))
}

/// Start of the window that ends at `end` and spans `interval`
///
/// Fails instead of overflowing when the start predates the representable range.
pub fn window_start(end: DateTime<Utc>, interval: Duration) -> Result<DateTime<Utc>> {
    end.checked_sub_signed(interval)
        .with_context(|| format!("time interval of {} days is out of range", interval.num_days()))
}
