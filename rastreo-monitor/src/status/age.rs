use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use super::{Tone, capture_millis, elapsed_millis};

pub const NO_DATA: &str = "Sin datos";

const MILLIS_PER_HOUR: i64 = 60 * 60 * 1000;

/// Freshness of a capture time, from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeTier {
    /// Under an hour
    Fresh,
    /// Under six hours
    Recent,
    /// Under twelve hours
    Aging,
    /// Under a day
    Old,
    /// A day or more, or unknown
    Stale,
}

impl AgeTier {
    pub fn tone(self) -> Tone {
        match self {
            AgeTier::Fresh => Tone::Green,
            AgeTier::Recent => Tone::Amber,
            AgeTier::Aging => Tone::Orange,
            AgeTier::Old => Tone::Crimson,
            AgeTier::Stale => Tone::Red,
        }
    }
}

/// Relative age in the largest whole unit, e.g. `hace 3 horas`.
pub fn time_ago(timestamp: Option<i64>, now: OffsetDateTime) -> String {
    let Some(captured) = capture_millis(timestamp) else {
        return NO_DATA.to_string();
    };

    let seconds = elapsed_millis(captured, now).max(0) / 1000;
    if seconds < 60 {
        return format!("hace {seconds} segundos");
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("hace {minutes} minuto{}", plural(minutes, "s"));
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("hace {hours} hora{}", plural(hours, "s"));
    }

    let days = hours / 24;
    if days < 30 {
        return format!("hace {days} día{}", plural(days, "s"));
    }

    let months = days / 30;
    if months < 12 {
        return format!("hace {months} mes{}", plural(months, "es"));
    }

    let years = months / 12;
    format!("hace {years} año{}", plural(years, "s"))
}

pub fn age_tier(timestamp: Option<i64>, now: OffsetDateTime) -> AgeTier {
    let Some(captured) = capture_millis(timestamp) else {
        return AgeTier::Stale;
    };

    match elapsed_millis(captured, now).div_euclid(MILLIS_PER_HOUR) {
        hours if hours < 1 => AgeTier::Fresh,
        hours if hours < 6 => AgeTier::Recent,
        hours if hours < 12 => AgeTier::Aging,
        hours if hours < 24 => AgeTier::Old,
        _ => AgeTier::Stale,
    }
}

/// Absolute capture time in the given offset, `DD/MM/YYYY HH:MM:SS`.
pub fn exact_capture_time(timestamp: Option<i64>, offset: UtcOffset) -> String {
    let Some(captured) = capture_millis(timestamp) else {
        return NO_DATA.to_string();
    };

    OffsetDateTime::from_unix_timestamp_nanos(i128::from(captured) * 1_000_000)
        .ok()
        .and_then(|time| {
            time.to_offset(offset)
                .format(format_description!("[day]/[month]/[year] [hour]:[minute]:[second]"))
                .ok()
        })
        .unwrap_or_else(|| NO_DATA.to_string())
}

fn plural(count: i64, suffix: &'static str) -> &'static str {
    if count > 1 { suffix } else { "" }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use super::*;
    use crate::status::fixtures::{ago, now};

    #[test]
    fn test_missing_timestamp() {
        assert_eq!(time_ago(None, now()), "Sin datos");
        assert_eq!(time_ago(Some(0), now()), "Sin datos");
        assert_eq!(age_tier(None, now()), AgeTier::Stale);
    }

    #[test]
    fn test_unit_boundaries() {
        let cases = [
            (Duration::seconds(59), "hace 59 segundos"),
            (Duration::seconds(60), "hace 1 minuto"),
            (Duration::seconds(150), "hace 2 minutos"),
            (Duration::minutes(60), "hace 1 hora"),
            (Duration::hours(23) + Duration::minutes(59), "hace 23 horas"),
            (Duration::hours(24), "hace 1 día"),
            (Duration::days(29), "hace 29 días"),
            (Duration::days(30), "hace 1 mes"),
            (Duration::days(70), "hace 2 meses"),
            (Duration::days(360), "hace 1 año"),
            (Duration::days(800), "hace 2 años"),
        ];

        for (elapsed, expected) in cases {
            assert_eq!(time_ago(ago(elapsed), now()), expected);
        }
    }

    #[test]
    fn test_singular_seconds_keep_plural_wording() {
        assert_eq!(time_ago(ago(Duration::seconds(1)), now()), "hace 1 segundos");
        assert_eq!(time_ago(ago(Duration::milliseconds(999)), now()), "hace 0 segundos");
    }

    #[test]
    fn test_future_timestamp_is_clamped() {
        assert_eq!(time_ago(ago(Duration::minutes(-3)), now()), "hace 0 segundos");
        assert_eq!(age_tier(ago(Duration::minutes(-3)), now()), AgeTier::Fresh);
    }

    #[test]
    fn test_tiers_increase_with_age() {
        let cases = [
            (Duration::minutes(59), AgeTier::Fresh),
            (Duration::hours(1), AgeTier::Recent),
            (Duration::hours(6), AgeTier::Aging),
            (Duration::hours(12), AgeTier::Old),
            (Duration::hours(23) + Duration::minutes(59), AgeTier::Old),
            (Duration::hours(24), AgeTier::Stale),
        ];

        for (elapsed, expected) in cases {
            assert_eq!(age_tier(ago(elapsed), now()), expected);
        }

        assert!(AgeTier::Fresh < AgeTier::Recent && AgeTier::Old < AgeTier::Stale);
        assert_eq!(AgeTier::Fresh.tone().hex(), "#10B981");
        assert_eq!(AgeTier::Stale.tone().hex(), "#EF4444");
    }

    #[test]
    fn test_exact_capture_time_uses_offset() {
        // 2025-06-15 15:06:40 UTC
        let captured = Some(1_750_000_000_000);
        let offset = UtcOffset::from_hms(-3, 0, 0).unwrap();

        assert_eq!(exact_capture_time(captured, offset), "15/06/2025 12:06:40");
        assert_eq!(exact_capture_time(None, offset), "Sin datos");
    }
}
