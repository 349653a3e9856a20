//! Derived indicators computed per record at render time.
//!
//! Everything here takes the current time as an argument so the same record
//! always yields the same result for the same `now`.

pub mod age;
pub mod filter;
pub mod power;

pub use age::{AgeTier, age_tier, exact_capture_time, time_ago};
pub use filter::{BatteryRange, Criteria, PowerFilter, branch_names, filter, parse_battery_query};
pub use power::{Confidence, PowerAssessment, assess, confidence_of, is_phone_on};

use time::OffsetDateTime;

/// Palette shared by badges, battery bars and age labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// #10B981
    Green,
    /// #F59E0B
    Amber,
    /// #F97316
    Orange,
    /// #DC2626
    Crimson,
    /// #EF4444
    Red,
    /// #6B7280
    Grey,
}

impl Tone {
    pub fn hex(self) -> &'static str {
        match self {
            Tone::Green => "#10B981",
            Tone::Amber => "#F59E0B",
            Tone::Orange => "#F97316",
            Tone::Crimson => "#DC2626",
            Tone::Red => "#EF4444",
            Tone::Grey => "#6B7280",
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Tone::Green => (0x10, 0xB9, 0x81),
            Tone::Amber => (0xF5, 0x9E, 0x0B),
            Tone::Orange => (0xF9, 0x73, 0x16),
            Tone::Crimson => (0xDC, 0x26, 0x26),
            Tone::Red => (0xEF, 0x44, 0x44),
            Tone::Grey => (0x6B, 0x72, 0x80),
        }
    }
}

pub fn unix_millis(now: OffsetDateTime) -> i64 {
    (now.unix_timestamp_nanos() / 1_000_000) as i64
}

/// A zero capture time is treated as missing.
pub(crate) fn capture_millis(timestamp: Option<i64>) -> Option<i64> {
    timestamp.filter(|&millis| millis != 0)
}

pub(crate) fn elapsed_millis(timestamp: i64, now: OffsetDateTime) -> i64 {
    unix_millis(now).saturating_sub(timestamp)
}
