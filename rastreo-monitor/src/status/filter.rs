use std::collections::BTreeSet;
use std::sync::LazyLock;

use rastreo_api::DeviceRecord;
use regex::Regex;
use time::OffsetDateTime;

use super::power::is_phone_on;

/// Tolerance around a battery query, in percentage points.
pub const BATTERY_TOLERANCE: i64 = 5;

static BATTERY_QUERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)%?|bateria\s*([0-9]+)|carga\s*([0-9]+)").expect("battery query pattern")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PowerFilter {
    #[default]
    All,
    On,
    Off,
}

impl PowerFilter {
    pub fn label(self) -> &'static str {
        match self {
            PowerFilter::All => "Todos los estados",
            PowerFilter::On => "Encendidos",
            PowerFilter::Off => "Apagados",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PowerFilter::All => PowerFilter::On,
            PowerFilter::On => PowerFilter::Off,
            PowerFilter::Off => PowerFilter::All,
        }
    }

    pub fn matches(self, on: bool) -> bool {
        match self {
            PowerFilter::All => true,
            PowerFilter::On => on,
            PowerFilter::Off => !on,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub search_term: String,
    pub sucursal: Option<String>,
    pub power_status: PowerFilter,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.search_term.is_empty() && self.sucursal.is_none() && self.power_status == PowerFilter::All
    }
}

/// Inclusive battery window, already clamped to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryRange {
    pub min: i64,
    pub max: i64,
}

impl BatteryRange {
    pub fn around(target: i64) -> Self {
        Self {
            min: target.saturating_sub(BATTERY_TOLERANCE).max(0),
            max: target.saturating_add(BATTERY_TOLERANCE).min(100),
        }
    }

    pub fn contains(&self, level: i64) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

/// Reads a battery target out of the search box: `50`, `50%`, `bateria 50`
/// or `carga 50`, anywhere in the term. Only ASCII digits count.
pub fn parse_battery_query(term: &str) -> Option<i64> {
    let captures = BATTERY_QUERY.captures(term)?;
    let digits = (1..=3).find_map(|group| captures.get(group))?.as_str();

    Some(digits.parse::<i64>().unwrap_or(i64::MAX))
}

pub fn filter<'a>(
    devices: &'a [DeviceRecord],
    criteria: &Criteria,
    now: OffsetDateTime,
) -> Vec<&'a DeviceRecord> {
    let mut filtered = devices.iter().collect::<Vec<_>>();

    if !criteria.search_term.is_empty() {
        match parse_battery_query(&criteria.search_term) {
            Some(target) => {
                let range = BatteryRange::around(target);
                filtered.retain(|device| range.contains(device.battery().unwrap_or(0)));
            }
            None => {
                let needle = criteria.search_term.to_lowercase();
                filtered.retain(|device| matches_text(device, &needle));
            }
        }
    }

    if let Some(sucursal) = criteria.sucursal.as_deref() {
        filtered.retain(|device| device.branch_name() == Some(sucursal));
    }

    if criteria.power_status != PowerFilter::All {
        filtered.retain(|device| criteria.power_status.matches(is_phone_on(device, now)));
    }

    filtered
}

/// Distinct branch names, sorted, for the branch selector.
pub fn branch_names(devices: &[DeviceRecord]) -> Vec<String> {
    devices
        .iter()
        .filter_map(DeviceRecord::branch_name)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn matches_text(device: &DeviceRecord, needle: &str) -> bool {
    [
        device.salesperson(),
        device.branch_name(),
        device.imei(),
        device.phone(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
