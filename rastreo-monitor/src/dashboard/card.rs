use rastreo_api::DeviceRecord;
use time::{OffsetDateTime, UtcOffset};

use crate::status::{AgeTier, PowerAssessment, Tone, age_tier, assess, exact_capture_time, time_ago};

pub const NO_BRANCH: &str = "Sucursal No Disponible";
pub const NO_VALUE: &str = "N/A";
pub const NO_PHONE: &str = "No disponible";
pub const UNASSIGNED: &str = "No asignado";

/// Display model for one device card, computed at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCard {
    pub key: String,
    pub branch: String,
    pub branch_code: String,
    pub salesperson: String,
    pub zone_label: &'static str,
    pub in_zone: bool,
    pub power: PowerAssessment,
    pub battery: Option<i64>,
    pub battery_percent: u16,
    pub battery_tone: Tone,
    pub network: Option<String>,
    pub imei: String,
    pub phone: String,
    pub last_seen: String,
    pub captured_at: String,
    pub age: AgeTier,
    pub has_location: bool,
}

impl DeviceCard {
    pub fn new(device: &DeviceRecord, index: usize, now: OffsetDateTime, offset: UtcOffset) -> Self {
        let captured = device.captured_at_millis();
        let battery = device.battery();

        Self {
            key: device.key(index),
            branch: device.branch_name().unwrap_or(NO_BRANCH).to_string(),
            branch_code: device.branch_code().unwrap_or(NO_VALUE).to_string(),
            salesperson: device.salesperson().unwrap_or(UNASSIGNED).to_string(),
            zone_label: zone_label(device.inzona),
            in_zone: device.inzona,
            power: assess(device, now),
            battery,
            battery_percent: battery.unwrap_or(0).clamp(0, 100) as u16,
            battery_tone: battery_tone(battery),
            network: device.network_type().map(str::to_string),
            imei: format_imei(device.imei()),
            phone: format_phone(device.phone()),
            last_seen: time_ago(captured, now),
            captured_at: exact_capture_time(captured, offset),
            age: age_tier(captured, now),
            has_location: device.location().is_some(),
        }
    }

    /// Missing readings show as `0%`, like the bar.
    pub fn battery_label(&self) -> String {
        format!("{}%", self.battery.unwrap_or(0))
    }
}

pub fn zone_label(in_zone: bool) -> &'static str {
    if in_zone {
        "🟢 En zona de trabajo"
    } else {
        "🔴 Fuera de zona"
    }
}

/// Green from 70%, amber from 20%, red below or when unknown.
pub fn battery_tone(level: Option<i64>) -> Tone {
    match level {
        Some(level) if level >= 70 => Tone::Green,
        Some(level) if level >= 20 => Tone::Amber,
        _ => Tone::Red,
    }
}

/// Keeps the model part of the identifier, e.g. `SM-A135M-R58T` becomes `SM-A135M`.
pub fn format_imei(imei: Option<&str>) -> String {
    let Some(imei) = imei else {
        return NO_VALUE.to_string();
    };

    let mut parts = imei.split('-');
    match (parts.next(), parts.next()) {
        (Some(brand), Some(model)) => format!("{brand}-{model}"),
        _ => imei.to_string(),
    }
}

/// Groups local phone numbers as `0981 123 456` (nine digits get the
/// leading zero added). Anything else is shown as its digits.
pub fn format_phone(phone: Option<&str>) -> String {
    let Some(phone) = phone else {
        return NO_PHONE.to_string();
    };

    let digits = phone.chars().filter(char::is_ascii_digit).collect::<String>();
    match digits.len() {
        9 => format!("0{} {} {}", &digits[..3], &digits[3..6], &digits[6..]),
        10 => format!("{} {} {}", &digits[..4], &digits[4..7], &digits[7..]),
        _ => digits,
    }
}
