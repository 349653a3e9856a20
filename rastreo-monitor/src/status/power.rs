use rastreo_api::DeviceRecord;
use time::OffsetDateTime;

use super::{Tone, capture_millis, elapsed_millis};

/// Telemetry older than this never counts as a powered-on phone.
pub const STALE_AFTER_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// How much the power verdict can be trusted, from the signals available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    /// No tracking payload at all
    None,
    /// Capture time missing or at least 24 hours old
    Stale,
    /// GPS reported active
    High,
    /// Battery above zero and an IMEI
    Medium,
    /// Network type and a battery field, even a null one
    Low,
    /// Recent data without any usable signal
    Insufficient,
}

impl Confidence {
    pub fn code(self) -> &'static str {
        match self {
            Confidence::None => "sin_datos",
            Confidence::Stale => "datos_antiguos",
            Confidence::High => "alta",
            Confidence::Medium => "media",
            Confidence::Low => "baja",
            Confidence::Insufficient => "insuficiente",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerAssessment {
    pub on: bool,
    pub confidence: Confidence,
}

impl PowerAssessment {
    pub fn label(&self) -> &'static str {
        if !self.on {
            return match self.confidence {
                Confidence::Stale => "Apagado (>24 horas)",
                Confidence::None => "Apagado (sin datos)",
                _ => "Apagado/Sin conexión",
            };
        }

        match self.confidence {
            Confidence::High => "Encendido ✓",
            Confidence::Medium => "Probablemente encendido",
            Confidence::Low => "Posiblemente encendido",
            _ => "Estado incierto",
        }
    }

    pub fn tone(&self) -> Tone {
        if !self.on {
            return Tone::Red;
        }

        match self.confidence {
            Confidence::High => Tone::Green,
            Confidence::Medium | Confidence::Low => Tone::Amber,
            _ => Tone::Grey,
        }
    }
}

/// Infers whether the phone is on. The staleness gate runs before any
/// positive signal is considered.
pub fn assess(device: &DeviceRecord, now: OffsetDateTime) -> PowerAssessment {
    let verdict = |on, confidence| PowerAssessment { on, confidence };

    let Some(tracking) = device.tracking.as_ref() else {
        return verdict(false, Confidence::None);
    };

    let recent = capture_millis(tracking.fechacaptura)
        .is_some_and(|captured| elapsed_millis(captured, now) < STALE_AFTER_MILLIS);
    if !recent {
        return verdict(false, Confidence::Stale);
    }

    if tracking.gpsactivo == Some(true) {
        return verdict(true, Confidence::High);
    }

    if tracking.battery().is_some_and(|level| level > 0) && tracking.imei.is_some() {
        return verdict(true, Confidence::Medium);
    }

    // A reported `null` battery still counts here.
    if tracking.tipored.is_some() && tracking.battery_reported() {
        return verdict(true, Confidence::Low);
    }

    verdict(false, Confidence::Insufficient)
}

pub fn is_phone_on(device: &DeviceRecord, now: OffsetDateTime) -> bool {
    assess(device, now).on
}

pub fn confidence_of(device: &DeviceRecord, now: OffsetDateTime) -> Confidence {
    assess(device, now).confidence
}
