use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::de;

use super::MapLocation;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sucursal {
    /// Branch display name
    #[serde(default, deserialize_with = "de::lenient_string", skip_serializing_if = "Option::is_none")]
    pub nombresucursal: Option<String>,
    /// Branch code in the ERP
    #[serde(default, deserialize_with = "de::lenient_string", skip_serializing_if = "Option::is_none")]
    pub codsucursalerp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    /// Salesperson name
    #[serde(default, deserialize_with = "de::lenient_string", skip_serializing_if = "Option::is_none")]
    pub nombrepersona: Option<String>,
    /// Branch the salesperson belongs to
    #[serde(default, deserialize_with = "de::lenient_object", skip_serializing_if = "Option::is_none")]
    pub sucursal: Option<Sucursal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracking {
    /// Tracking identifier
    #[serde(default, deserialize_with = "de::lenient_string", skip_serializing_if = "Option::is_none")]
    pub codtracking: Option<String>,
    /// Capture time in epoch milliseconds
    #[serde(default, deserialize_with = "de::lenient_i64", skip_serializing_if = "Option::is_none")]
    pub fechacaptura: Option<i64>,
    /// Whether the GPS reported itself active
    #[serde(default, deserialize_with = "de::lenient_bool", skip_serializing_if = "Option::is_none")]
    pub gpsactivo: Option<bool>,
    /// Battery level percentage. `Some(None)` when the key was sent as `null`.
    #[serde(default, deserialize_with = "de::reported_i64", skip_serializing_if = "Option::is_none")]
    pub bateria: Option<Option<i64>>,
    /// Device identifier, usually `model-serial`
    #[serde(default, deserialize_with = "de::lenient_string", skip_serializing_if = "Option::is_none")]
    pub imei: Option<String>,
    /// Network type (wifi, 4g, ...)
    #[serde(default, deserialize_with = "de::lenient_string", skip_serializing_if = "Option::is_none")]
    pub tipored: Option<String>,
    /// Phone number
    #[serde(default, deserialize_with = "de::lenient_string", skip_serializing_if = "Option::is_none")]
    pub nrotelefono: Option<String>,
    /// Last known latitude
    #[serde(default, deserialize_with = "de::lenient_f64", skip_serializing_if = "Option::is_none")]
    pub latitud: Option<f64>,
    /// Last known longitude
    #[serde(default, deserialize_with = "de::lenient_f64", skip_serializing_if = "Option::is_none")]
    pub longitud: Option<f64>,
    /// Salesperson owning the device
    #[serde(default, deserialize_with = "de::lenient_object", skip_serializing_if = "Option::is_none")]
    pub usuario: Option<Usuario>,
}

impl Tracking {
    pub fn captured_at(&self) -> Option<OffsetDateTime> {
        let millis = self.fechacaptura?;
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
    }

    pub fn battery(&self) -> Option<i64> {
        self.bateria.flatten()
    }

    /// The payload carried a battery field, even a `null` one.
    pub fn battery_reported(&self) -> bool {
        self.bateria.is_some()
    }

    pub fn location(&self) -> Option<MapLocation> {
        Some(MapLocation {
            latitud: self.latitud?,
            longitud: self.longitud?,
        })
    }

    fn sucursal(&self) -> Option<&Sucursal> {
        self.usuario.as_ref()?.sucursal.as_ref()
    }
}

/// One tracked device and salesperson pairing, as returned by the zone summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Record identifier
    #[serde(default, deserialize_with = "de::lenient_string", skip_serializing_if = "Option::is_none")]
    pub codtracking: Option<String>,
    /// Whether the last position falls inside the assigned zone
    #[serde(default, deserialize_with = "de::truthy")]
    pub inzona: bool,
    /// Latest telemetry, absent for devices that never reported
    #[serde(default, deserialize_with = "de::lenient_object", skip_serializing_if = "Option::is_none")]
    pub tracking: Option<Tracking>,
}

impl DeviceRecord {
    /// Stable key for rendering, falling back to the list position.
    pub fn key(&self, index: usize) -> String {
        self.codtracking
            .as_deref()
            .or_else(|| self.tracking.as_ref()?.codtracking.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{index}"))
    }

    pub fn battery(&self) -> Option<i64> {
        self.tracking.as_ref()?.battery()
    }

    pub fn captured_at_millis(&self) -> Option<i64> {
        self.tracking.as_ref()?.fechacaptura
    }

    pub fn salesperson(&self) -> Option<&str> {
        self.tracking.as_ref()?.usuario.as_ref()?.nombrepersona.as_deref()
    }

    pub fn branch_name(&self) -> Option<&str> {
        self.tracking.as_ref()?.sucursal()?.nombresucursal.as_deref()
    }

    pub fn branch_code(&self) -> Option<&str> {
        self.tracking.as_ref()?.sucursal()?.codsucursalerp.as_deref()
    }

    pub fn imei(&self) -> Option<&str> {
        self.tracking.as_ref()?.imei.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.tracking.as_ref()?.nrotelefono.as_deref()
    }

    pub fn network_type(&self) -> Option<&str> {
        self.tracking.as_ref()?.tipored.as_deref()
    }

    pub fn location(&self) -> Option<MapLocation> {
        self.tracking.as_ref()?.location()
    }
}
