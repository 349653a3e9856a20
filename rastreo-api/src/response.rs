use serde_json::Value;

use crate::models::DeviceRecord;

/// What the zone summary endpoint actually answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A JSON array of records
    List,
    /// A single record object
    Single,
    /// `null`
    Empty,
    /// Any other JSON value
    Unexpected,
}

/// Device list normalized from any response shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingResponse {
    pub devices: Vec<DeviceRecord>,
    pub shape: ResponseShape,
    /// Array elements that were not records
    pub skipped: usize,
}

impl TrackingResponse {
    /// Fails only when the body is not JSON.
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value = serde_json::from_slice::<Value>(body)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                let total = items.len();
                let devices = items
                    .into_iter()
                    .filter(Value::is_object)
                    .filter_map(|item| serde_json::from_value::<DeviceRecord>(item).ok())
                    .collect::<Vec<_>>();

                Self {
                    skipped: total - devices.len(),
                    devices,
                    shape: ResponseShape::List,
                }
            }
            object @ Value::Object(_) => match serde_json::from_value::<DeviceRecord>(object) {
                Ok(device) => Self {
                    devices: vec![device],
                    shape: ResponseShape::Single,
                    skipped: 0,
                },
                Err(_) => Self {
                    devices: Vec::new(),
                    shape: ResponseShape::Single,
                    skipped: 1,
                },
            },
            Value::Null => Self {
                devices: Vec::new(),
                shape: ResponseShape::Empty,
                skipped: 0,
            },
            _ => Self {
                devices: Vec::new(),
                shape: ResponseShape::Unexpected,
                skipped: 0,
            },
        }
    }
}
