use crate::enums::device::{DeviceKind, DeviceStatus};
use chrono::{DateTime, Utc};
use serde_json::Value as Json;

/// Payload to create a device record
///
/// Built by explicit registration flows and by telemetry auto-discovery.
/// The secret stays absent here; provisioning happens outside this protocol.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDevice {
    /// Public board identifier, 12 ASCII digits
    pub board_id: String,
    /// Optional human-readable name
    pub name: Option<String>,
    pub kind: DeviceKind,
    pub status: DeviceStatus,
    /// Owning network
    pub network_id: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub battery_percent: Option<f64>,
    pub signal_strength: Option<i16>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub metadata: Option<Json>,
}

impl NewDevice {
    /// Skeleton for a unit first seen through telemetry: a launcher in the
    /// discovered state, not yet provisioned.
    pub fn discovered(board_id: impl Into<String>, network_id: i32) -> Self {
        Self {
            board_id: board_id.into(),
            name: None,
            kind: DeviceKind::Launcher,
            status: DeviceStatus::Discovered,
            network_id,
            latitude: None,
            longitude: None,
            altitude: None,
            battery_voltage: None,
            battery_percent: None,
            signal_strength: None,
            last_seen_at: None,
            metadata: None,
        }
    }
}

/// Partial device update
///
/// Only populated fields are written; absent fields are left untouched,
/// never zeroed.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DevicePatch {
    pub status: Option<DeviceStatus>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub battery_percent: Option<f64>,
    pub signal_strength: Option<i16>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub last_polled_at: Option<DateTime<Utc>>,
    pub metadata: Option<Json>,
}

impl DevicePatch {
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.name.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.altitude.is_none()
            && self.battery_voltage.is_none()
            && self.battery_percent.is_none()
            && self.signal_strength.is_none()
            && self.last_seen_at.is_none()
            && self.last_polled_at.is_none()
            && self.metadata.is_none()
    }

    /// Presence refresh applied when a relay polls.
    pub fn seen_now(now: DateTime<Utc>) -> Self {
        Self {
            status: Some(DeviceStatus::Online),
            last_seen_at: Some(now),
            last_polled_at: Some(now),
            ..Self::default()
        }
    }
}
