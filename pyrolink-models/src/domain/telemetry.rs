use crate::entities::prelude::DeviceModel;
use crate::enums::message::MessageKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use validator::Validate;

/// Inbound telemetry submission
///
/// `board_id` is the authenticated sender. `subject_board_id` names the unit
/// the reading is about when a relay forwards on behalf of a launcher;
/// absent means the sender reports about itself.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryReport {
    #[validate(length(equal = 12))]
    pub board_id: String,
    #[validate(length(equal = 12))]
    pub subject_board_id: Option<String>,
    pub kind: MessageKind,
    pub token: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub battery_voltage: Option<f64>,
    /// dBm, negative in practice
    pub signal_strength: Option<i16>,
    /// Free-form kind-specific payload, stored as received
    pub data: Option<Json>,
}

impl TelemetryReport {
    /// Board id of the unit this report is about.
    pub fn subject(&self) -> &str {
        self.subject_board_id.as_deref().unwrap_or(&self.board_id)
    }
}

/// Row payload for the append-only telemetry ledger
#[derive(Clone, Debug, PartialEq)]
pub struct NewTelemetry {
    pub device_id: i32,
    pub network_id: i32,
    pub kind: MessageKind,
    pub token: Option<String>,
    pub payload: Option<Json>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub signal_strength: Option<i16>,
}

impl NewTelemetry {
    pub fn from_report(report: &TelemetryReport, device: &DeviceModel) -> Self {
        Self {
            device_id: device.id,
            network_id: device.network_id,
            kind: report.kind,
            token: report.token.clone(),
            payload: report.data.clone(),
            latitude: report.latitude,
            longitude: report.longitude,
            altitude: report.altitude,
            battery_voltage: report.battery_voltage,
            signal_strength: report.signal_strength,
        }
    }
}
