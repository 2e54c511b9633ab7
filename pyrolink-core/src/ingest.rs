use chrono::Utc;
use pyrolink_error::{gateway::IngestError, storage::StorageError};
use pyrolink_models::{
    constants::is_valid_board_id,
    domain::prelude::{DevicePatch, NewDevice, NewTelemetry, TelemetryReport},
    entities::prelude::DeviceModel,
    enums::device::DeviceStatus,
    settings::Battery,
    DeviceDirectory, TelemetryStore,
};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// Maps a raw cell voltage to a charge percentage and a low-battery verdict.
#[derive(Debug, Clone, Copy)]
pub struct BatteryPolicy {
    min_volts: f64,
    max_volts: f64,
    low_threshold_percent: f64,
}

impl BatteryPolicy {
    pub fn new(battery: &Battery) -> Self {
        Self {
            min_volts: battery.min_volts,
            max_volts: battery.max_volts,
            low_threshold_percent: battery.low_threshold_percent,
        }
    }

    /// Linear interpolation between `min_volts` (0%) and `max_volts`
    /// (100%), clamped. Readings outside the window come from boost
    /// converters and charging units, not measurement bugs.
    pub fn percent(&self, volts: f64) -> f64 {
        let fraction = (volts - self.min_volts) / (self.max_volts - self.min_volts);
        (fraction * 100.0).clamp(0.0, 100.0)
    }

    pub fn is_low(&self, percent: f64) -> bool {
        percent < self.low_threshold_percent
    }
}

/// Validates and persists telemetry reports.
///
/// The subject of a report may differ from the authenticated sender: relays
/// forward readings for launchers that have no IP path of their own. Unknown
/// subjects are created on the spot so field crews can power units on in any
/// order.
pub struct TelemetryIngestor {
    directory: Arc<dyn DeviceDirectory>,
    telemetry: Arc<dyn TelemetryStore>,
    battery: BatteryPolicy,
}

impl TelemetryIngestor {
    pub fn new(
        directory: Arc<dyn DeviceDirectory>,
        telemetry: Arc<dyn TelemetryStore>,
        battery: BatteryPolicy,
    ) -> Self {
        Self {
            directory,
            telemetry,
            battery,
        }
    }

    /// Ingests one report from an authenticated relay. Returns the resolved
    /// subject device id.
    pub async fn ingest(
        &self,
        relay: &DeviceModel,
        report: &TelemetryReport,
    ) -> Result<i32, IngestError> {
        report
            .validate()
            .map_err(|err| IngestError::Validation(err.to_string()))?;
        if !report.kind.is_report() {
            return Err(IngestError::Validation(format!(
                "{} is a command kind, not a report kind",
                report.kind
            )));
        }
        let subject = report.subject();
        if !is_valid_board_id(subject) {
            return Err(IngestError::Validation(format!(
                "malformed subject board id `{subject}`"
            )));
        }

        let device = match self.directory.find_by_board_id(subject).await? {
            Some(existing) => self.refresh(&existing, report).await?,
            None => self.discover(relay, subject, report).await?,
        };

        self.telemetry
            .append(NewTelemetry::from_report(report, &device))
            .await?;
        Ok(device.id)
    }

    /// Partial update for a known subject: presence stamp, derived status,
    /// and only the fields the report actually carries.
    async fn refresh(
        &self,
        device: &DeviceModel,
        report: &TelemetryReport,
    ) -> Result<DeviceModel, IngestError> {
        let (percent, status) = self.derived_state(report);
        let patch = DevicePatch {
            status: Some(status),
            latitude: report.latitude,
            longitude: report.longitude,
            altitude: report.altitude,
            battery_voltage: report.battery_voltage,
            battery_percent: percent,
            signal_strength: report.signal_strength,
            last_seen_at: Some(Utc::now()),
            ..DevicePatch::default()
        };
        Ok(self.directory.update(device.id, patch).await?)
    }

    /// First sighting of a unit: a launcher in the discovered state, placed
    /// in the forwarding relay's network.
    async fn discover(
        &self,
        relay: &DeviceModel,
        subject: &str,
        report: &TelemetryReport,
    ) -> Result<DeviceModel, IngestError> {
        let mut fresh = NewDevice::discovered(subject, relay.network_id);
        fresh.latitude = report.latitude;
        fresh.longitude = report.longitude;
        fresh.altitude = report.altitude;
        fresh.battery_voltage = report.battery_voltage;
        fresh.battery_percent = report.battery_voltage.map(|v| self.battery.percent(v));
        fresh.signal_strength = report.signal_strength;
        fresh.last_seen_at = Some(Utc::now());

        match self.directory.create(fresh).await {
            Ok(created) => {
                info!(
                    board_id = subject,
                    network = relay.network_id,
                    via = %relay.board_id,
                    "device discovered through telemetry"
                );
                Ok(created)
            }
            // Two relays can forward the same unit's first report in the
            // same instant; the unique board-id index picks the winner and
            // the loser proceeds as an update.
            Err(StorageError::Conflict(_)) => {
                let existing = self
                    .directory
                    .find_by_board_id(subject)
                    .await?
                    .ok_or_else(|| StorageError::EntityNotFound(format!("device {subject}")))?;
                self.refresh(&existing, report).await
            }
            Err(other) => Err(other.into()),
        }
    }

    fn derived_state(&self, report: &TelemetryReport) -> (Option<f64>, DeviceStatus) {
        match report.battery_voltage {
            Some(volts) => {
                let percent = self.battery.percent(volts);
                let status = if self.battery.is_low(percent) {
                    DeviceStatus::LowBattery
                } else {
                    DeviceStatus::Online
                };
                (Some(percent), status)
            }
            None => (None, DeviceStatus::Online),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> BatteryPolicy {
        BatteryPolicy::new(&Battery::default())
    }

    #[test]
    fn test_percent_endpoints() {
        assert!((policy().percent(3.30) - 0.0).abs() < 1e-9);
        assert!((policy().percent(4.20) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_interior_points() {
        assert!((policy().percent(3.435) - 15.0).abs() < 1e-9);
        assert!((policy().percent(3.84) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_clamps_out_of_range_readings() {
        assert_eq!(policy().percent(2.9), 0.0);
        assert_eq!(policy().percent(5.1), 100.0);
    }

    #[test]
    fn test_low_threshold_is_exclusive() {
        assert!(policy().is_low(19.999));
        assert!(!policy().is_low(20.0));
        assert!(!policy().is_low(60.0));
    }
}
