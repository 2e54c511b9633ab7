use crate::enums::device::{DeviceKind, DeviceStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Device entity
///
/// One physical unit: either a base-station relay (the only kind with an IP
/// path to this backend) or a field launcher reached over the radio link.
/// Rows are created by explicit registration or by telemetry auto-discovery;
/// this subsystem never deletes them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "device")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Public board identifier, 12 ASCII digits. Unique and immutable.
    #[sea_orm(unique)]
    pub board_id: String,

    /// Optional human-readable name
    pub name: Option<String>,

    /// Relay or launcher
    pub kind: DeviceKind,

    /// Lifecycle status, partly derived from telemetry
    pub status: DeviceStatus,

    /// Owning network reference (network records live outside this core)
    pub network_id: i32,

    /// Last known position, each axis independently settable
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,

    /// Last reported battery voltage
    pub battery_voltage: Option<f64>,

    /// Percentage derived from voltage at ingest time
    pub battery_percent: Option<f64>,

    /// Last reported radio signal strength, dBm
    pub signal_strength: Option<i16>,

    /// Stamped on every accepted poll or telemetry report
    pub last_seen_at: Option<DateTimeUtc>,

    /// Stamped on every accepted poll (relays only in practice)
    pub last_polled_at: Option<DateTimeUtc>,

    /// Per-device HMAC secret. Absent until provisioned; a device without
    /// one cannot authenticate. Never serialized outward.
    #[serde(skip_serializing)]
    pub secret: Option<String>,

    /// Free-form metadata
    pub metadata: Option<Json>,

    pub created_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A device can authenticate only once a secret has been provisioned.
    #[inline]
    pub fn is_provisioned(&self) -> bool {
        self.secret.as_deref().is_some_and(|s| !s.is_empty())
    }

    #[inline]
    pub fn is_relay(&self) -> bool {
        self.kind == DeviceKind::BaseStation
    }
}
