use crate::enums::message::MessageKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Telemetry entity
///
/// Append-only observation ledger. One row per accepted report, never
/// mutated or deleted by this subsystem.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "telemetry")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Resolved subject device
    pub device_id: i32,

    /// Network of the subject device at receipt time
    pub network_id: i32,

    /// Report type
    pub kind: MessageKind,

    /// Optional correlation token echoed by the device
    pub token: Option<String>,

    /// Report payload as received
    pub payload: Option<Json>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,

    pub battery_voltage: Option<f64>,

    /// Radio signal strength, dBm
    pub signal_strength: Option<i16>,

    pub received_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
