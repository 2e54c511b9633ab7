use async_trait::async_trait;
use chrono::Utc;
use pyrolink_error::StorageResult;
use pyrolink_models::{
    domain::prelude::NewTelemetry,
    entities::telemetry::{
        ActiveModel as TelemetryActiveModel, Model as TelemetryModel,
    },
    TelemetryStore,
};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, DatabaseConnection, Set};

/// Append-only telemetry ledger over sea-orm
pub struct SqlTelemetryStore {
    db: DatabaseConnection,
}

impl SqlTelemetryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TelemetryStore for SqlTelemetryStore {
    async fn append(&self, record: NewTelemetry) -> StorageResult<TelemetryModel> {
        let active = TelemetryActiveModel {
            id: NotSet,
            device_id: Set(record.device_id),
            network_id: Set(record.network_id),
            kind: Set(record.kind),
            token: Set(record.token),
            payload: Set(record.payload),
            latitude: Set(record.latitude),
            longitude: Set(record.longitude),
            altitude: Set(record.altitude),
            battery_voltage: Set(record.battery_voltage),
            signal_strength: Set(record.signal_strength),
            received_at: Set(Utc::now()),
        };

        Ok(active.insert(&self.db).await?)
    }
}
