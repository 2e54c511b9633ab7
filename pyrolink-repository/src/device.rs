use async_trait::async_trait;
use chrono::Utc;
use pyrolink_error::{storage::StorageError, StorageResult};
use pyrolink_models::{
    domain::prelude::{DevicePatch, NewDevice},
    entities::device::{
        ActiveModel as DeviceActiveModel, Column as DeviceColumn, Entity as Device,
        Model as DeviceModel,
    },
    DeviceDirectory,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, SqlErr, Unchanged,
};

/// Device directory over sea-orm
pub struct SqlDeviceDirectory {
    db: DatabaseConnection,
}

impl SqlDeviceDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeviceDirectory for SqlDeviceDirectory {
    async fn find_by_board_id(&self, board_id: &str) -> StorageResult<Option<DeviceModel>> {
        Ok(Device::find()
            .filter(DeviceColumn::BoardId.eq(board_id))
            .one(&self.db)
            .await?)
    }

    async fn find_by_id(&self, id: i32) -> StorageResult<Option<DeviceModel>> {
        Ok(Device::find_by_id(id).one(&self.db).await?)
    }

    async fn create(&self, device: NewDevice) -> StorageResult<DeviceModel> {
        let now = Utc::now();
        let active = DeviceActiveModel {
            id: NotSet,
            board_id: Set(device.board_id),
            name: Set(device.name),
            kind: Set(device.kind),
            status: Set(device.status),
            network_id: Set(device.network_id),
            latitude: Set(device.latitude),
            longitude: Set(device.longitude),
            altitude: Set(device.altitude),
            battery_voltage: Set(device.battery_voltage),
            battery_percent: Set(device.battery_percent),
            signal_strength: Set(device.signal_strength),
            last_seen_at: Set(device.last_seen_at),
            last_polled_at: NotSet,
            secret: NotSet,
            metadata: Set(device.metadata),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        active.insert(&self.db).await.map_err(into_create_error)
    }

    async fn update(&self, id: i32, patch: DevicePatch) -> StorageResult<DeviceModel> {
        if patch.is_empty() {
            // sea-orm rejects updates that change nothing, so short-circuit
            // to a plain fetch.
            return Device::find_by_id(id)
                .one(&self.db)
                .await?
                .ok_or_else(|| StorageError::EntityNotFound(format!("device {id}")));
        }

        let mut active = DeviceActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };

        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(name) = patch.name {
            active.name = Set(Some(name));
        }
        if let Some(latitude) = patch.latitude {
            active.latitude = Set(Some(latitude));
        }
        if let Some(longitude) = patch.longitude {
            active.longitude = Set(Some(longitude));
        }
        if let Some(altitude) = patch.altitude {
            active.altitude = Set(Some(altitude));
        }
        if let Some(voltage) = patch.battery_voltage {
            active.battery_voltage = Set(Some(voltage));
        }
        if let Some(percent) = patch.battery_percent {
            active.battery_percent = Set(Some(percent));
        }
        if let Some(signal) = patch.signal_strength {
            active.signal_strength = Set(Some(signal));
        }
        if let Some(seen) = patch.last_seen_at {
            active.last_seen_at = Set(Some(seen));
        }
        if let Some(polled) = patch.last_polled_at {
            active.last_polled_at = Set(Some(polled));
        }
        if let Some(metadata) = patch.metadata {
            active.metadata = Set(Some(metadata));
        }

        match active.update(&self.db).await {
            Ok(model) => Ok(model),
            Err(DbErr::RecordNotUpdated) => {
                Err(StorageError::EntityNotFound(format!("device {id}")))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn into_create_error(err: DbErr) -> StorageError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        StorageError::Conflict("board id already registered".into())
    } else {
        err.into()
    }
}
