use crate::{enums::device::DeviceStatus, initializer::TableInitializer};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};

#[derive(DeriveIden)]
pub enum Device {
    Table,
    Id,
    BoardId,
    Name,
    Kind,
    Status,
    NetworkId,
    Latitude,
    Longitude,
    Altitude,
    BatteryVoltage,
    BatteryPercent,
    SignalStrength,
    LastSeenAt,
    LastPolledAt,
    Secret,
    Metadata,
    CreatedAt,
    UpdatedAt,
}

impl TableInitializer for Device {
    fn order(&self) -> i32 {
        super::INIT_DEVICE_ORDER
    }

    fn name(&self) -> &str {
        "device"
    }

    fn has_update_col(&self) -> bool {
        true
    }

    fn to_create_table_stmt(&self, backend: DatabaseBackend) -> TableCreateStatement {
        create_device_table(backend)
    }

    fn to_drop_table_stmt(&self, _: DatabaseBackend) -> TableDropStatement {
        Table::drop().table(Device::Table).if_exists().to_owned()
    }

    fn to_create_indexes_stmt(
        &self,
        backend: DatabaseBackend,
    ) -> Option<Vec<IndexCreateStatement>> {
        create_device_indexes(backend)
    }
}

/// Create device table
fn create_device_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Device::Table)
        .if_not_exists()
        .col(pk_auto(Device::Id))
        .col(
            ColumnDef::new(Device::BoardId)
                .string_len(12)
                .not_null()
                .comment("Public board identifier, 12 ASCII digits"),
        )
        .col(ColumnDef::new(Device::Name).string().comment("Human name"))
        .col(
            ColumnDef::new(Device::Kind)
                .small_integer()
                .not_null()
                .comment("0: base station, 1: launcher"),
        )
        .col(
            ColumnDef::new(Device::Status)
                .small_integer()
                .default(DeviceStatus::Offline)
                .not_null()
                .comment("0: online, 1: offline, 2: discovered, 3: low battery"),
        )
        .col(
            ColumnDef::new(Device::NetworkId)
                .integer()
                .not_null()
                .comment("Owning network ID"),
        )
        .col(ColumnDef::new(Device::Latitude).double())
        .col(ColumnDef::new(Device::Longitude).double())
        .col(ColumnDef::new(Device::Altitude).double())
        .col(
            ColumnDef::new(Device::BatteryVoltage)
                .double()
                .comment("Last reported battery voltage"),
        )
        .col(
            ColumnDef::new(Device::BatteryPercent)
                .double()
                .comment("Derived battery percentage"),
        )
        .col(
            ColumnDef::new(Device::SignalStrength)
                .small_integer()
                .comment("Signal strength, dBm"),
        )
        .col(ColumnDef::new(Device::LastSeenAt).timestamp())
        .col(ColumnDef::new(Device::LastPolledAt).timestamp())
        .col(
            ColumnDef::new(Device::Secret)
                .string()
                .comment("HMAC secret, absent until provisioned"),
        )
        .col(
            ColumnDef::new(Device::Metadata)
                .json()
                .comment("Free-form metadata JSON"),
        )
        .col(
            ColumnDef::new(Device::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp())
                .comment("Created at"),
        )
        .col(
            ColumnDef::new(Device::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp())
                .comment("Updated at"),
        )
        .to_owned()
}

/// Create device indexes for SQLite
fn create_device_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![
        // Uniqueness backs discovery race resolution, not just lookups.
        Index::create()
            .name("ux_device_board_id")
            .table(Device::Table)
            .col(Device::BoardId)
            .unique()
            .to_owned(),
        Index::create()
            .name("idx_device_network")
            .table(Device::Table)
            .col(Device::NetworkId)
            .to_owned(),
    ])
}
