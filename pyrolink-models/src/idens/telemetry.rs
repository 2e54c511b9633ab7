use crate::initializer::TableInitializer;
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};

#[derive(DeriveIden)]
pub enum Telemetry {
    Table,
    Id,
    DeviceId,
    NetworkId,
    Kind,
    Token,
    Payload,
    Latitude,
    Longitude,
    Altitude,
    BatteryVoltage,
    SignalStrength,
    ReceivedAt,
}

impl TableInitializer for Telemetry {
    fn order(&self) -> i32 {
        super::INIT_TELEMETRY_ORDER
    }

    fn name(&self) -> &str {
        "telemetry"
    }

    // Append-only ledger, no updated_at to maintain.
    fn has_update_col(&self) -> bool {
        false
    }

    fn to_create_table_stmt(&self, backend: DatabaseBackend) -> TableCreateStatement {
        create_telemetry_table(backend)
    }

    fn to_drop_table_stmt(&self, _: DatabaseBackend) -> TableDropStatement {
        Table::drop().table(Telemetry::Table).if_exists().to_owned()
    }

    fn to_create_indexes_stmt(
        &self,
        backend: DatabaseBackend,
    ) -> Option<Vec<IndexCreateStatement>> {
        create_telemetry_indexes(backend)
    }
}

/// Create telemetry table
fn create_telemetry_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Telemetry::Table)
        .if_not_exists()
        .col(pk_auto(Telemetry::Id))
        .col(
            ColumnDef::new(Telemetry::DeviceId)
                .integer()
                .not_null()
                .comment("Resolved subject device ID"),
        )
        .col(
            ColumnDef::new(Telemetry::NetworkId)
                .integer()
                .not_null()
                .comment("Network of the subject at receipt time"),
        )
        .col(
            ColumnDef::new(Telemetry::Kind)
                .string_len(32)
                .not_null()
                .comment("Report type"),
        )
        .col(
            ColumnDef::new(Telemetry::Token)
                .string_len(16)
                .comment("Correlation token echoed by the device"),
        )
        .col(
            ColumnDef::new(Telemetry::Payload)
                .json()
                .comment("Report payload as received"),
        )
        .col(ColumnDef::new(Telemetry::Latitude).double())
        .col(ColumnDef::new(Telemetry::Longitude).double())
        .col(ColumnDef::new(Telemetry::Altitude).double())
        .col(ColumnDef::new(Telemetry::BatteryVoltage).double())
        .col(
            ColumnDef::new(Telemetry::SignalStrength)
                .small_integer()
                .comment("Signal strength, dBm"),
        )
        .col(
            ColumnDef::new(Telemetry::ReceivedAt)
                .timestamp()
                .not_null()
                .comment("Receipt time"),
        )
        .to_owned()
}

/// Create telemetry indexes for SQLite
fn create_telemetry_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![Index::create()
        .name("idx_telemetry_device")
        .table(Telemetry::Table)
        .col(Telemetry::DeviceId)
        .to_owned()])
}
