use crate::{
    domain::prelude::DEFAULT_MAX_RETRIES,
    enums::command::{CommandPriority, CommandStatus},
    initializer::TableInitializer,
};
use sea_orm::{DatabaseBackend, DeriveIden};
use sea_orm_migration::{prelude::*, schema::pk_auto};

#[derive(DeriveIden)]
pub enum Command {
    Table,
    Id,
    DeviceId,
    OriginDeviceId,
    NetworkId,
    Kind,
    Priority,
    Status,
    Token,
    Payload,
    Response,
    ErrorText,
    RetryCount,
    MaxRetries,
    CreatedAt,
    DispatchedAt,
    CompletedAt,
    UpdatedAt,
}

impl TableInitializer for Command {
    fn order(&self) -> i32 {
        super::INIT_COMMAND_ORDER
    }

    fn name(&self) -> &str {
        "command"
    }

    fn has_update_col(&self) -> bool {
        true
    }

    fn to_create_table_stmt(&self, backend: DatabaseBackend) -> TableCreateStatement {
        create_command_table(backend)
    }

    fn to_drop_table_stmt(&self, _: DatabaseBackend) -> TableDropStatement {
        Table::drop().table(Command::Table).if_exists().to_owned()
    }

    fn to_create_indexes_stmt(
        &self,
        backend: DatabaseBackend,
    ) -> Option<Vec<IndexCreateStatement>> {
        create_command_indexes(backend)
    }
}

/// Create command table
fn create_command_table(_: DatabaseBackend) -> TableCreateStatement {
    Table::create()
        .table(Command::Table)
        .if_not_exists()
        .col(pk_auto(Command::Id))
        .col(
            ColumnDef::new(Command::DeviceId)
                .integer()
                .not_null()
                .comment("Target device ID"),
        )
        .col(
            ColumnDef::new(Command::OriginDeviceId)
                .integer()
                .comment("Pinned relay ID, NULL = any relay in the network"),
        )
        .col(
            ColumnDef::new(Command::NetworkId)
                .integer()
                .not_null()
                .comment("Dispatch partition"),
        )
        .col(
            ColumnDef::new(Command::Kind)
                .string_len(32)
                .not_null()
                .comment("Instruction type"),
        )
        .col(
            ColumnDef::new(Command::Priority)
                .small_integer()
                .default(CommandPriority::Normal)
                .not_null()
                .comment("0: low, 1: normal, 2: high, 3: critical"),
        )
        .col(
            ColumnDef::new(Command::Status)
                .small_integer()
                .default(CommandStatus::Pending)
                .not_null()
                .comment("0: pending, 1: processing, 2: completed, 3: failed, 4: timed out"),
        )
        .col(
            ColumnDef::new(Command::Token)
                .string_len(16)
                .not_null()
                .comment("Human-legible correlation token"),
        )
        .col(
            ColumnDef::new(Command::Payload)
                .json()
                .comment("Kind-specific payload JSON"),
        )
        .col(
            ColumnDef::new(Command::Response)
                .json()
                .comment("Device response JSON"),
        )
        .col(ColumnDef::new(Command::ErrorText).string())
        .col(
            ColumnDef::new(Command::RetryCount)
                .small_integer()
                .default(0)
                .not_null(),
        )
        .col(
            ColumnDef::new(Command::MaxRetries)
                .small_integer()
                .default(DEFAULT_MAX_RETRIES)
                .not_null(),
        )
        .col(
            ColumnDef::new(Command::CreatedAt)
                .timestamp()
                .default(Expr::current_timestamp())
                .comment("Created at"),
        )
        .col(
            ColumnDef::new(Command::DispatchedAt)
                .timestamp()
                .comment("Claimed by a poll, cleared on requeue"),
        )
        .col(
            ColumnDef::new(Command::CompletedAt)
                .timestamp()
                .comment("Reached a terminal state"),
        )
        .col(
            ColumnDef::new(Command::UpdatedAt)
                .timestamp()
                .default(Expr::current_timestamp())
                .comment("Updated at"),
        )
        .to_owned()
}

/// Create command indexes for SQLite
fn create_command_indexes(_: DatabaseBackend) -> Option<Vec<IndexCreateStatement>> {
    Some(vec![
        // Poll-time claim scan.
        Index::create()
            .name("idx_command_claim")
            .table(Command::Table)
            .col(Command::NetworkId)
            .col(Command::Status)
            .to_owned(),
        // Sweeper scan over stale in-flight commands.
        Index::create()
            .name("idx_command_sweep")
            .table(Command::Table)
            .col(Command::Status)
            .col(Command::DispatchedAt)
            .to_owned(),
    ])
}
