pub mod constants;
pub mod domain;
pub mod entities;
pub mod enums;
mod idens;
pub mod initializer;
pub mod settings;

use crate::{
    domain::prelude::{DevicePatch, NewCommand, NewDevice, NewTelemetry},
    entities::prelude::{CommandModel, DeviceModel, TelemetryModel},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pyrolink_error::{storage::StorageError, PyroResult};
use serde_json::Value as Json;

/// Device record access for the gateway boundary.
///
/// The sole writer of device rows from this core's perspective. Kept narrow
/// so a cached or sharded implementation can be swapped in without touching
/// the authentication gate.
#[async_trait]
pub trait DeviceDirectory: Send + Sync + 'static {
    /// Looks up a device by its public board identifier.
    async fn find_by_board_id(
        &self,
        board_id: &str,
    ) -> PyroResult<Option<DeviceModel>, StorageError>;

    /// Looks up a device by primary key.
    async fn find_by_id(&self, id: i32) -> PyroResult<Option<DeviceModel>, StorageError>;

    /// Creates a device record.
    ///
    /// # Returns
    /// The inserted row, or `StorageError::Conflict` when the board
    /// identifier already exists (auto-discovery race).
    async fn create(&self, device: NewDevice) -> PyroResult<DeviceModel, StorageError>;

    /// Applies a partial update; absent patch fields are left untouched.
    async fn update(&self, id: i32, patch: DevicePatch) -> PyroResult<DeviceModel, StorageError>;
}

/// Command queue access and lifecycle transitions.
///
/// All transitions are conditional updates guarded on the current status so
/// concurrent pollers, acknowledgments and the sweeper settle to one winner.
#[async_trait]
pub trait CommandStore: Send + Sync + 'static {
    /// Enqueues a command. Creation happens outside the gateway boundary;
    /// this exists for operator tooling and tests.
    async fn create(&self, command: NewCommand) -> PyroResult<CommandModel, StorageError>;

    /// Looks up a command by primary key.
    async fn find_by_id(&self, id: i32) -> PyroResult<Option<CommandModel>, StorageError>;

    /// Atomically claims the next pending command for a polling relay:
    /// highest priority first, oldest first within a priority tier, scoped
    /// to the relay's network and to commands either unpinned or pinned to
    /// this relay. The claimed command is moved to processing with
    /// `dispatched_at` stamped.
    ///
    /// # Returns
    /// `None` when nothing is eligible.
    async fn claim_next_pending(
        &self,
        network_id: i32,
        poller_id: i32,
    ) -> PyroResult<Option<CommandModel>, StorageError>;

    /// Moves a live command to completed or failed and stamps
    /// `completed_at`.
    ///
    /// # Returns
    /// `false` when the command was already settled by a racing writer.
    async fn finalize(
        &self,
        id: i32,
        success: bool,
        response: Option<Json>,
        error_text: Option<String>,
    ) -> PyroResult<bool, StorageError>;

    /// Commands still in processing whose dispatch is older than `cutoff`.
    async fn find_stale_processing(
        &self,
        cutoff: DateTime<Utc>,
    ) -> PyroResult<Vec<CommandModel>, StorageError>;

    /// Returns a stale processing command to the queue: back to pending,
    /// retry counter bumped, dispatch stamp cleared.
    ///
    /// # Returns
    /// `false` when a racing acknowledgment settled the command first.
    async fn requeue(&self, command: &CommandModel) -> PyroResult<bool, StorageError>;

    /// Terminal timeout for a processing command with no retries left.
    ///
    /// # Returns
    /// `false` when a racing acknowledgment settled the command first.
    async fn time_out(
        &self,
        command: &CommandModel,
        error_text: &str,
    ) -> PyroResult<bool, StorageError>;
}

/// Append-only telemetry ledger.
#[async_trait]
pub trait TelemetryStore: Send + Sync + 'static {
    /// Appends one observation. Records are never mutated or deleted.
    async fn append(&self, record: NewTelemetry) -> PyroResult<TelemetryModel, StorageError>;
}
