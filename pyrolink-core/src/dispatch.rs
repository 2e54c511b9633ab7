use chrono::Utc;
use pyrolink_error::{gateway::DispatchError, storage::StorageError};
use pyrolink_models::{
    domain::prelude::{CommandDescriptor, DevicePatch},
    entities::prelude::DeviceModel,
    CommandStore, DeviceDirectory,
};
use std::sync::Arc;
use tracing::info;

/// Picks the single next command for a polling relay.
///
/// Selection is scoped to the relay's network and to commands either
/// unpinned or pinned to this relay, ranked priority first and FIFO within
/// a tier. The claim itself is a conditional update in the store, so two
/// relays polling the same queue settle to one winner.
pub struct Dispatcher {
    directory: Arc<dyn DeviceDirectory>,
    commands: Arc<dyn CommandStore>,
}

impl Dispatcher {
    pub fn new(directory: Arc<dyn DeviceDirectory>, commands: Arc<dyn CommandStore>) -> Self {
        Self {
            directory,
            commands,
        }
    }

    /// Claims the next pending command for `relay`, or `None` when the
    /// queue has nothing eligible.
    pub async fn next_for(
        &self,
        relay: &DeviceModel,
    ) -> Result<Option<CommandDescriptor>, DispatchError> {
        if !relay.is_relay() {
            return Err(DispatchError::NotRelay);
        }

        // Polling is proof of life. The refresh happens whether or not a
        // command comes back.
        self.directory
            .update(relay.id, DevicePatch::seen_now(Utc::now()))
            .await?;

        let Some(command) = self
            .commands
            .claim_next_pending(relay.network_id, relay.id)
            .await?
        else {
            return Ok(None);
        };

        let target = self
            .directory
            .find_by_id(command.device_id)
            .await?
            .ok_or_else(|| {
                StorageError::EntityNotFound(format!("command target device {}", command.device_id))
            })?;

        info!(
            command = command.id,
            token = %command.token,
            kind = %command.kind,
            target = %target.board_id,
            relay = %relay.board_id,
            "command dispatched"
        );
        Ok(Some(CommandDescriptor::new(&command, target.board_id)))
    }
}
