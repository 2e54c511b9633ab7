use crate::enums::command::{CommandPriority, CommandStatus};
use crate::enums::message::MessageKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Command entity
///
/// One queued instruction for a target device. Created by operators outside
/// this core; the dispatch engine only claims, finalizes, requeues or times
/// them out. Status moves one direction only.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "command")]
pub struct Model {
    /// Primary key
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Target device
    pub device_id: i32,

    /// Relay the command is pinned to. NULL = any relay in the network.
    pub origin_device_id: Option<i32>,

    /// Dispatch partition key
    pub network_id: i32,

    /// Instruction type
    pub kind: MessageKind,

    /// Ranked urgency, critical first
    pub priority: CommandPriority,

    /// Lifecycle state
    pub status: CommandStatus,

    /// Short human-legible correlation token
    pub token: String,

    /// Kind-specific payload, handed to the device verbatim
    pub payload: Option<Json>,

    /// Device response stored on acknowledgment
    pub response: Option<Json>,

    /// Failure detail from the device or the sweeper
    pub error_text: Option<String>,

    pub retry_count: i16,
    pub max_retries: i16,

    pub created_at: Option<DateTimeUtc>,

    /// Stamped when claimed by a poll, cleared on requeue
    pub dispatched_at: Option<DateTimeUtc>,

    /// Stamped when the command reaches a terminal state
    pub completed_at: Option<DateTimeUtc>,

    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Requeue eligibility for a stale in-flight command.
    #[inline]
    pub fn retries_remaining(&self) -> bool {
        self.retry_count < self.max_retries
    }
}
