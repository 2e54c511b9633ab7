use crate::entities::prelude::CommandModel;
use crate::enums::command::CommandPriority;
use crate::enums::message::MessageKind;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use uuid::Uuid;

pub const DEFAULT_MAX_RETRIES: i16 = 3;

/// Correlation token: first 8 hex characters of a fresh UUIDv4, uppercased.
/// Short enough to read back over a radio check.
pub fn correlation_token() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_ascii_uppercase()
}

/// Payload to enqueue a command
///
/// Commands are created by operator tooling outside the gateway boundary;
/// the dispatch engine only consumes them.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCommand {
    /// Target device
    pub device_id: i32,
    /// Relay the command is pinned to. None = any relay in the network.
    pub origin_device_id: Option<i32>,
    pub network_id: i32,
    pub kind: MessageKind,
    pub priority: CommandPriority,
    pub payload: Option<Json>,
    pub max_retries: i16,
}

impl NewCommand {
    pub fn new(device_id: i32, network_id: i32, kind: MessageKind) -> Self {
        Self {
            device_id,
            origin_device_id: None,
            network_id,
            kind,
            priority: CommandPriority::default(),
            payload: None,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

/// Wire descriptor handed to a polling relay
///
/// `board_id` names the target unit the relay must forward the instruction
/// to over the radio link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandDescriptor {
    pub id: i32,
    pub board_id: String,
    pub kind: MessageKind,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Json>,
}

impl CommandDescriptor {
    pub fn new(command: &CommandModel, board_id: impl Into<String>) -> Self {
        Self {
            id: command.id,
            board_id: board_id.into(),
            kind: command.kind,
            token: command.token.clone(),
            payload: command.payload.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_token_shape() {
        let token = correlation_token();
        assert_eq!(token.len(), 8);
        assert!(token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
    }

    #[test]
    fn test_correlation_tokens_differ() {
        assert_ne!(correlation_token(), correlation_token());
    }
}
