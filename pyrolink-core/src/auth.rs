use crate::protocol::{canonical_message, verify, Operation, ReplayWindow};
use chrono::Utc;
use pyrolink_error::auth::AuthError;
use pyrolink_models::{entities::prelude::DeviceModel, settings::Protocol, DeviceDirectory};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

/// Admission control for every gateway request.
///
/// Resolves the claimed sender against the directory and proves possession
/// of its secret before any handler runs. Rejection kinds stay distinct in
/// the logs; the HTTP layer collapses them so the wire leaks nothing about
/// which step failed.
pub struct AuthGate {
    directory: Arc<dyn DeviceDirectory>,
    window: ReplayWindow,
}

impl AuthGate {
    pub fn new(directory: Arc<dyn DeviceDirectory>, protocol: &Protocol) -> Self {
        Self {
            directory,
            window: ReplayWindow::new(protocol),
        }
    }

    /// Runs the admission sequence and resolves the sending device.
    ///
    /// `timestamp` and `signature` are raw header values. `board_id` is the
    /// claimed sender: the query parameter for poll, the body `boardId`
    /// field for write operations. `body` is the exact request bytes for
    /// write operations; they are verified as received.
    pub async fn authenticate(
        &self,
        operation: Operation,
        board_id: Option<&str>,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: Option<&[u8]>,
    ) -> Result<DeviceModel, AuthError> {
        match self
            .admit(operation, board_id, timestamp, signature, body)
            .await
        {
            Ok(device) => Ok(device),
            Err(err) => {
                warn!(
                    kind = err.kind(),
                    operation = operation.as_str(),
                    board_id = board_id.unwrap_or("-"),
                    "gateway request rejected"
                );
                Err(err)
            }
        }
    }

    async fn admit(
        &self,
        operation: Operation,
        board_id: Option<&str>,
        timestamp: Option<&str>,
        signature: Option<&str>,
        body: Option<&[u8]>,
    ) -> Result<DeviceModel, AuthError> {
        let (Some(timestamp), Some(signature)) = (timestamp, signature) else {
            return Err(AuthError::MissingCredentials);
        };
        self.window.check(timestamp, Utc::now())?;

        let board_id = board_id.ok_or(AuthError::MissingBoardId)?;
        let device = self
            .directory
            .find_by_board_id(board_id)
            .await?
            .ok_or_else(|| AuthError::UnknownDevice(board_id.to_string()))?;
        // A discovered-but-unprovisioned device cannot authenticate yet.
        let Some(secret) = device.secret.as_deref().filter(|s| !s.is_empty()) else {
            return Err(AuthError::NotProvisioned(board_id.to_string()));
        };

        let message = canonical_message(&device.board_id, timestamp, operation, body);
        if !verify(secret, &message, signature) {
            return Err(AuthError::BadSignature);
        }
        Ok(device)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoardIdProbe {
    board_id: Option<String>,
}

/// Pulls the claimed `boardId` out of a write request body without
/// committing to the full payload shape. Full deserialization happens only
/// after the gate admits the request.
pub fn claimed_board_id(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<BoardIdProbe>(body)
        .ok()
        .and_then(|probe| probe.board_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::sign;
    use async_trait::async_trait;
    use pyrolink_error::{storage::StorageError, PyroResult};
    use pyrolink_models::{
        domain::prelude::{DevicePatch, NewDevice},
        enums::device::{DeviceKind, DeviceStatus},
    };

    const BOARD: &str = "100000000001";
    const SECRET: &str = "unit-test-secret";

    struct OneDeviceDirectory {
        device: DeviceModel,
    }

    #[async_trait]
    impl DeviceDirectory for OneDeviceDirectory {
        async fn find_by_board_id(
            &self,
            board_id: &str,
        ) -> PyroResult<Option<DeviceModel>, StorageError> {
            Ok((board_id == self.device.board_id).then(|| self.device.clone()))
        }

        async fn find_by_id(&self, id: i32) -> PyroResult<Option<DeviceModel>, StorageError> {
            Ok((id == self.device.id).then(|| self.device.clone()))
        }

        async fn create(&self, _device: NewDevice) -> PyroResult<DeviceModel, StorageError> {
            Err(StorageError::StorageUnavailable)
        }

        async fn update(
            &self,
            _id: i32,
            _patch: DevicePatch,
        ) -> PyroResult<DeviceModel, StorageError> {
            Ok(self.device.clone())
        }
    }

    fn relay(secret: Option<&str>) -> DeviceModel {
        DeviceModel {
            id: 1,
            board_id: BOARD.into(),
            name: None,
            kind: DeviceKind::BaseStation,
            status: DeviceStatus::Online,
            network_id: 1,
            latitude: None,
            longitude: None,
            altitude: None,
            battery_voltage: None,
            battery_percent: None,
            signal_strength: None,
            last_seen_at: None,
            last_polled_at: None,
            secret: secret.map(Into::into),
            metadata: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn gate(secret: Option<&str>) -> AuthGate {
        AuthGate::new(
            Arc::new(OneDeviceDirectory {
                device: relay(secret),
            }),
            &Protocol::default(),
        )
    }

    fn now_epoch() -> String {
        Utc::now().timestamp().to_string()
    }

    fn sign_poll(timestamp: &str) -> String {
        let message = canonical_message(BOARD, timestamp, Operation::Poll, None);
        sign(SECRET, &message).unwrap()
    }

    #[tokio::test]
    async fn test_signed_poll_resolves_device() {
        let timestamp = now_epoch();
        let signature = sign_poll(&timestamp);
        let device = gate(Some(SECRET))
            .authenticate(
                Operation::Poll,
                Some(BOARD),
                Some(&timestamp),
                Some(&signature),
                None,
            )
            .await
            .unwrap();
        assert_eq!(device.board_id, BOARD);
    }

    #[tokio::test]
    async fn test_missing_headers_rejected_first() {
        let timestamp = now_epoch();
        let signature = sign_poll(&timestamp);
        let gate = gate(Some(SECRET));

        let err = gate
            .authenticate(Operation::Poll, Some(BOARD), None, Some(&signature), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));

        let err = gate
            .authenticate(Operation::Poll, Some(BOARD), Some(&timestamp), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_replayed_timestamp_rejected_before_lookup() {
        let stale = (Utc::now().timestamp() - 301).to_string();
        let signature = sign_poll(&stale);
        let err = gate(Some(SECRET))
            .authenticate(
                Operation::Poll,
                Some(BOARD),
                Some(&stale),
                Some(&signature),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::StaleTimestamp));
    }

    #[tokio::test]
    async fn test_missing_board_id_is_distinct() {
        let timestamp = now_epoch();
        let signature = sign_poll(&timestamp);
        let err = gate(Some(SECRET))
            .authenticate(
                Operation::Poll,
                None,
                Some(&timestamp),
                Some(&signature),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingBoardId));
    }

    #[tokio::test]
    async fn test_unknown_and_unprovisioned_devices() {
        let timestamp = now_epoch();
        let signature = sign_poll(&timestamp);

        let err = gate(Some(SECRET))
            .authenticate(
                Operation::Poll,
                Some("999999999999"),
                Some(&timestamp),
                Some(&signature),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownDevice(_)));

        let err = gate(None)
            .authenticate(
                Operation::Poll,
                Some(BOARD),
                Some(&timestamp),
                Some(&signature),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotProvisioned(_)));
    }

    #[tokio::test]
    async fn test_body_bytes_are_bound_to_the_signature() {
        let timestamp = now_epoch();
        let body = br#"{"boardId":"100000000001","commandId":7,"success":true}"#;
        let message = canonical_message(BOARD, &timestamp, Operation::Ack, Some(body));
        let signature = sign(SECRET, &message).unwrap();
        let gate = gate(Some(SECRET));

        let device = gate
            .authenticate(
                Operation::Ack,
                Some(BOARD),
                Some(&timestamp),
                Some(&signature),
                Some(body),
            )
            .await
            .unwrap();
        assert_eq!(device.id, 1);

        let flipped = br#"{"boardId":"100000000001","commandId":7,"success":false}"#;
        let err = gate
            .authenticate(
                Operation::Ack,
                Some(BOARD),
                Some(&timestamp),
                Some(&signature),
                Some(flipped),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::BadSignature));
    }

    #[tokio::test]
    async fn test_signature_from_wrong_secret_rejected() {
        let timestamp = now_epoch();
        let message = canonical_message(BOARD, &timestamp, Operation::Poll, None);
        let signature = sign("not-the-provisioned-secret", &message).unwrap();
        let err = gate(Some(SECRET))
            .authenticate(
                Operation::Poll,
                Some(BOARD),
                Some(&timestamp),
                Some(&signature),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::BadSignature));
    }

    #[test]
    fn test_claimed_board_id_probe() {
        assert_eq!(
            claimed_board_id(br#"{"boardId":"100000000001","success":true}"#),
            Some("100000000001".to_string())
        );
        assert_eq!(claimed_board_id(br#"{"success":true}"#), None);
        assert_eq!(claimed_board_id(b"not json"), None);
    }
}
