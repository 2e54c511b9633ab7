pub mod ack;
pub mod auth;
pub mod dispatch;
pub mod ingest;
pub mod protocol;
pub mod sweep;

// Re-export commonly used types
pub use ack::AckHandler;
pub use auth::{claimed_board_id, AuthGate};
pub use dispatch::Dispatcher;
pub use ingest::{BatteryPolicy, TelemetryIngestor};
pub use protocol::{canonical_message, sign, verify, Operation, ReplayWindow, SIGNATURE_LEN};
pub use sweep::{CommandSweeper, SweepReport};

use pyrolink_models::{settings::Settings, CommandStore, DeviceDirectory, TelemetryStore};
use std::sync::Arc;

/// The assembled dispatch engine: one authentication gate in front of the
/// three request handlers, all sharing the same store handles.
pub struct PyroGateway {
    auth: AuthGate,
    dispatcher: Dispatcher,
    ingestor: TelemetryIngestor,
    acks: AckHandler,
}

impl PyroGateway {
    pub fn new(
        settings: &Settings,
        directory: Arc<dyn DeviceDirectory>,
        commands: Arc<dyn CommandStore>,
        telemetry: Arc<dyn TelemetryStore>,
    ) -> Self {
        Self {
            auth: AuthGate::new(Arc::clone(&directory), &settings.protocol),
            dispatcher: Dispatcher::new(Arc::clone(&directory), Arc::clone(&commands)),
            ingestor: TelemetryIngestor::new(
                directory,
                telemetry,
                BatteryPolicy::new(&settings.battery),
            ),
            acks: AckHandler::new(commands),
        }
    }

    pub fn auth(&self) -> &AuthGate {
        &self.auth
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn ingestor(&self) -> &TelemetryIngestor {
        &self.ingestor
    }

    pub fn acks(&self) -> &AckHandler {
        &self.acks
    }
}
