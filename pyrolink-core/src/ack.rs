use pyrolink_error::gateway::AckError;
use pyrolink_models::{
    domain::prelude::{AckAccepted, AckRequest},
    CommandStore,
};
use std::sync::Arc;
use tracing::info;

/// Default failure text when a device reports failure without saying why.
const UNEXPLAINED_FAILURE: &str = "device reported failure";

/// Settles dispatched commands into their terminal state.
pub struct AckHandler {
    commands: Arc<dyn CommandStore>,
}

impl AckHandler {
    pub fn new(commands: Arc<dyn CommandStore>) -> Self {
        Self { commands }
    }

    /// Records a device acknowledgment. A command already in a terminal
    /// state is history and is never overwritten; acknowledging one is a
    /// conflict.
    pub async fn acknowledge(&self, request: &AckRequest) -> Result<AckAccepted, AckError> {
        let command = self
            .commands
            .find_by_id(request.command_id)
            .await?
            .ok_or(AckError::UnknownCommand(request.command_id))?;
        if command.is_terminal() {
            return Err(AckError::AlreadyFinal(command.id));
        }

        let error_text = if request.success {
            None
        } else {
            Some(
                request
                    .error_text
                    .clone()
                    .unwrap_or_else(|| UNEXPLAINED_FAILURE.to_string()),
            )
        };
        let settled = self
            .commands
            .finalize(
                command.id,
                request.success,
                request.response.clone(),
                error_text,
            )
            .await?;
        if !settled {
            // Lost the race against another acknowledgment or the sweeper.
            return Err(AckError::AlreadyFinal(command.id));
        }

        info!(
            command = command.id,
            token = %command.token,
            success = request.success,
            board_id = %request.board_id,
            "command acknowledged"
        );
        Ok(AckAccepted { success: true })
    }
}
