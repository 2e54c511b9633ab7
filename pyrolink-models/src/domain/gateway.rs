use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use validator::Validate;

/// Poll query string. The board id rides in the query because a poll
/// carries no body.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollQuery {
    pub board_id: Option<String>,
}

/// Acknowledgment submission closing out a dispatched command
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AckRequest {
    #[validate(length(equal = 12))]
    pub board_id: String,
    pub command_id: i32,
    pub success: bool,
    /// Device response stored on the command verbatim
    pub response: Option<Json>,
    pub error_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryAccepted {
    pub success: bool,
    pub device_id: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckAccepted {
    pub success: bool,
}
