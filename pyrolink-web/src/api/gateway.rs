//! Device-facing gateway routes.
//!
//! Every route runs the authentication gate before anything else. For the
//! write routes the raw body bytes feed the signature check, so full
//! deserialization is deferred until after admission.

use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use pyrolink_core::{claimed_board_id, Operation};
use pyrolink_error::{web::WebError, WebResult};
use pyrolink_models::{
    constants::{SIGNATURE_HEADER, TIMESTAMP_HEADER},
    domain::prelude::{AckRequest, PollQuery, TelemetryAccepted, TelemetryReport},
};
use std::sync::Arc;

pub(super) const ROUTER_PREFIX: &str = "/gateway";

pub(crate) fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/poll", web::get().to(poll))
        .route("/telemetry", web::post().to(telemetry))
        .route("/ack", web::post().to(ack));
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// A relay asks for its next command. 200 with a descriptor, or 204 when
/// the queue has nothing for it.
pub async fn poll(
    req: HttpRequest,
    query: web::Query<PollQuery>,
    state: web::Data<Arc<AppState>>,
) -> WebResult<HttpResponse> {
    let relay = state
        .gateway
        .auth()
        .authenticate(
            Operation::Poll,
            query.board_id.as_deref(),
            header(&req, TIMESTAMP_HEADER),
            header(&req, SIGNATURE_HEADER),
            None,
        )
        .await?;

    match state.gateway.dispatcher().next_for(&relay).await? {
        Some(descriptor) => Ok(HttpResponse::Ok().json(descriptor)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

/// A relay submits a telemetry report, possibly on behalf of a launcher.
pub async fn telemetry(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<Arc<AppState>>,
) -> WebResult<HttpResponse> {
    let claimed = claimed_board_id(&body);
    let relay = state
        .gateway
        .auth()
        .authenticate(
            Operation::Telemetry,
            claimed.as_deref(),
            header(&req, TIMESTAMP_HEADER),
            header(&req, SIGNATURE_HEADER),
            Some(&body),
        )
        .await?;

    let report: TelemetryReport = serde_json::from_slice(&body)
        .map_err(|err| WebError::BadRequest(format!("malformed telemetry report: {err}")))?;
    let device_id = state.gateway.ingestor().ingest(&relay, &report).await?;

    Ok(HttpResponse::Ok().json(TelemetryAccepted {
        success: true,
        device_id,
    }))
}

/// A relay reports the outcome of a dispatched command.
pub async fn ack(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<Arc<AppState>>,
) -> WebResult<HttpResponse> {
    let claimed = claimed_board_id(&body);
    state
        .gateway
        .auth()
        .authenticate(
            Operation::Ack,
            claimed.as_deref(),
            header(&req, TIMESTAMP_HEADER),
            header(&req, SIGNATURE_HEADER),
            Some(&body),
        )
        .await?;

    let request: AckRequest = serde_json::from_slice(&body)
        .map_err(|err| WebError::BadRequest(format!("malformed acknowledgment: {err}")))?;
    let accepted = state.gateway.acks().acknowledge(&request).await?;

    Ok(HttpResponse::Ok().json(accepted))
}
