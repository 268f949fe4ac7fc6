use crate::AppState;
use crate::models::TransferEvent;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::{error, info};

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Receives a storage-object notification and relays the object.
///
/// Always answers `200 OK`: failures are logged and never reported back, so
/// the platform does not redeliver. The body is parsed as JSON whatever its
/// content type, and an unreadable payload is logged and dropped.
pub async fn receive_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let ce_id = header(&headers, "ce-id");
    let ce_type = header(&headers, "ce-type");

    let event = match Json::<TransferEvent>::from_bytes(&body) {
        Ok(Json(event)) => event,
        Err(e) => {
            error!(
                ce_id = %ce_id,
                ce_type = %ce_type,
                "❌ Dropping unreadable event ({} bytes): {}",
                body.len(),
                e.body_text()
            );
            return StatusCode::OK;
        }
    };

    info!(
        ce_id = %ce_id,
        ce_type = %ce_type,
        "📨 Received event: bucket={} name={}",
        event.bucket,
        event.name
    );

    state.relay.relay(&event).await;

    StatusCode::OK
}
