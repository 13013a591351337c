//! Callback surface for the calling agent. The agent is trusted
//! infrastructure: no ownership predicate and, deliberately, no transition
//! validation on the status it reports.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::info;

use super::super::AppState;
use crate::core::status::RequestStatus;
use crate::core::store::StoreError;

#[derive(serde::Deserialize)]
pub struct StatusUpdateBody {
    status: String,
    summary: Option<String>,
}

pub async fn set_status_endpoint(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<StatusUpdateBody>,
) -> Json<serde_json::Value> {
    let status = match RequestStatus::parse(&payload.status) {
        Ok(status) => status,
        Err(_) => {
            let err = StoreError::Integrity(payload.status.clone());
            return Json(serde_json::json!({
                "success": false,
                "error": err.to_string()
            }));
        }
    };

    match state
        .store
        .set_status(&id, status, payload.summary.as_deref())
        .await
    {
        Ok(()) => {
            info!(request_id = %id, status = %status, "agent reported status");
            Json(serde_json::json!({ "success": true }))
        }
        Err(StoreError::NotFound) => Json(serde_json::json!({
            "success": false,
            "error": "Request not found"
        })),
        Err(err) => Json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
    }
}

#[derive(serde::Deserialize)]
pub struct AppendEventBody {
    #[serde(rename = "type")]
    event_type: String,
    message: String,
}

pub async fn append_event_endpoint(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<AppendEventBody>,
) -> Json<serde_json::Value> {
    let event_type = payload.event_type.trim().to_string();
    if event_type.is_empty() {
        return Json(serde_json::json!({
            "success": false,
            "error": "type is required"
        }));
    }

    match state
        .store
        .append_event(&id, &event_type, payload.message.trim())
        .await
    {
        Ok(event) => Json(serde_json::json!({
            "success": true,
            "event": event
        })),
        Err(err) => Json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
    }
}
