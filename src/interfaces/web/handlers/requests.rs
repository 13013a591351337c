use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};

use super::super::AppState;
use super::{caller_id, missing_caller};
use crate::core::board;
use crate::core::dispatch::EscalationPayload;
use crate::core::store::StoreError;
use crate::core::store::types::NewRequest;

pub async fn list_requests_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let Some(user) = caller_id(&headers) else {
        return missing_caller();
    };

    match state.store.list_requests(&user).await {
        Ok(requests) => {
            let board = board::partition(requests);
            Json(serde_json::json!({
                "success": true,
                "board": board
            }))
        }
        Err(err) => Json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
    }
}

#[derive(serde::Deserialize)]
pub struct CreateRequestBody {
    title: String,
    description: String,
    callback_number: String,
    number_to_call: Option<String>,
    preferred_time: String,
}

pub async fn create_request_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateRequestBody>,
) -> Json<serde_json::Value> {
    let Some(user) = caller_id(&headers) else {
        return missing_caller();
    };

    let title = payload.title.trim().to_string();
    let description = payload.description.trim().to_string();
    let preferred_time = payload.preferred_time.trim().to_string();
    if title.is_empty() || description.is_empty() || preferred_time.is_empty() {
        return Json(serde_json::json!({
            "success": false,
            "error": "title, description, and preferred_time are required"
        }));
    }

    let fields = NewRequest {
        title,
        description,
        callback_number: payload.callback_number.trim().to_string(),
        number_to_call: payload
            .number_to_call
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        preferred_time,
    };

    let request = match state.store.create_request(&user, fields).await {
        Ok(request) => request,
        Err(err) => {
            return Json(serde_json::json!({
                "success": false,
                "error": err.to_string()
            }));
        }
    };

    // The request exists and is valid at this point; the hand-off to the
    // agent rides in the background and can only log its own failure.
    let profile = state.store.get_profile(&user).await.ok().flatten();
    let escalation = EscalationPayload::for_request(&request, profile);
    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        dispatcher.notify(escalation).await;
    });

    Json(serde_json::json!({
        "success": true,
        "request": request
    }))
}

pub async fn get_request_endpoint(
    Path(id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let Some(user) = caller_id(&headers) else {
        return missing_caller();
    };

    let request = match state.store.get_request(&id, &user).await {
        Ok(request) => request,
        Err(StoreError::NotFound) => {
            return Json(serde_json::json!({
                "success": false,
                "error": "Request not found"
            }));
        }
        Err(err) => {
            return Json(serde_json::json!({
                "success": false,
                "error": err.to_string()
            }));
        }
    };

    let events = match state.store.list_events(&id).await {
        Ok(events) => events,
        Err(err) => {
            return Json(serde_json::json!({
                "success": false,
                "error": err.to_string()
            }));
        }
    };

    // An out-of-set status is reported as a data error alongside the raw
    // value instead of being mapped to some default presentation.
    let (presentation, status_error) = match request.status.known() {
        Some(status) => (
            serde_json::to_value(status.presentation()).unwrap_or_default(),
            serde_json::Value::Null,
        ),
        None => (
            serde_json::Value::Null,
            serde_json::json!(format!(
                "unknown request status '{}'",
                request.status.as_str()
            )),
        ),
    };

    Json(serde_json::json!({
        "success": true,
        "request": request,
        "events": events,
        "presentation": presentation,
        "status_error": status_error
    }))
}

pub async fn delete_request_endpoint(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let Some(user) = caller_id(&headers) else {
        return missing_caller();
    };

    // Irreversible, so the confirm step is part of the API contract.
    let confirmed = params.get("confirm").map(String::as_str) == Some("true");
    if !confirmed {
        return Json(serde_json::json!({
            "success": false,
            "confirm_required": true,
            "error": "deletion requires confirm=true"
        }));
    }

    match state.store.delete_request(&id, &user).await {
        Ok(()) => Json(serde_json::json!({ "success": true })),
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
