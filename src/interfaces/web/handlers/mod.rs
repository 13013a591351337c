pub mod agent;
pub mod profile;
pub mod requests;

use axum::Json;
use axum::http::HeaderMap;

/// Caller identity, as established by the external auth layer in front of
/// this API. Absence means the request never went through it.
pub(crate) fn caller_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
}

pub(crate) fn missing_caller() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": false,
        "error": "missing x-user-id header"
    }))
}
