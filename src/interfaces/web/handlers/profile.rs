use axum::{Json, extract::State, http::HeaderMap};

use super::super::AppState;
use super::{caller_id, missing_caller};
use crate::core::store::types::Profile;

pub async fn get_profile_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let Some(user) = caller_id(&headers) else {
        return missing_caller();
    };

    match state.store.get_profile(&user).await {
        Ok(profile) => Json(serde_json::json!({
            "success": true,
            "profile": profile
        })),
        Err(err) => Json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
    }
}

#[derive(serde::Deserialize)]
pub struct UpsertProfileBody {
    username: String,
    default_callback_number: String,
    #[serde(default)]
    street: String,
    #[serde(default)]
    house_number: String,
    #[serde(default)]
    postal_code: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    calendar_connected: bool,
}

pub async fn upsert_profile_endpoint(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpsertProfileBody>,
) -> Json<serde_json::Value> {
    let Some(user) = caller_id(&headers) else {
        return missing_caller();
    };

    // The caller id is the upsert key; a body cannot write someone else's
    // profile.
    let profile = Profile {
        user_id: user,
        username: payload.username.trim().to_string(),
        default_callback_number: payload.default_callback_number.trim().to_string(),
        street: payload.street,
        house_number: payload.house_number,
        postal_code: payload.postal_code,
        city: payload.city,
        country: payload.country,
        calendar_connected: payload.calendar_connected,
    };

    match state.store.upsert_profile(&profile).await {
        Ok(()) => Json(serde_json::json!({
            "success": true,
            "profile": profile
        })),
        Err(err) => Json(serde_json::json!({
            "success": false,
            "error": err.to_string()
        })),
    }
}
