use axum::{
    Json, Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use super::AppState;
use super::handlers::{agent, profile, requests};

fn build_localhost_cors(api_port: u16) -> CorsLayer {
    // The dashboard frontend runs on its own dev port next to the API.
    let origins: Vec<HeaderValue> = [
        format!("http://127.0.0.1:{}", api_port),
        format!("http://localhost:{}", api_port),
        "http://127.0.0.1:3000".to_string(),
        "http://localhost:3000".to_string(),
    ]
    .iter()
    .filter_map(|o| o.parse().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(tower_http::cors::Any)
}

pub fn build_api_router(state: AppState, api_port: u16) -> Router {
    Router::new()
        .route("/health", get(health_endpoint))
        .route(
            "/api/requests",
            get(requests::list_requests_endpoint).post(requests::create_request_endpoint),
        )
        .route(
            "/api/requests/{id}",
            get(requests::get_request_endpoint).delete(requests::delete_request_endpoint),
        )
        .route(
            "/api/profile",
            get(profile::get_profile_endpoint).put(profile::upsert_profile_endpoint),
        )
        .route(
            "/api/agent/requests/{id}/status",
            post(agent::set_status_endpoint),
        )
        .route(
            "/api/agent/requests/{id}/events",
            post(agent::append_event_endpoint),
        )
        .layer(build_localhost_cors(api_port))
        .with_state(state)
}

async fn health_endpoint() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
