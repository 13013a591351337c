mod handlers;
mod router;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::core::dispatch::EscalationDispatcher;
use crate::core::store::StoreClient;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) store: Arc<dyn StoreClient>,
    pub(crate) dispatcher: Arc<EscalationDispatcher>,
}

pub struct ApiServer {
    store: Arc<dyn StoreClient>,
    dispatcher: Arc<EscalationDispatcher>,
    api_host: String,
    api_port: u16,
}

impl ApiServer {
    pub fn new(
        store: Arc<dyn StoreClient>,
        dispatcher: Arc<EscalationDispatcher>,
        api_host: String,
        api_port: u16,
    ) -> Self {
        Self {
            store,
            dispatcher,
            api_host,
            api_port,
        }
    }

    pub async fn serve(self) -> Result<()> {
        let state = AppState {
            store: self.store,
            dispatcher: self.dispatcher,
        };
        let app = router::build_api_router(state, self.api_port);

        let listener =
            tokio::net::TcpListener::bind(format!("{}:{}", self.api_host, self.api_port)).await?;
        info!(
            "callboard API listening on http://{}:{}",
            self.api_host, self.api_port
        );
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::core::dispatch::{AgentBoundary, EscalationPayload};
    use crate::core::store::SqliteStore;

    struct NullBoundary {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl AgentBoundary for NullBoundary {
        async fn process_request(&self, _payload: &EscalationPayload) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("agent backend down");
            }
            Ok(())
        }
    }

    fn test_app(fail_dispatch: bool) -> (Router, Arc<EscalationDispatcher>) {
        let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory store"));
        let dispatcher = Arc::new(EscalationDispatcher::new(Arc::new(NullBoundary {
            fail: fail_dispatch,
        })));
        let state = AppState {
            store,
            dispatcher: dispatcher.clone(),
        };
        (router::build_api_router(state, 0), dispatcher)
    }

    async fn send(app: &Router, method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Value {
        let mut builder = HttpRequest::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header("x-user-id", user);
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = app.clone().oneshot(request).await.expect("send request");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn dentist_body() -> Value {
        json!({
            "title": "Dentist",
            "description": "Book a checkup",
            "callback_number": "+4915112345678",
            "preferred_time": "weekday mornings"
        })
    }

    #[tokio::test]
    async fn requests_require_a_caller_id() {
        let (app, _) = test_app(false);
        let body = send(&app, "GET", "/api/requests", None, None).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("x-user-id"));
    }

    #[tokio::test]
    async fn created_request_appears_in_the_open_column() {
        let (app, _) = test_app(false);

        let created = send(&app, "POST", "/api/requests", Some("user-1"), Some(dentist_body())).await;
        assert_eq!(created["success"], true);
        assert_eq!(created["request"]["status"], "queued");

        let listed = send(&app, "GET", "/api/requests", Some("user-1"), None).await;
        assert_eq!(listed["success"], true);
        assert_eq!(listed["board"]["open"].as_array().unwrap().len(), 1);
        assert!(listed["board"]["in_progress"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn creation_rejects_blank_required_fields() {
        let (app, _) = test_app(false);
        let body = send(
            &app,
            "POST",
            "/api/requests",
            Some("user-1"),
            Some(json!({
                "title": "  ",
                "description": "x",
                "callback_number": "",
                "preferred_time": "soon"
            })),
        )
        .await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn creation_succeeds_even_when_escalation_fails() {
        let (app, dispatcher) = test_app(true);

        let created = send(&app, "POST", "/api/requests", Some("user-1"), Some(dentist_body())).await;
        assert_eq!(created["success"], true);

        // The spawned hand-off runs in the background; give it a moment and
        // verify it failed quietly.
        for _ in 0..100 {
            if dispatcher.failure_count() > 0 {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
        assert_eq!(dispatcher.failure_count(), 1);

        let listed = send(&app, "GET", "/api/requests", Some("user-1"), None).await;
        assert_eq!(listed["board"]["open"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn detail_view_is_owner_scoped() {
        let (app, _) = test_app(false);
        let created = send(&app, "POST", "/api/requests", Some("user-1"), Some(dentist_body())).await;
        let id = created["request"]["id"].as_str().unwrap().to_string();

        let own = send(&app, "GET", &format!("/api/requests/{id}"), Some("user-1"), None).await;
        assert_eq!(own["success"], true);
        assert_eq!(own["presentation"]["label"], "Queued");

        let other = send(&app, "GET", &format!("/api/requests/{id}"), Some("user-2"), None).await;
        assert_eq!(other["success"], false);
        assert_eq!(other["error"], "Request not found");
    }

    #[tokio::test]
    async fn agent_updates_move_the_request_and_grow_the_timeline() {
        let (app, _) = test_app(false);
        let created = send(&app, "POST", "/api/requests", Some("user-1"), Some(dentist_body())).await;
        let id = created["request"]["id"].as_str().unwrap().to_string();

        let status = send(
            &app,
            "POST",
            &format!("/api/agent/requests/{id}/status"),
            None,
            Some(json!({ "status": "calling" })),
        )
        .await;
        assert_eq!(status["success"], true);

        let event = send(
            &app,
            "POST",
            &format!("/api/agent/requests/{id}/events"),
            None,
            Some(json!({ "type": "call_started", "message": "Calling now" })),
        )
        .await;
        assert_eq!(event["success"], true);

        let detail = send(&app, "GET", &format!("/api/requests/{id}"), Some("user-1"), None).await;
        assert_eq!(detail["request"]["status"], "calling");
        assert_eq!(detail["events"][0]["type"], "call_started");
        assert_eq!(detail["presentation"]["label"], "Calling");

        let listed = send(&app, "GET", "/api/requests", Some("user-1"), None).await;
        assert_eq!(listed["board"]["in_progress"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn agent_booking_shows_summary_in_completed_column() {
        let (app, _) = test_app(false);
        let created = send(&app, "POST", "/api/requests", Some("user-1"), Some(dentist_body())).await;
        let id = created["request"]["id"].as_str().unwrap().to_string();

        send(
            &app,
            "POST",
            &format!("/api/agent/requests/{id}/status"),
            None,
            Some(json!({
                "status": "booked",
                "summary": "Appointment confirmed for Tue 10am"
            })),
        )
        .await;

        let detail = send(&app, "GET", &format!("/api/requests/{id}"), Some("user-1"), None).await;
        assert_eq!(
            detail["request"]["summary"],
            "Appointment confirmed for Tue 10am"
        );

        let listed = send(&app, "GET", "/api/requests", Some("user-1"), None).await;
        assert_eq!(listed["board"]["completed"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn agent_cannot_write_an_out_of_set_status() {
        let (app, _) = test_app(false);
        let created = send(&app, "POST", "/api/requests", Some("user-1"), Some(dentist_body())).await;
        let id = created["request"]["id"].as_str().unwrap().to_string();

        let body = send(
            &app,
            "POST",
            &format!("/api/agent/requests/{id}/status"),
            None,
            Some(json!({ "status": "on_hold" })),
        )
        .await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("unknown request status"));
    }

    #[tokio::test]
    async fn deletion_needs_explicit_confirmation() {
        let (app, _) = test_app(false);
        let created = send(&app, "POST", "/api/requests", Some("user-1"), Some(dentist_body())).await;
        let id = created["request"]["id"].as_str().unwrap().to_string();

        let refused = send(&app, "DELETE", &format!("/api/requests/{id}"), Some("user-1"), None).await;
        assert_eq!(refused["success"], false);
        assert_eq!(refused["confirm_required"], true);

        // The request is untouched after the refused attempt.
        let detail = send(&app, "GET", &format!("/api/requests/{id}"), Some("user-1"), None).await;
        assert_eq!(detail["success"], true);

        let deleted = send(
            &app,
            "DELETE",
            &format!("/api/requests/{id}?confirm=true"),
            Some("user-1"),
            None,
        )
        .await;
        assert_eq!(deleted["success"], true);

        let gone = send(&app, "GET", &format!("/api/requests/{id}"), Some("user-1"), None).await;
        assert_eq!(gone["error"], "Request not found");
    }

    #[tokio::test]
    async fn deletion_is_owner_guarded() {
        let (app, _) = test_app(false);
        let created = send(&app, "POST", "/api/requests", Some("user-1"), Some(dentist_body())).await;
        let id = created["request"]["id"].as_str().unwrap().to_string();

        let denied = send(
            &app,
            "DELETE",
            &format!("/api/requests/{id}?confirm=true"),
            Some("user-2"),
            None,
        )
        .await;
        assert_eq!(denied["success"], false);

        let still_there = send(&app, "GET", &format!("/api/requests/{id}"), Some("user-1"), None).await;
        assert_eq!(still_there["success"], true);
    }

    #[tokio::test]
    async fn profile_roundtrips_through_upsert() {
        let (app, _) = test_app(false);

        let empty = send(&app, "GET", "/api/profile", Some("user-1"), None).await;
        assert_eq!(empty["success"], true);
        assert!(empty["profile"].is_null());

        let saved = send(
            &app,
            "PUT",
            "/api/profile",
            Some("user-1"),
            Some(json!({
                "username": "ada",
                "default_callback_number": "+4915112345678",
                "city": "Berlin",
                "country": "Germany"
            })),
        )
        .await;
        assert_eq!(saved["success"], true);

        let read = send(&app, "GET", "/api/profile", Some("user-1"), None).await;
        assert_eq!(read["profile"]["username"], "ada");
        assert_eq!(read["profile"]["city"], "Berlin");
        assert_eq!(read["profile"]["calendar_connected"], false);
    }

    #[tokio::test]
    async fn health_endpoint_answers() {
        let (app, _) = test_app(false);
        let body = send(&app, "GET", "/health", None, None).await;
        assert_eq!(body["status"], "ok");
    }
}
