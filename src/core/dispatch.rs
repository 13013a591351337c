use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, Local, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::store::types::{Profile, Request};

/// Payload handed to the agent boundary when a freshly created request is
/// escalated for processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationPayload {
    pub request_id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub callback_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_to_call: Option<String>,
    pub preferred_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<Profile>,
}

impl EscalationPayload {
    pub fn for_request(request: &Request, profile: Option<Profile>) -> Self {
        Self {
            request_id: request.id.clone(),
            user_id: request.user_id.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            callback_number: request.callback_number.clone(),
            number_to_call: request.number_to_call.clone(),
            preferred_time: request.preferred_time.clone(),
            user_profile: profile,
        }
    }
}

/// The external agent's intake. Opaque: it acknowledges the hand-off and
/// everything after that happens through the store.
#[async_trait]
pub trait AgentBoundary: Send + Sync {
    async fn process_request(&self, payload: &EscalationPayload) -> Result<()>;
}

/// HTTP implementation posting to the agent backend's intake endpoint.
pub struct HttpAgentBoundary {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAgentBoundary {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/process-request", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl AgentBoundary for HttpAgentBoundary {
    async fn process_request(&self, payload: &EscalationPayload) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("POST {}", self.endpoint))?;
        response.error_for_status()?;
        Ok(())
    }
}

/// Fire-and-forget hand-off policy. `notify` cannot fail from the caller's
/// perspective: a delivery error is logged and counted, nothing more. The
/// request already exists and is valid without the hand-off; there is no
/// retry here, reliability has to live behind the boundary if it is needed.
pub struct EscalationDispatcher {
    boundary: Arc<dyn AgentBoundary>,
    failures: AtomicU64,
}

impl EscalationDispatcher {
    pub fn new(boundary: Arc<dyn AgentBoundary>) -> Self {
        Self {
            boundary,
            failures: AtomicU64::new(0),
        }
    }

    pub async fn notify(&self, payload: EscalationPayload) {
        if !is_business_hours(Local::now()) {
            info!(
                request_id = %payload.request_id,
                resume_at = %next_business_start(Local::now()),
                "escalating outside business hours, agent will defer the call"
            );
        }

        if let Err(err) = self.boundary.process_request(&payload).await {
            self.failures.fetch_add(1, Ordering::Relaxed);
            warn!(
                request_id = %payload.request_id,
                error = %err,
                "agent escalation failed, request stays queued"
            );
        }
    }

    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

const BUSINESS_OPEN_HOUR: u32 = 8;
const BUSINESS_CLOSE_HOUR: u32 = 18;

/// Mon-Fri, 08:00-18:00 local time.
pub fn is_business_hours(now: DateTime<Local>) -> bool {
    if now.weekday().number_from_monday() > 5 {
        return false;
    }
    now.hour() >= BUSINESS_OPEN_HOUR && now.hour() < BUSINESS_CLOSE_HOUR
}

/// The next moment the agent is expected to start dialing.
pub fn next_business_start(now: DateTime<Local>) -> DateTime<Local> {
    let open = NaiveTime::from_hms_opt(BUSINESS_OPEN_HOUR, 0, 0).expect("valid opening time");

    if now.weekday().number_from_monday() > 5 {
        let days_until_monday = 8 - now.weekday().number_from_monday();
        let monday = now.date_naive() + ChronoDuration::days(days_until_monday as i64);
        return localize(monday.and_time(open), now);
    }

    if now.hour() < BUSINESS_OPEN_HOUR {
        return localize(now.date_naive().and_time(open), now);
    }

    if now.hour() >= BUSINESS_CLOSE_HOUR {
        let mut next_day = now.date_naive() + ChronoDuration::days(1);
        while next_day.weekday().number_from_monday() > 5 {
            next_day += ChronoDuration::days(1);
        }
        return localize(next_day.and_time(open), now);
    }

    now
}

fn localize(naive: chrono::NaiveDateTime, reference: DateTime<Local>) -> DateTime<Local> {
    naive
        .and_local_timezone(Local)
        .single()
        .unwrap_or(reference)
}
