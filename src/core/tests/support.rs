use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::status::{RequestStatus, StatusValue};
use crate::core::store::types::{Event, NewRequest, Profile, Request};
use crate::core::store::{StoreClient, StoreError, StoreResult};

pub fn sample_request(id: &str, owner: &str, status: RequestStatus) -> Request {
    Request {
        id: id.to_string(),
        user_id: owner.to_string(),
        title: "Dentist".to_string(),
        description: "Checkup appointment".to_string(),
        callback_number: "+4915112345678".to_string(),
        number_to_call: None,
        preferred_time: "weekday mornings".to_string(),
        status: StatusValue::Known(status),
        summary: None,
        created_at: "2026-08-25 09:00:00".to_string(),
        updated_at: "2026-08-25 09:00:00".to_string(),
    }
}

pub fn sample_event(request_id: &str, event_type: &str, message: &str) -> Event {
    Event {
        id: Uuid::new_v4().to_string(),
        request_id: request_id.to_string(),
        event_type: event_type.to_string(),
        message: message.to_string(),
        created_at: "2026-08-25 09:00:01".to_string(),
    }
}

pub fn transport_outage() -> StoreError {
    StoreError::Transport(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
        Some("simulated outage".to_string()),
    ))
}

/// Scripted store for sync-loop tests: one canonical request plus knobs for
/// failure injection and slow reads.
pub struct MockStore {
    request: Mutex<Option<Request>>,
    events: Mutex<Vec<Event>>,
    fail_reads: AtomicBool,
    read_delay: Mutex<Option<Duration>>,
    fetches: AtomicU64,
}

impl MockStore {
    pub fn new(request: Option<Request>) -> Arc<Self> {
        Arc::new(Self {
            request: Mutex::new(request),
            events: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            read_delay: Mutex::new(None),
            fetches: AtomicU64::new(0),
        })
    }

    pub async fn set_request(&self, request: Request) {
        *self.request.lock().await = Some(request);
    }

    pub async fn push_event(&self, event: Event) {
        // Newest first, like the real store's ORDER BY.
        self.events.lock().await.insert(0, event);
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }

    pub async fn set_read_delay(&self, delay: Option<Duration>) {
        *self.read_delay.lock().await = delay;
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreClient for MockStore {
    async fn get_request(&self, id: &str, owner_id: &str) -> StoreResult<Request> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.read_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(transport_outage());
        }

        let request = self.request.lock().await.clone();
        match request {
            Some(r) if r.id == id && r.user_id == owner_id => Ok(r),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn list_requests(&self, owner_id: &str) -> StoreResult<Vec<Request>> {
        let request = self.request.lock().await.clone();
        Ok(request
            .into_iter()
            .filter(|r| r.user_id == owner_id)
            .collect())
    }

    async fn create_request(&self, owner_id: &str, fields: NewRequest) -> StoreResult<Request> {
        let request = Request {
            id: Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            title: fields.title,
            description: fields.description,
            callback_number: fields.callback_number,
            number_to_call: fields.number_to_call,
            preferred_time: fields.preferred_time,
            status: StatusValue::Known(RequestStatus::Queued),
            summary: None,
            created_at: "2026-08-25 09:00:00".to_string(),
            updated_at: "2026-08-25 09:00:00".to_string(),
        };
        *self.request.lock().await = Some(request.clone());
        Ok(request)
    }

    async fn delete_request(&self, id: &str, owner_id: &str) -> StoreResult<()> {
        let mut slot = self.request.lock().await;
        match slot.as_ref() {
            Some(r) if r.id == id && r.user_id == owner_id => {
                *slot = None;
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn list_events(&self, request_id: &str) -> StoreResult<Vec<Event>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(transport_outage());
        }
        Ok(self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| e.request_id == request_id)
            .cloned()
            .collect())
    }

    async fn get_profile(&self, _user_id: &str) -> StoreResult<Option<Profile>> {
        Ok(None)
    }

    async fn upsert_profile(&self, _profile: &Profile) -> StoreResult<()> {
        Ok(())
    }

    async fn set_status(
        &self,
        request_id: &str,
        status: RequestStatus,
        summary: Option<&str>,
    ) -> StoreResult<()> {
        let mut slot = self.request.lock().await;
        match slot.as_mut() {
            Some(r) if r.id == request_id => {
                r.status = StatusValue::Known(status);
                if let Some(summary) = summary {
                    r.summary = Some(summary.to_string());
                }
                Ok(())
            }
            _ => Err(StoreError::NotFound),
        }
    }

    async fn append_event(
        &self,
        request_id: &str,
        event_type: &str,
        message: &str,
    ) -> StoreResult<Event> {
        let event = sample_event(request_id, event_type, message);
        self.push_event(event.clone()).await;
        Ok(event)
    }
}
