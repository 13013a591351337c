mod events;
mod profiles;
mod requests;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::info;

use self::types::{Event, NewRequest, Profile, Request};
use crate::core::status::RequestStatus;

/// Failure taxonomy for store operations. A row that exists but belongs to a
/// different owner is reported as `NotFound` on reads, so callers can never
/// learn that another user's request id exists.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("store unavailable: {0}")]
    Transport(#[from] rusqlite::Error),
    #[error("data integrity: unknown request status '{0}'")]
    Integrity(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Boundary through which requests, events, and profiles are read and
/// written. Owns no business logic; every call is independently failable.
#[async_trait]
pub trait StoreClient: Send + Sync {
    /// Fetch one request. Ownership is part of the lookup predicate, not a
    /// post-fetch check.
    async fn get_request(&self, id: &str, owner_id: &str) -> StoreResult<Request>;

    /// All of one owner's requests, most recently updated first.
    async fn list_requests(&self, owner_id: &str) -> StoreResult<Vec<Request>>;

    /// Persist a new request with status forced to `queued`.
    async fn create_request(&self, owner_id: &str, fields: NewRequest) -> StoreResult<Request>;

    /// Hard delete, owner-guarded. Events of the request go with it.
    async fn delete_request(&self, id: &str, owner_id: &str) -> StoreResult<()>;

    /// Full event log for a request, newest first. Empty is a valid result.
    async fn list_events(&self, request_id: &str) -> StoreResult<Vec<Event>>;

    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<Profile>>;

    async fn upsert_profile(&self, profile: &Profile) -> StoreResult<()>;

    /// Agent-side write: replace status (and optionally summary) and bump
    /// `updated_at`. No transition validation on purpose.
    async fn set_status(
        &self,
        request_id: &str,
        status: RequestStatus,
        summary: Option<&str>,
    ) -> StoreResult<()>;

    /// Agent-side write: append one immutable timeline entry.
    async fn append_event(
        &self,
        request_id: &str,
        event_type: &str,
        message: &str,
    ) -> StoreResult<Event>;
}

/// SQLite-backed store. The connection is shared behind a tokio mutex; every
/// operation locks, runs its statement, and releases.
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).await?;
        }

        let db_path = data_dir.join("callboard.db");
        let db = Connection::open(&db_path)?;
        Self::init_schema(&db)?;
        info!("store opened at {}", db_path.display());

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    /// In-memory store, used by tests and throwaway sessions.
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory()?;
        Self::init_schema(&db)?;
        Ok(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }

    fn init_schema(db: &Connection) -> rusqlite::Result<()> {
        db.execute(
            "CREATE TABLE IF NOT EXISTS requests (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                callback_number TEXT NOT NULL,
                number_to_call TEXT,
                preferred_time TEXT NOT NULL,
                status TEXT NOT NULL,
                summary TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        db.execute(
            "CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                request_id TEXT NOT NULL,
                type TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        db.execute(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                username TEXT NOT NULL,
                default_callback_number TEXT NOT NULL,
                street TEXT NOT NULL,
                house_number TEXT NOT NULL,
                postal_code TEXT NOT NULL,
                city TEXT NOT NULL,
                country TEXT NOT NULL,
                calendar_connected INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        Ok(())
    }

    pub(crate) fn db(&self) -> Arc<Mutex<Connection>> {
        self.db.clone()
    }
}

#[async_trait]
impl StoreClient for SqliteStore {
    async fn get_request(&self, id: &str, owner_id: &str) -> StoreResult<Request> {
        self.get_request_row(id, owner_id).await
    }

    async fn list_requests(&self, owner_id: &str) -> StoreResult<Vec<Request>> {
        self.list_request_rows(owner_id).await
    }

    async fn create_request(&self, owner_id: &str, fields: NewRequest) -> StoreResult<Request> {
        self.insert_request(owner_id, fields).await
    }

    async fn delete_request(&self, id: &str, owner_id: &str) -> StoreResult<()> {
        self.delete_request_row(id, owner_id).await
    }

    async fn list_events(&self, request_id: &str) -> StoreResult<Vec<Event>> {
        self.list_event_rows(request_id).await
    }

    async fn get_profile(&self, user_id: &str) -> StoreResult<Option<Profile>> {
        self.get_profile_row(user_id).await
    }

    async fn upsert_profile(&self, profile: &Profile) -> StoreResult<()> {
        self.upsert_profile_row(profile).await
    }

    async fn set_status(
        &self,
        request_id: &str,
        status: RequestStatus,
        summary: Option<&str>,
    ) -> StoreResult<()> {
        self.update_status(request_id, status, summary).await
    }

    async fn append_event(
        &self,
        request_id: &str,
        event_type: &str,
        message: &str,
    ) -> StoreResult<Event> {
        self.insert_event(request_id, event_type, message).await
    }
}
