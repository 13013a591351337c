use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::store::types::{Event, Request};
use super::store::{StoreClient, StoreError};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// What a viewer of one request currently sees.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// First fetch has not resolved yet.
    Loading,
    /// Steady state; the snapshot is replaced wholesale on every good tick.
    Synced(Snapshot),
    /// The cold-start fetch came back NotFound (missing row or a row owned by
    /// someone else; the two are indistinguishable on purpose).
    NotFound,
    /// The cold-start fetch failed some other way. Only the first load can
    /// put the view here; later tick failures are swallowed.
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub request: Request,
    pub events: Vec<Event>,
}

/// A per-view polling subscription. Each watcher owns its loop task, its
/// cancellation token, and its own snapshot slot, so two watchers never share
/// mutable state and a late response for an old subscription cannot land in a
/// newer one's view.
pub struct RequestWatcher {
    request_id: String,
    state: Arc<Mutex<ViewState>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RequestWatcher {
    pub fn spawn(
        store: Arc<dyn StoreClient>,
        request_id: impl Into<String>,
        owner_id: impl Into<String>,
        interval: Duration,
    ) -> Self {
        let request_id = request_id.into();
        let owner_id = owner_id.into();
        let state = Arc::new(Mutex::new(ViewState::Loading));
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_loop(
            store,
            request_id.clone(),
            owner_id,
            interval,
            state.clone(),
            cancel.clone(),
        ));

        Self {
            request_id,
            state,
            cancel,
            task,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub async fn state(&self) -> ViewState {
        self.state.lock().await.clone()
    }

    /// Cancel the loop. No tick fires after this, and an in-flight fetch that
    /// resolves later is discarded instead of applied.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RequestWatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_loop(
    store: Arc<dyn StoreClient>,
    request_id: String,
    owner_id: String,
    interval: Duration,
    state: Arc<Mutex<ViewState>>,
    cancel: CancellationToken,
) {
    // Cold start: this is the one failure the viewer gets to see.
    let first = tokio::select! {
        _ = cancel.cancelled() => return,
        res = fetch_snapshot(store.as_ref(), &request_id, &owner_id) => res,
    };
    match first {
        Ok(snapshot) => {
            if cancel.is_cancelled() {
                return;
            }
            *state.lock().await = ViewState::Synced(snapshot);
        }
        Err(StoreError::NotFound) => {
            if !cancel.is_cancelled() {
                *state.lock().await = ViewState::NotFound;
            }
            return;
        }
        Err(err) => {
            if !cancel.is_cancelled() {
                *state.lock().await = ViewState::Error(err.to_string());
            }
            return;
        }
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick completes immediately; burn it so the loop
    // waits a full period after the cold-start fetch.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        // Ticks are strictly sequential: the next one cannot start until this
        // fetch resolves, so at most one request per subscription is in
        // flight.
        let fetched = tokio::select! {
            _ = cancel.cancelled() => return,
            res = fetch_snapshot(store.as_ref(), &request_id, &owner_id) => res,
        };
        if cancel.is_cancelled() {
            return;
        }

        match fetched {
            Ok(snapshot) => {
                debug!(request_id = %request_id, events = snapshot.events.len(), "tick applied");
                *state.lock().await = ViewState::Synced(snapshot);
            }
            Err(err) => {
                // Warm-loop asymmetry: a failed tick never replaces working
                // data and never surfaces to the viewer.
                warn!(
                    request_id = %request_id,
                    error = %err,
                    "poll tick failed, keeping last synced snapshot"
                );
            }
        }
    }
}

async fn fetch_snapshot(
    store: &dyn StoreClient,
    request_id: &str,
    owner_id: &str,
) -> Result<Snapshot, StoreError> {
    let request = store.get_request(request_id, owner_id).await?;
    let events = store.list_events(request_id).await?;
    Ok(Snapshot { request, events })
}
