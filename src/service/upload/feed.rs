use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::RwLock;

use super::UploadItem;
use crate::{
    runtime::{EventLog, Source},
    service::{surface_error, ApiClient, LoadState, ServiceError},
};

pub const LOAD_UPLOADS_FAILED: &str = "Failed to load uploads";

#[derive(Debug, Clone)]
pub struct FeedState {
    pub items: Vec<UploadItem>,
    /// Next server offset; always the number of items received so far.
    pub offset: usize,
    /// Guessed from page fullness. `true` until a short page comes back.
    pub has_more: bool,
    pub load_state: LoadState,
    pub error: Option<String>,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            has_more: true,
            load_state: LoadState::Idle,
            error: None,
        }
    }
}

/// Clears the in-flight flag on every exit path, cancellation included.
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Upload history, fetched page by page.
#[derive(Clone)]
pub struct UploadFeed {
    api: ApiClient,
    events: EventLog,
    page_size: usize,
    in_flight: Arc<AtomicBool>,
    state: Arc<RwLock<FeedState>>,
}

impl UploadFeed {
    pub fn new(api: ApiClient, events: EventLog, page_size: usize) -> Self {
        Self {
            api,
            events,
            page_size,
            in_flight: Arc::new(AtomicBool::new(false)),
            state: Arc::new(RwLock::new(FeedState::default())),
        }
    }

    /// Reloads from offset 0 and replaces the list. Not serialized against
    /// `load_more` or other refreshes; the last response to land wins.
    pub async fn refresh(&self) {
        {
            let mut state = self.state.write().await;
            state.load_state = LoadState::Loading;
            state.error = None;
        }

        let result = self.api.uploads(self.page_size, 0).await;

        let mut state = self.state.write().await;
        match result {
            Ok(page) => {
                debug!("Upload feed refreshed with {} items", page.len());
                state.offset = page.len();
                state.has_more = page.len() == self.page_size;
                state.items = page;
                state.load_state = LoadState::Idle;
            }
            Err(e) => self.record_failure(&mut state, e),
        }
    }

    /// Appends the next page. Returns `false` without a request when the end
    /// was reached or another `load_more` is still running.
    pub async fn load_more(&self) -> bool {
        if !self.state.read().await.has_more {
            return false;
        }
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            debug!("Upload page already in flight");
            return false;
        };

        let offset = {
            let mut state = self.state.write().await;
            state.load_state = LoadState::Loading;
            state.error = None;
            state.offset
        };

        let result = self.api.uploads(self.page_size, offset).await;

        let mut state = self.state.write().await;
        match result {
            Ok(page) => {
                debug!("Fetched {} uploads at offset {}", page.len(), offset);
                state.offset += page.len();
                state.has_more = page.len() == self.page_size;
                state.items.extend(page);
                state.load_state = LoadState::Idle;
            }
            Err(e) => self.record_failure(&mut state, e),
        }
        true
    }

    pub fn is_loading_more(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn snapshot(&self) -> FeedState {
        self.state.read().await.clone()
    }

    /// Puts a load aborted mid-flight back to idle.
    pub(crate) async fn reset_interrupted(&self) {
        let mut state = self.state.write().await;
        if state.load_state == LoadState::Loading {
            state.load_state = LoadState::Idle;
        }
    }

    fn record_failure(&self, state: &mut FeedState, err: ServiceError) {
        if err.is_auth_required() {
            state.load_state = LoadState::Idle;
            return;
        }
        state.error = surface_error(&self.events, Source::Feed, &err, LOAD_UPLOADS_FAILED);
        state.load_state = LoadState::Error;
    }
}
