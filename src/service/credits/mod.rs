mod model;

pub use model::*;

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{surface_error, ApiClient, LoadState, ServiceError};
use crate::runtime::{EventLog, Source};

pub const LOAD_CREDITS_FAILED: &str = "Failed to load credits";

#[derive(Debug, Clone, Default)]
pub struct CreditsState {
    pub status: Option<CreditsStatus>,
    pub load_state: LoadState,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct CreditsSummary {
    api: ApiClient,
    events: EventLog,
    state: Arc<RwLock<CreditsState>>,
}

impl CreditsSummary {
    pub fn new(api: ApiClient, events: EventLog) -> Self {
        Self {
            api,
            events,
            state: Arc::new(RwLock::new(CreditsState::default())),
        }
    }

    pub async fn load(&self) {
        {
            let mut state = self.state.write().await;
            state.load_state = LoadState::Loading;
            state.error = None;
        }

        let result = self.api.credits().await;

        let mut state = self.state.write().await;
        match result {
            Ok(status) => {
                debug!(
                    "Credits: {} one-time, {} monthly",
                    status.credits, status.monthly_quota
                );
                state.status = Some(status);
                state.load_state = LoadState::Idle;
            }
            Err(ServiceError::AuthRequired) => {
                state.load_state = LoadState::Idle;
            }
            Err(e) => {
                state.error = surface_error(&self.events, Source::Credits, &e, LOAD_CREDITS_FAILED);
                state.load_state = LoadState::Error;
            }
        }
    }

    pub async fn snapshot(&self) -> CreditsState {
        self.state.read().await.clone()
    }

    /// Puts a load aborted mid-flight back to idle.
    pub(crate) async fn reset_interrupted(&self) {
        let mut state = self.state.write().await;
        if state.load_state == LoadState::Loading {
            state.load_state = LoadState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::ScriptedHttp;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_stores_snapshot() {
        let http = ScriptedHttp::signed_in();
        http.reply(
            "/api/credits",
            Ok(json!({"credits": 4, "monthly_quota": 30, "free_generation_used": true})),
        );
        let credits = CreditsSummary::new(ApiClient::new(http), EventLog::new());

        credits.load().await;

        let state = credits.snapshot().await;
        let status = state.status.unwrap();
        assert_eq!(status.credits, 4);
        assert_eq!(status.monthly_quota, 30);
        assert_eq!(status.free_generation_label(), "Used");
        assert_eq!(state.load_state, LoadState::Idle);
    }

    #[tokio::test]
    async fn test_failure_uses_fallback_message() {
        let http = ScriptedHttp::signed_in();
        http.reply("/api/credits", Err((500, "")));
        let events = EventLog::new();
        let credits = CreditsSummary::new(ApiClient::new(http), events.clone());

        credits.load().await;

        let state = credits.snapshot().await;
        assert!(state.status.is_none());
        assert_eq!(state.error.as_deref(), Some(LOAD_CREDITS_FAILED));
        assert_eq!(events.latest_from(&[Source::Credits]).unwrap().source, Source::Credits);
    }

    #[test]
    fn test_consumption_order() {
        assert_eq!(CONSUMPTION_ORDER[0].pool, "Monthly quota");
        assert_eq!(CONSUMPTION_ORDER[0].role, "Used first");
        assert_eq!(CONSUMPTION_ORDER[1].role, "Backup");
    }
}
