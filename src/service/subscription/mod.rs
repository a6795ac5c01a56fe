mod model;

pub use model::*;

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{surface_error, ApiClient, LoadState, ServiceError};
use crate::runtime::{EventLog, Source};

pub const LOAD_SUBSCRIPTIONS_FAILED: &str = "Failed to load subscriptions";
pub const CANCEL_FAILED: &str = "Cancel failed";

#[derive(Debug, Clone, Default)]
pub struct SubscriptionState {
    pub subscriptions: Vec<Subscription>,
    pub load_state: LoadState,
    pub error: Option<String>,
}

impl SubscriptionState {
    pub fn rows(&self) -> Vec<SubscriptionRow> {
        self.subscriptions.iter().map(SubscriptionRow::from).collect()
    }
}

/// Active subscriptions. When constructed disabled, every operation is a
/// no-op and no request is ever sent.
#[derive(Clone)]
pub struct SubscriptionManager {
    api: ApiClient,
    events: EventLog,
    enabled: bool,
    state: Arc<RwLock<SubscriptionState>>,
}

impl SubscriptionManager {
    pub fn new(api: ApiClient, events: EventLog, enabled: bool) -> Self {
        if !enabled {
            info!("Subscriptions are disabled");
        }
        Self {
            api,
            events,
            enabled,
            state: Arc::new(RwLock::new(SubscriptionState::default())),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn list(&self) {
        if !self.enabled {
            return;
        }
        self.state.write().await.error = None;
        self.fetch().await;
    }

    async fn fetch(&self) {
        self.state.write().await.load_state = LoadState::Loading;

        let result = self.api.subscriptions().await;

        let mut state = self.state.write().await;
        match result {
            Ok(subscriptions) => {
                state.subscriptions = subscriptions;
                state.load_state = LoadState::Idle;
            }
            Err(ServiceError::AuthRequired) => {
                state.load_state = LoadState::Idle;
            }
            Err(e) => {
                state.error = surface_error(&self.events, Source::Subscriptions, &e, LOAD_SUBSCRIPTIONS_FAILED);
                state.load_state = LoadState::Error;
            }
        }
    }

    /// Cancels, then refetches the whole list whatever the outcome. Status is
    /// never patched locally.
    pub async fn cancel(&self, subscription_id: i64) {
        if !self.enabled {
            return;
        }
        self.state.write().await.error = None;

        info!("Canceling subscription {}", subscription_id);
        if let Err(e) = self.api.cancel_subscription(subscription_id).await {
            let message = surface_error(&self.events, Source::Subscriptions, &e, CANCEL_FAILED);
            self.state.write().await.error = message;
        }

        self.fetch().await;
    }

    pub async fn snapshot(&self) -> SubscriptionState {
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
    use crate::utils::test::{subscription_json, ScriptedHttp};
    use serde_json::json;

    #[tokio::test]
    async fn test_cancel_refetches_and_disables_action() {
        let http = ScriptedHttp::signed_in();
        http.reply("/api/subscriptions", Ok(json!([subscription_json(7, "active")])));
        http.reply("/api/subscriptions", Ok(json!([subscription_json(7, "canceled")])));
        http.reply("/api/subscriptions/cancel", Ok(json!("Subscription canceled")));
        let manager = SubscriptionManager::new(ApiClient::new(http.clone()), EventLog::new(), true);

        manager.list().await;
        let before = manager.snapshot().await.rows();
        assert_eq!(before[0].action.label, "Cancel");
        assert!(!before[0].action.disabled);

        manager.cancel(7).await;

        let after = manager.snapshot().await.rows();
        assert_eq!(after[0].status, "canceled");
        assert_eq!(after[0].action.label, "Canceled");
        assert!(after[0].action.disabled);
        assert_eq!(after[0].period_end, "2025-07-01");
        assert_eq!(
            http.paths(),
            vec!["/api/subscriptions", "/api/subscriptions/cancel", "/api/subscriptions"]
        );
    }

    #[tokio::test]
    async fn test_failed_cancel_still_refetches() {
        let http = ScriptedHttp::signed_in();
        http.reply("/api/subscriptions", Ok(json!([subscription_json(7, "active")])));
        http.reply("/api/subscriptions/cancel", Err((404, "Subscription not found")));
        let events = EventLog::new();
        let manager = SubscriptionManager::new(ApiClient::new(http.clone()), events.clone(), true);

        manager.cancel(7).await;

        let state = manager.snapshot().await;
        assert_eq!(http.paths(), vec!["/api/subscriptions/cancel", "/api/subscriptions"]);
        assert_eq!(state.subscriptions.len(), 1);
        assert_eq!(state.error.as_deref(), Some("Subscription not found"));
        assert_eq!(
            events.latest_from(&[Source::Subscriptions]).unwrap().message,
            "Subscription not found"
        );
    }

    #[tokio::test]
    async fn test_disabled_manager_never_fetches() {
        let http = ScriptedHttp::signed_in();
        let manager = SubscriptionManager::new(ApiClient::new(http.clone()), EventLog::new(), false);

        manager.list().await;
        manager.cancel(1).await;

        assert!(http.calls().is_empty());
        assert!(!manager.is_enabled());
    }

    #[tokio::test]
    async fn test_unknown_status_is_preserved() {
        let http = ScriptedHttp::signed_in();
        let mut sub = subscription_json(2, "past_due");
        sub["current_period_end"] = serde_json::Value::Null;
        http.reply("/api/subscriptions", Ok(json!([sub])));
        let manager = SubscriptionManager::new(ApiClient::new(http), EventLog::new(), true);

        manager.list().await;

        let rows = manager.snapshot().await.rows();
        assert_eq!(rows[0].status, "past_due");
        assert_eq!(rows[0].period_end, "N/A");
        assert!(!rows[0].action.disabled);
    }
}
