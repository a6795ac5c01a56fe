mod model;

pub use model::*;

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{surface_error, ApiClient, ServiceError};
use crate::runtime::{EventLog, Source};

pub const PAYMENT_FAILED: &str = "Payment failed";
pub const LINK_OPENED: &str = "Payment link opened in a new tab.";
pub const PAYMENT_CREATED: &str = "Payment created. Check your Lava dashboard.";

/// Opens a URL in a new browsing context. Supplied by the presentation layer.
pub trait Launcher: Send + Sync {
    fn open_external(&self, url: &str) -> std::io::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct PaymentState {
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct PaymentInitiator {
    api: ApiClient,
    events: EventLog,
    launcher: Arc<dyn Launcher>,
    state: Arc<RwLock<PaymentState>>,
}

impl PaymentInitiator {
    pub fn new(api: ApiClient, events: EventLog, launcher: Arc<dyn Launcher>) -> Self {
        Self {
            api,
            events,
            launcher,
            state: Arc::new(RwLock::new(PaymentState::default())),
        }
    }

    /// Creates a payment intent for `slug`. No polling follows; the balance
    /// changes only once the provider notifies the backend.
    pub async fn buy(&self, slug: &str) -> PaymentOutcome {
        *self.state.write().await = PaymentState::default();

        let request = PaymentRequest {
            product_slug: slug.to_string(),
            ..Default::default()
        };
        info!("Creating payment for {}", slug);
        let result = self.api.create_payment(&request).await;

        let mut state = self.state.write().await;
        match result {
            Ok(PaymentIntent {
                payment_url: Some(url),
                transaction_id,
            }) if !url.is_empty() => {
                if let Err(e) = self.launcher.open_external(&url) {
                    warn!("Failed to open payment link: {}", e);
                }
                self.events.info(Source::Payment, LINK_OPENED);
                state.message = Some(LINK_OPENED.to_string());
                PaymentOutcome::Redirected { url, transaction_id }
            }
            Ok(intent) => {
                self.events.info(Source::Payment, PAYMENT_CREATED);
                state.message = Some(PAYMENT_CREATED.to_string());
                PaymentOutcome::Created {
                    transaction_id: intent.transaction_id,
                }
            }
            Err(ServiceError::AuthRequired) => PaymentOutcome::Skipped,
            Err(e) => {
                let message = surface_error(&self.events, Source::Payment, &e, PAYMENT_FAILED)
                    .unwrap_or_else(|| PAYMENT_FAILED.to_string());
                state.error = Some(message.clone());
                PaymentOutcome::Failed(message)
            }
        }
    }

    pub async fn snapshot(&self) -> PaymentState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::{RecordingLauncher, ScriptedHttp};
    use serde_json::json;

    fn initiator(http: Arc<ScriptedHttp>, launcher: Arc<RecordingLauncher>) -> PaymentInitiator {
        PaymentInitiator::new(ApiClient::new(http), EventLog::new(), launcher)
    }

    #[tokio::test]
    async fn test_payment_url_is_launched() {
        let http = ScriptedHttp::signed_in();
        http.reply(
            "/api/create-payment",
            Ok(json!({"payment_url": "https://pay.example/abc", "transaction_id": 12})),
        );
        let launcher = Arc::new(RecordingLauncher::default());
        let payment = initiator(http.clone(), launcher.clone());

        let outcome = payment.buy("pack-10").await;

        assert_eq!(
            outcome,
            PaymentOutcome::Redirected {
                url: "https://pay.example/abc".into(),
                transaction_id: 12
            }
        );
        assert_eq!(launcher.urls(), vec!["https://pay.example/abc".to_string()]);
        assert_eq!(payment.snapshot().await.message.as_deref(), Some(LINK_OPENED));
        assert_eq!(http.calls()[0].body, Some(json!({"product_slug": "pack-10"})));
    }

    #[tokio::test]
    async fn test_missing_url_reports_created() {
        let http = ScriptedHttp::signed_in();
        http.reply("/api/create-payment", Ok(json!({"transaction_id": 3})));
        let launcher = Arc::new(RecordingLauncher::default());
        let payment = initiator(http, launcher.clone());

        let outcome = payment.buy("pro").await;

        assert_eq!(outcome, PaymentOutcome::Created { transaction_id: 3 });
        assert!(launcher.urls().is_empty());
        assert_eq!(payment.snapshot().await.message.as_deref(), Some(PAYMENT_CREATED));
    }

    #[tokio::test]
    async fn test_new_attempt_clears_previous_message() {
        let http = ScriptedHttp::signed_in();
        http.reply("/api/create-payment", Ok(json!({"transaction_id": 3})));
        http.reply("/api/create-payment", Err((400, "invalid product")));
        let payment = initiator(http, Arc::new(RecordingLauncher::default()));

        payment.buy("pro").await;
        let outcome = payment.buy("ghost").await;

        let state = payment.snapshot().await;
        assert_eq!(outcome, PaymentOutcome::Failed("invalid product".into()));
        assert_eq!(state.message, None);
        assert_eq!(state.error.as_deref(), Some("invalid product"));
    }

    #[tokio::test]
    async fn test_no_session_is_skipped() {
        let http = ScriptedHttp::signed_out();
        let payment = initiator(http.clone(), Arc::new(RecordingLauncher::default()));

        assert_eq!(payment.buy("pro").await, PaymentOutcome::Skipped);
        assert!(http.calls().is_empty());
    }
}
