use std::sync::Arc;

use crate::{config::AppConfig, runtime::EventLog, storage::CredentialStore};

pub mod api;
mod auth;
mod catalog;
mod credits;
mod error;
pub mod http;
mod payment;
mod session;
mod subscription;
mod upload;

pub use api::ApiClient;
pub use auth::*;
pub use catalog::*;
pub use credits::*;
pub use error::ServiceError;
pub use payment::*;
pub use session::*;
pub use subscription::*;
pub use upload::*;

use self::http::{HttpClient, HttpService};

/// Lifecycle of a component's last load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Error,
}

/// Records a failed request on the component slot and the event log. Returns
/// `None` when the failure must stay silent (no session).
pub(crate) fn surface_error(
    events: &EventLog,
    source: crate::runtime::Source,
    err: &ServiceError,
    fallback: &str,
) -> Option<String> {
    let message = err.user_message(fallback)?;
    error!("{} request failed: {}", source, message);
    events.error(source, message.clone());
    Some(message)
}

#[derive(Clone)]
pub struct ServiceRegistry {
    pub session: SessionService,
    pub events: EventLog,
    pub auth: AuthService,
    pub catalog: CatalogView,
    pub credits: CreditsSummary,
    pub payment: PaymentInitiator,
    pub subscriptions: SubscriptionManager,
    pub feed: UploadFeed,
    pub upload: UploadSubmission,
}

impl ServiceRegistry {
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn CredentialStore>,
        launcher: Arc<dyn Launcher>,
    ) -> Result<Self, ServiceError> {
        info!("Initializing service registry");

        let session = SessionService::new(store);
        let http = HttpService::new(&config.api.base_url, config.api.timeout, session.clone())
            .map_err(ServiceError::from)?;

        let registry = Self::with_client(config, session, Arc::new(http), launcher);

        info!("Service registry initialized");
        Ok(registry)
    }

    /// Wires every component over an arbitrary transport.
    pub fn with_client(
        config: &AppConfig,
        session: SessionService,
        http: Arc<dyn HttpClient>,
        launcher: Arc<dyn Launcher>,
    ) -> Self {
        let api = ApiClient::new(http);
        let events = EventLog::new();
        let feed = UploadFeed::new(api.clone(), events.clone(), config.uploads.page_size);

        Self {
            auth: AuthService::new(api.clone(), session.clone(), events.clone()),
            catalog: CatalogView::new(api.clone(), events.clone(), &config.catalog.featured_price),
            credits: CreditsSummary::new(api.clone(), events.clone()),
            payment: PaymentInitiator::new(api.clone(), events.clone(), launcher),
            subscriptions: SubscriptionManager::new(
                api.clone(),
                events.clone(),
                config.features.subscriptions_enabled,
            ),
            upload: UploadSubmission::new(api, events.clone(), feed.clone()),
            feed,
            session,
            events,
        }
    }
}
