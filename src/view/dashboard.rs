use super::{model::*, ScopeSlot};
use crate::{
    runtime::{EventLog, Source},
    service::{
        CatalogView, CreditsSummary, GateDecision, LoadState, PaymentInitiator, PaymentOutcome, Product,
        ServiceRegistry, SessionGate, SubscriptionManager,
    },
};

const PACK_DESCRIPTION: &str = "One-time credit pack";
const PLAN_DESCRIPTION: &str = "Monthly subscription";
const SOURCES: [Source; 4] = [Source::Credits, Source::Catalog, Source::Subscriptions, Source::Payment];

/// Credits, catalog, subscriptions and purchases.
pub struct DashboardView {
    gate: SessionGate,
    catalog: CatalogView,
    credits: CreditsSummary,
    subscriptions: SubscriptionManager,
    payment: PaymentInitiator,
    events: EventLog,
    scope: ScopeSlot,
}

impl DashboardView {
    pub fn new(services: &ServiceRegistry, gate: SessionGate) -> Self {
        Self {
            gate,
            catalog: services.catalog.clone(),
            credits: services.credits.clone(),
            subscriptions: services.subscriptions.clone(),
            payment: services.payment.clone(),
            events: services.events.clone(),
            scope: ScopeSlot::default(),
        }
    }

    /// Launches the initial loads side by side. Each one writes only its own
    /// state, so a slow or failing load never holds back the others.
    pub fn activate(&self) -> GateDecision {
        if self.gate.check() == GateDecision::Redirected {
            return GateDecision::Redirected;
        }

        let scope = self.scope.begin();
        let credits = self.credits.clone();
        scope.spawn("credits", async move { credits.load().await });
        let catalog = self.catalog.clone();
        scope.spawn("catalog", async move { catalog.load().await });
        if self.subscriptions.is_enabled() {
            let subscriptions = self.subscriptions.clone();
            scope.spawn("subscriptions", async move { subscriptions.list().await });
        }
        GateDecision::Proceed
    }

    pub async fn settle(&self) {
        self.scope.settle().await;
    }

    /// Aborts whatever the activation still has in flight. Nothing it started
    /// writes afterwards, and no panel is left showing a load.
    pub async fn deactivate(&self) {
        self.scope.end().await;
        self.credits.reset_interrupted().await;
        self.catalog.reset_interrupted().await;
        self.subscriptions.reset_interrupted().await;
    }

    pub async fn buy(&self, slug: &str) -> PaymentOutcome {
        self.payment.buy(slug).await
    }

    pub async fn cancel(&self, subscription_id: i64) {
        self.subscriptions.cancel(subscription_id).await;
    }

    pub async fn render(&self) -> DashboardModel {
        let credits = self.credits.snapshot().await;
        let catalog = self.catalog.snapshot().await;
        let groups = self.catalog.groups().await;
        let payment = self.payment.snapshot().await;

        let packs = self.cards(&groups.one_time, PACK_DESCRIPTION);

        let (plans, subscriptions, subscriptions_error) = if self.subscriptions.is_enabled() {
            let state = self.subscriptions.snapshot().await;
            (
                Some(self.cards(&groups.subscription, PLAN_DESCRIPTION)),
                Some(state.rows()),
                state.error,
            )
        } else {
            (None, None, None)
        };

        let errors = [credits.error.clone(), catalog.error, subscriptions_error, payment.error]
            .into_iter()
            .flatten()
            .collect();

        DashboardModel {
            credits: CreditsPanel::from(&credits),
            packs,
            catalog_loading: catalog.load_state == LoadState::Loading,
            plans,
            subscriptions,
            payment_message: payment.message,
            errors,
            notice: self.events.latest_from(&SOURCES).map(|notice| notice.to_string()),
        }
    }

    fn cards(&self, products: &[Product], default_description: &str) -> Vec<ProductCard> {
        products
            .iter()
            .map(|product| ProductCard::new(product, self.catalog.is_featured(product), default_description))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::LOGIN_PATH,
        utils::test::{
            product_json, subscription_json, test_config, RecordingLauncher, RecordingNavigator, ScriptedHttp,
        },
    };
    use serde_json::json;
    use std::sync::Arc;

    fn dashboard(http: &Arc<ScriptedHttp>, subscriptions_enabled: bool) -> (DashboardView, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::default());
        let services = ServiceRegistry::with_client(
            &test_config(subscriptions_enabled),
            http.session(),
            http.clone(),
            Arc::new(RecordingLauncher::default()),
        );
        let gate = SessionGate::new(http.session(), navigator.clone());
        (DashboardView::new(&services, gate), navigator)
    }

    fn script_dashboard(http: &ScriptedHttp, credits: Result<serde_json::Value, (u16, &str)>) {
        let mut featured = product_json(3, "creator-10", "Creator 10", "one_time", Some(10));
        featured["price"] = json!("14.99");
        http.reply(
            "/api/products",
            Ok(json!([
                product_json(1, "starter", "Starter", "one_time", Some(5)),
                product_json(2, "pro", "Pro", "subscription", None),
                featured,
            ])),
        );
        http.reply("/api/credits", credits);
        http.reply("/api/subscriptions", Ok(json!([subscription_json(4, "active")])));
    }

    fn credits_ok() -> Result<serde_json::Value, (u16, &'static str)> {
        Ok(json!({"credits": 2, "monthly_quota": 20, "free_generation_used": false}))
    }

    #[tokio::test]
    async fn test_without_session_redirects_and_sends_nothing() {
        let http = ScriptedHttp::signed_out();
        let (view, navigator) = dashboard(&http, true);

        assert_eq!(view.activate(), GateDecision::Redirected);
        view.settle().await;

        assert!(http.calls().is_empty());
        assert_eq!(navigator.paths(), vec![LOGIN_PATH.to_string()]);
    }

    #[tokio::test]
    async fn test_activation_loads_every_panel() {
        let http = ScriptedHttp::signed_in();
        script_dashboard(&http, credits_ok());
        let (view, _) = dashboard(&http, true);

        assert_eq!(view.activate(), GateDecision::Proceed);
        view.settle().await;
        let model = view.render().await;

        let mut paths = http.paths();
        paths.sort();
        assert_eq!(paths, vec!["/api/credits", "/api/products", "/api/subscriptions"]);
        assert_eq!(model.credits.one_time, Some(2));
        assert_eq!(model.credits.free_generation, Some("Available"));
        assert_eq!(model.packs[0].slug, "creator-10");
        assert_eq!(model.packs[0].badge, Some(FEATURED_BADGE));
        assert_eq!(model.packs[1].badge, None);
        assert_eq!(model.packs[1].description, "One-time credit pack");
        assert_eq!(model.plans.as_ref().unwrap()[0].slug, "pro");
        assert_eq!(model.subscriptions.as_ref().unwrap()[0].action.label, "Cancel");
        assert!(model.errors.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_subscriptions_are_not_fetched_or_shown() {
        let http = ScriptedHttp::signed_in();
        script_dashboard(&http, credits_ok());
        let (view, _) = dashboard(&http, false);

        view.activate();
        view.settle().await;
        let model = view.render().await;

        assert!(!http.paths().iter().any(|p| p.starts_with("/api/subscriptions")));
        assert_eq!(model.plans, None);
        assert_eq!(model.subscriptions, None);
        assert_eq!(model.packs.len(), 2);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_the_rest() {
        let http = ScriptedHttp::signed_in();
        script_dashboard(&http, Err((500, "")));
        let (view, _) = dashboard(&http, true);

        view.activate();
        view.settle().await;
        let model = view.render().await;

        assert_eq!(model.errors, vec!["Failed to load credits".to_string()]);
        assert_eq!(model.notice.as_deref(), Some("credits: Failed to load credits"));
        assert_eq!(model.packs.len(), 2);
        assert_eq!(model.subscriptions.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deactivation_drops_late_responses() {
        let http = ScriptedHttp::signed_in();
        script_dashboard(&http, credits_ok());
        http.hold();
        let (view, _) = dashboard(&http, true);

        view.activate();
        http.wait_for_calls(3).await;
        view.deactivate().await;
        http.release(3);
        tokio::task::yield_now().await;

        let model = view.render().await;
        assert!(model.packs.is_empty());
        assert!(!model.catalog_loading);
        assert_eq!(model.credits.one_time, None);
        assert!(model.subscriptions.unwrap().is_empty());
        assert_eq!(model.notice, None);
    }

    #[tokio::test]
    async fn test_deactivation_clears_loading_state() {
        let http = ScriptedHttp::signed_in();
        script_dashboard(&http, credits_ok());
        http.hold();
        let (view, _) = dashboard(&http, true);

        view.activate();
        http.wait_for_calls(3).await;
        assert!(view.render().await.catalog_loading);

        view.deactivate().await;

        let services_idle = [
            view.credits.snapshot().await.load_state,
            view.catalog.snapshot().await.load_state,
            view.subscriptions.snapshot().await.load_state,
        ];
        assert_eq!(services_idle, [LoadState::Idle; 3]);
        assert!(!view.render().await.catalog_loading);
    }

    #[tokio::test]
    async fn test_cancel_refreshes_rows() {
        let http = ScriptedHttp::signed_in();
        script_dashboard(&http, credits_ok());
        http.reply("/api/subscriptions", Ok(json!([subscription_json(4, "canceled")])));
        http.reply("/api/subscriptions/cancel", Ok(json!("Subscription canceled")));
        let (view, _) = dashboard(&http, true);

        view.activate();
        view.settle().await;
        view.cancel(4).await;

        let rows = view.render().await.subscriptions.unwrap();
        assert_eq!(rows[0].action.label, "Canceled");
        assert!(rows[0].action.disabled);
    }
}
