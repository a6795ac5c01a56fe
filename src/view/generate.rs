use super::{model::*, ScopeSlot};
use crate::{
    runtime::{EventLog, Source},
    service::{
        GateDecision, ServiceError, ServiceRegistry, SessionGate, UploadFeed, UploadReceipt, UploadSubmission,
        CONSUMPTION_ORDER,
    },
};

/// Job submission and the upload history.
pub struct GenerateView {
    gate: SessionGate,
    upload: UploadSubmission,
    feed: UploadFeed,
    events: EventLog,
    scope: ScopeSlot,
}

impl GenerateView {
    pub fn new(services: &ServiceRegistry, gate: SessionGate) -> Self {
        Self {
            gate,
            upload: services.upload.clone(),
            feed: services.feed.clone(),
            events: services.events.clone(),
            scope: ScopeSlot::default(),
        }
    }

    pub fn activate(&self) -> GateDecision {
        if self.gate.check() == GateDecision::Redirected {
            return GateDecision::Redirected;
        }
        let scope = self.scope.begin();
        let feed = self.feed.clone();
        scope.spawn("uploads", async move { feed.refresh().await });
        GateDecision::Proceed
    }

    pub async fn settle(&self) {
        self.scope.settle().await;
    }

    pub async fn deactivate(&self) {
        self.scope.end().await;
        self.feed.reset_interrupted().await;
    }

    pub async fn submit(&self, url: &str) -> Result<UploadReceipt, ServiceError> {
        self.upload.set_input(url).await;
        self.upload.submit().await
    }

    pub async fn load_more(&self) -> bool {
        self.feed.load_more().await
    }

    pub async fn render(&self) -> GenerateModel {
        let submission = self.upload.snapshot().await;
        let feed = self.feed.snapshot().await;

        GenerateModel {
            precedence: CONSUMPTION_ORDER,
            status: submission.status,
            uploads: feed.items.iter().map(UploadRow::from).collect(),
            can_load_more: feed.has_more,
            errors: [submission.error, feed.error].into_iter().flatten().collect(),
            notice: self
                .events
                .latest_from(&[Source::Upload, Source::Feed])
                .map(|notice| notice.to_string()),
        }
    }
}
