mod feed;
mod model;

pub use feed::{FeedState, UploadFeed, LOAD_UPLOADS_FAILED};
pub use model::*;

use std::sync::Arc;

use tokio::sync::RwLock;

use super::{surface_error, ApiClient, ServiceError};
use crate::runtime::{EventLog, Source};

pub const UPLOAD_FAILED: &str = "Upload failed";
pub const EMPTY_URL: &str = "Paste a video URL first.";

#[derive(Debug, Clone, Default)]
pub struct SubmissionState {
    /// Kept as typed; only the submitted copy is trimmed.
    pub input: String,
    pub status: Option<String>,
    pub error: Option<String>,
    pub receipt: Option<UploadReceipt>,
    pub submitting: bool,
}

#[derive(Clone)]
pub struct UploadSubmission {
    api: ApiClient,
    events: EventLog,
    feed: UploadFeed,
    state: Arc<RwLock<SubmissionState>>,
}

impl UploadSubmission {
    pub fn new(api: ApiClient, events: EventLog, feed: UploadFeed) -> Self {
        Self {
            api,
            events,
            feed,
            state: Arc::new(RwLock::new(SubmissionState::default())),
        }
    }

    pub async fn set_input(&self, input: &str) {
        self.state.write().await.input = input.to_string();
    }

    /// Starts a processing job for the current input. On success the feed is
    /// reloaded from the first page before this returns.
    pub async fn submit(&self) -> Result<UploadReceipt, ServiceError> {
        let url = {
            let mut state = self.state.write().await;
            let url = state.input.trim().to_string();
            if url.is_empty() {
                state.error = Some(EMPTY_URL.to_string());
                self.events.error(Source::Upload, EMPTY_URL);
                return Err(ServiceError::Validation(EMPTY_URL.to_string()));
            }
            state.error = None;
            state.status = None;
            state.submitting = true;
            url
        };

        info!("Submitting upload");
        let result = self.api.upload_video(&url).await;

        {
            let mut state = self.state.write().await;
            state.submitting = false;
            match &result {
                Ok(receipt) => {
                    let status = format!("Processing started. Task ID: {}", receipt.task_id);
                    info!("Upload {} queued as task {}", receipt.upload_id, receipt.task_id);
                    self.events.info(Source::Upload, status.clone());
                    state.status = Some(status);
                    state.receipt = Some(receipt.clone());
                }
                Err(e) => {
                    state.error = surface_error(&self.events, Source::Upload, e, UPLOAD_FAILED);
                }
            }
        }

        if result.is_ok() {
            self.feed.refresh().await;
        }
        result
    }

    pub async fn snapshot(&self) -> SubmissionState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test::{upload_page, ScriptedHttp};
    use serde_json::json;

    fn submission(http: Arc<ScriptedHttp>) -> (UploadSubmission, UploadFeed) {
        let api = ApiClient::new(http);
        let events = EventLog::new();
        let feed = UploadFeed::new(api.clone(), events.clone(), 50);
        (UploadSubmission::new(api, events, feed.clone()), feed)
    }

    #[tokio::test]
    async fn test_blank_url_is_rejected_locally() {
        let http = ScriptedHttp::signed_in();
        let (upload, _) = submission(http.clone());
        upload.set_input("   ").await;

        let err = upload.submit().await.unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(http.calls().is_empty());
        let state = upload.snapshot().await;
        assert_eq!(state.error.as_deref(), Some(EMPTY_URL));
        assert_eq!(state.input, "   ");
    }

    #[tokio::test]
    async fn test_success_refreshes_feed_from_start() {
        let http = ScriptedHttp::signed_in();
        http.reply("/api/upload", Ok(json!({"message": "queued", "upload_id": 9, "task_id": "t-9"})));
        http.reply("/api/uploads", Ok(upload_page(0, 50)));
        http.reply("/api/uploads", Ok(upload_page(50, 5)));
        http.reply("/api/uploads", Ok(upload_page(9, 1)));
        let (upload, feed) = submission(http.clone());
        feed.refresh().await;
        feed.load_more().await;
        upload.set_input("  https://example.com/clip.mp4 ").await;

        let receipt = upload.submit().await.unwrap();

        assert_eq!(receipt.task_id, "t-9");
        let calls = http.calls();
        assert_eq!(calls[2].body, Some(json!({"url": "https://example.com/clip.mp4"})));
        assert_eq!(calls[3].path, "/api/uploads?limit=50&offset=0");

        let state = upload.snapshot().await;
        assert_eq!(state.status.as_deref(), Some("Processing started. Task ID: t-9"));
        assert_eq!(state.input, "  https://example.com/clip.mp4 ");
        assert_eq!(feed.snapshot().await.items.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_keeps_input_and_skips_refresh() {
        let http = ScriptedHttp::signed_in();
        http.reply("/api/upload", Err((402, "Not enough credits")));
        let (upload, _) = submission(http.clone());
        upload.set_input("https://example.com/clip.mp4").await;

        upload.submit().await.unwrap_err();

        let state = upload.snapshot().await;
        assert_eq!(state.error.as_deref(), Some("Not enough credits"));
        assert_eq!(state.input, "https://example.com/clip.mp4");
        assert!(!state.submitting);
        assert_eq!(http.paths(), vec!["/api/upload"]);
    }
}
