use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UploadStatus {
    Queued,
    Processing,
    Complete,
    Failed,
    Other(String),
}

impl From<String> for UploadStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "queued" => UploadStatus::Queued,
            "processing" => UploadStatus::Processing,
            "complete" => UploadStatus::Complete,
            "failed" => UploadStatus::Failed,
            _ => UploadStatus::Other(value),
        }
    }
}

impl From<UploadStatus> for String {
    fn from(status: UploadStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadStatus::Queued => f.write_str("queued"),
            UploadStatus::Processing => f.write_str("processing"),
            UploadStatus::Complete => f.write_str("complete"),
            UploadStatus::Failed => f.write_str("failed"),
            UploadStatus::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadItem {
    pub id: i64,
    pub status: UploadStatus,
    pub original_filename: String,
    #[serde(default)]
    pub cleaned_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UploadItem {
    /// Result link once processing has produced one.
    pub fn download_url(&self) -> Option<&str> {
        self.cleaned_url.as_deref().filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadReceipt {
    pub message: String,
    pub upload_id: i64,
    pub task_id: String,
}
