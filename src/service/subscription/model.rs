use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open set: statuses this client does not know are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    Other(String),
}

impl From<String> for SubscriptionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => SubscriptionStatus::Active,
            "canceled" => SubscriptionStatus::Canceled,
            _ => SubscriptionStatus::Other(value),
        }
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Active => f.write_str("active"),
            SubscriptionStatus::Canceled => f.write_str("canceled"),
            SubscriptionStatus::Other(other) => f.write_str(other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub product_id: i64,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub provider_subscription_id: Option<String>,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub current_period_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub current_period_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub canceled_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelRequest {
    pub subscription_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionControl {
    pub label: &'static str,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionRow {
    pub id: i64,
    pub status: String,
    pub period_end: String,
    pub action: ActionControl,
}

impl From<&Subscription> for SubscriptionRow {
    fn from(sub: &Subscription) -> Self {
        let canceled = sub.status == SubscriptionStatus::Canceled;
        Self {
            id: sub.id,
            status: sub.status.to_string(),
            period_end: crate::utils::format_date(sub.current_period_end),
            action: ActionControl {
                label: if canceled { "Canceled" } else { "Cancel" },
                disabled: canceled,
            },
        }
    }
}
