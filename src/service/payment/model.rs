use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Default)]
pub struct PaymentRequest {
    pub product_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodicity: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentIntent {
    #[serde(default)]
    pub payment_url: Option<String>,
    pub transaction_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// Checkout page handed to the launcher.
    Redirected { url: String, transaction_id: i64 },
    /// Intent created without a checkout page.
    Created { transaction_id: i64 },
    /// No session; nothing was sent.
    Skipped,
    Failed(String),
}
