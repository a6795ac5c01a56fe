use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{
    auth::{AuthResponse, LoginRequest, RegisterRequest, ResendVerificationRequest},
    catalog::Product,
    credits::CreditsStatus,
    http::HttpClient,
    payment::{PaymentIntent, PaymentRequest},
    subscription::{CancelRequest, Subscription},
    upload::{UploadItem, UploadReceipt},
    ServiceError,
};

/// Typed view of the backend contract.
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
}

impl ApiClient {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ServiceError> {
        let value = self.http.post_json("/auth/register", to_body(request)?, false).await?;
        decode(value)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ServiceError> {
        let value = self.http.post_json("/auth/login", to_body(request)?, false).await?;
        decode(value)
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), ServiceError> {
        let encoded: String = url::form_urlencoded::byte_serialize(token.as_bytes()).collect();
        self.http.get(&format!("/auth/verify?token={}", encoded), false).await?;
        Ok(())
    }

    pub async fn resend_verification(&self, request: &ResendVerificationRequest) -> Result<(), ServiceError> {
        self.http
            .post_json("/auth/resend-verification", to_body(request)?, false)
            .await?;
        Ok(())
    }

    pub async fn products(&self) -> Result<Vec<Product>, ServiceError> {
        decode(self.http.get("/api/products", true).await?)
    }

    pub async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentIntent, ServiceError> {
        let value = self.http.post_json("/api/create-payment", to_body(request)?, true).await?;
        decode(value)
    }

    pub async fn subscriptions(&self) -> Result<Vec<Subscription>, ServiceError> {
        decode(self.http.get("/api/subscriptions", true).await?)
    }

    /// The acknowledgement body (plain text on some deployments) is ignored.
    pub async fn cancel_subscription(&self, subscription_id: i64) -> Result<(), ServiceError> {
        let body = to_body(&CancelRequest { subscription_id })?;
        self.http.post_json("/api/subscriptions/cancel", body, true).await?;
        Ok(())
    }

    pub async fn upload_video(&self, url: &str) -> Result<UploadReceipt, ServiceError> {
        let fields = vec![("url".to_string(), url.to_string())];
        decode(self.http.post_multipart("/api/upload", fields, true).await?)
    }

    pub async fn credits(&self) -> Result<CreditsStatus, ServiceError> {
        decode(self.http.get("/api/credits", true).await?)
    }

    pub async fn uploads(&self, limit: usize, offset: usize) -> Result<Vec<UploadItem>, ServiceError> {
        let path = format!("/api/uploads?limit={}&offset={}", limit, offset);
        decode(self.http.get(&path, true).await?)
    }
}

fn to_body<T: Serialize>(request: &T) -> Result<Value, ServiceError> {
    Ok(serde_json::to_value(request)?)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ServiceError> {
    serde_json::from_value(value).map_err(|e| {
        warn!("Response did not match the expected shape: {}", e);
        ServiceError::from(e)
    })
}
