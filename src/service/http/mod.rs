mod error;

pub use error::HttpError;

use async_trait::async_trait;
use reqwest::{multipart::Form, Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::session::SessionService;

pub const DEFAULT_USER_AGENT: &str = concat!("creator-desk/", env!("CARGO_PKG_VERSION"));

/// Transport seam. Paths are relative to the API base and may carry a query
/// string. When `auth` is set and no credential is held the call fails with
/// [`HttpError::Unauthenticated`] before anything goes on the wire.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, path: &str, auth: bool) -> Result<Value, HttpError>;
    async fn post_json(&self, path: &str, body: Value, auth: bool) -> Result<Value, HttpError>;
    async fn post_multipart(&self, path: &str, fields: Vec<(String, String)>, auth: bool) -> Result<Value, HttpError>;
}

#[derive(Clone)]
pub struct HttpService {
    client: Client,
    base_url: String,
    session: SessionService,
}

impl HttpService {
    pub fn new(base_url: &Url, timeout: Duration, session: SessionService) -> Result<Self, HttpError> {
        info!("Initializing HttpService...");

        let client = Self::create_client(timeout)?;
        let base_url = base_url.as_str().trim_end_matches('/').to_string();

        info!("HttpService initialized for {}", base_url);
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    fn create_client(timeout: Duration) -> Result<Client, reqwest::Error> {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder, path: &str, auth: bool) -> Result<RequestBuilder, HttpError> {
        if !auth {
            return Ok(builder);
        }
        match self.session.token() {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => {
                warn!("Skipping {}: no session credential", path);
                Err(HttpError::Unauthenticated)
            }
        }
    }

    async fn send(&self, builder: RequestBuilder, method: &str, path: &str) -> Result<Value, HttpError> {
        debug!("{} {}", method, path);
        let response = builder.send().await.map_err(|e| {
            error!("{} {} failed: {}", method, path, e);
            HttpError::Transport(e)
        })?;
        handle_response(response).await
    }
}

#[async_trait]
impl HttpClient for HttpService {
    async fn get(&self, path: &str, auth: bool) -> Result<Value, HttpError> {
        let builder = self.authorize(self.client.get(self.url(path)), path, auth)?;
        self.send(builder, "GET", path).await
    }

    async fn post_json(&self, path: &str, body: Value, auth: bool) -> Result<Value, HttpError> {
        // reqwest sets Content-Type: application/json for `.json`
        let builder = self.authorize(self.client.post(self.url(path)).json(&body), path, auth)?;
        self.send(builder, "POST", path).await
    }

    async fn post_multipart(&self, path: &str, fields: Vec<(String, String)>, auth: bool) -> Result<Value, HttpError> {
        let form = fields
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));
        let builder = self.authorize(self.client.post(self.url(path)).multipart(form), path, auth)?;
        self.send(builder, "POST", path).await
    }
}

async fn handle_response(response: Response) -> Result<Value, HttpError> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = extract_error_message(status, &text);
        warn!("Request failed with {}: {}", status, message);
        return Err(HttpError::Status {
            status: status.as_u16(),
            message,
        });
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(Value::Null);
    }

    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    // Some endpoints answer 2xx with a plain-text acknowledgement.
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Message for a non-2xx response: the JSON body's `error` string when there is
/// one, otherwise the raw text, otherwise a generic line with the status code.
pub fn extract_error_message(status: StatusCode, text: &str) -> String {
    if let Ok(Value::Object(body)) = serde_json::from_str::<Value>(text) {
        if let Some(Value::String(error)) = body.get("error") {
            if !error.is_empty() {
                return error.clone();
            }
        }
    }

    if text.is_empty() {
        format!("Request failed ({})", status.as_u16())
    } else {
        text.to_string()
    }
}
