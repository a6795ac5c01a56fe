mod error;
mod model;

pub use error::AuthError;
pub use model::*;

use super::{session::SessionService, ApiClient, ServiceError};
use crate::{
    runtime::{EventLog, Source},
    utils::contains_ignore_case,
};

const EMAIL_NOT_VERIFIED: &str = "email not verified";

/// Account operations. All calls go out without a credential.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    session: SessionService,
    events: EventLog,
}

impl AuthService {
    pub fn new(api: ApiClient, session: SessionService, events: EventLog) -> Self {
        Self { api, session, events }
    }

    pub async fn register(&self, email: &str, password: &str, username: Option<&str>) -> Result<AuthOutcome, AuthError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            username: username.map(str::to_string),
        };
        let response = self.api.register(&request).await.inspect_err(|e| self.report(e))?;
        info!("Registered user {}", response.user_id);
        self.accept(response)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        match self.api.login(&request).await {
            Ok(response) => {
                info!("Logged in as user {}", response.user_id);
                self.accept(response)
            }
            Err(ServiceError::Request { message, .. }) if contains_ignore_case(&message, EMAIL_NOT_VERIFIED) => {
                warn!("Login refused: email not verified");
                self.events.error(Source::Auth, message.clone());
                Err(AuthError::EmailNotVerified(message))
            }
            Err(e) => {
                self.report(&e);
                Err(e.into())
            }
        }
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        self.api.verify_email(token).await.inspect_err(|e| self.report(e))?;
        self.events.info(Source::Auth, "Email verified.");
        Ok(())
    }

    pub async fn resend_verification(&self, email: &str) -> Result<(), AuthError> {
        let request = ResendVerificationRequest {
            email: email.to_string(),
        };
        self.api
            .resend_verification(&request)
            .await
            .inspect_err(|e| self.report(e))?;
        self.events.info(Source::Auth, "Verification email sent.");
        Ok(())
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.session.clear()?;
        Ok(())
    }

    fn accept(&self, response: AuthResponse) -> Result<AuthOutcome, AuthError> {
        let signed_in = match response.token.as_deref() {
            Some(token) if !token.is_empty() => {
                self.session.set_token(token)?;
                true
            }
            _ => false,
        };
        if response.verification_required {
            info!("User {} must verify their email", response.user_id);
        }
        Ok(AuthOutcome {
            user_id: response.user_id,
            verification_required: response.verification_required,
            signed_in,
        })
    }

    fn report(&self, err: &ServiceError) {
        if let Some(message) = err.user_message("Request failed") {
            error!("Auth request failed: {}", message);
            self.events.error(Source::Auth, message);
        }
    }
}
