use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub user_id: i64,
    #[serde(default)]
    pub verification_required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub user_id: i64,
    pub verification_required: bool,
    /// A credential came back and was stored.
    pub signed_in: bool,
}
