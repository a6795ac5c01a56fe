use std::sync::Arc;

use super::SessionService;

pub const LOGIN_PATH: &str = "/login";

/// Routing is owned by the presentation layer.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Redirected,
}

/// Precondition check run once per view activation. Never fetches anything.
#[derive(Clone)]
pub struct SessionGate {
    session: SessionService,
    navigator: Arc<dyn Navigator>,
}

impl SessionGate {
    pub fn new(session: SessionService, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    pub fn check(&self) -> GateDecision {
        if self.session.is_authenticated() {
            GateDecision::Proceed
        } else {
            info!("No session credential, redirecting to {}", LOGIN_PATH);
            self.navigator.redirect(LOGIN_PATH);
            GateDecision::Redirected
        }
    }
}
