mod error;
mod gate;

pub use error::SessionError;
pub use gate::{GateDecision, Navigator, SessionGate, LOGIN_PATH};

use std::sync::Arc;

use crate::storage::{CredentialStore, MemoryStore};

const TOKEN_KEY: &str = "auth_token";

/// Consults the credential store. The store itself (and how it persists) is
/// someone else's business; this service only reads presence and swaps tokens.
#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn CredentialStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        info!("Initializing session service");
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// A store that cannot be read is treated as signed out.
    pub fn token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                error!("Failed to read session credential: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.store.set(TOKEN_KEY, token)?;
        info!("Session credential stored");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.del(TOKEN_KEY)?;
        info!("Session credential cleared");
        Ok(())
    }
}
