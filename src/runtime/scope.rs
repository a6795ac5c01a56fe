use std::{future::Future, sync::Mutex};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Owns every request launched by one view activation. Cancelling (or dropping)
/// the scope aborts whatever is still outstanding, so a late response never
/// writes into the state of a view that has gone away.
pub struct ActivationScope {
    token: CancellationToken,
    tasks: Mutex<JoinSet<()>>,
}

impl ActivationScope {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Launches `fut` without waiting for it. Must be called inside a tokio runtime.
    pub fn spawn<F>(&self, name: &'static str, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.token.is_cancelled() {
            debug!("Scope already cancelled, not starting {}", name);
            return;
        }
        let token = self.token.clone();
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => debug!("{} cancelled", name),
                _ = fut => debug!("{} finished", name),
            }
        });
    }

    /// Waits for everything launched so far.
    pub async fn settle(&self) {
        let mut tasks = {
            let mut guard = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::replace(&mut *guard, JoinSet::new())
        };
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                if !e.is_cancelled() {
                    error!("Activation task failed: {}", e);
                }
            }
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
        let mut tasks = self.tasks.lock().unwrap_or_else(|e| e.into_inner());
        tasks.abort_all();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Default for ActivationScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ActivationScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
