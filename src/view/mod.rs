mod dashboard;
mod generate;
mod model;

pub use dashboard::DashboardView;
pub use generate::GenerateView;
pub use model::*;

use std::sync::{Arc, Mutex};

use crate::runtime::ActivationScope;

/// The scope of the current activation. Starting a new one cancels the old.
#[derive(Default)]
struct ScopeSlot(Mutex<Option<Arc<ActivationScope>>>);

impl ScopeSlot {
    fn begin(&self) -> Arc<ActivationScope> {
        let scope = Arc::new(ActivationScope::new());
        let previous = self
            .0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .replace(Arc::clone(&scope));
        if let Some(previous) = previous {
            previous.cancel();
        }
        scope
    }

    fn current(&self) -> Option<Arc<ActivationScope>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn settle(&self) {
        if let Some(scope) = self.current() {
            scope.settle().await;
        }
    }

    /// Cancels the current scope and waits until its tasks are gone.
    async fn end(&self) {
        let scope = self.0.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(scope) = scope {
            scope.cancel();
            scope.settle().await;
        }
    }
}
