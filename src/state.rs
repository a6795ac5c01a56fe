use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::DeskResult,
    service::{Navigator, ServiceRegistry, SessionGate},
    storage::FileStore,
    terminal::{SystemLauncher, TerminalNavigator},
    view::{DashboardView, GenerateView},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: ServiceRegistry,
    navigator: Arc<dyn Navigator>,
}

impl AppState {
    pub fn new(config: AppConfig) -> DeskResult<Self> {
        info!("Initializing AppState...");

        let store = FileStore::new(&config.session.store_dir);
        let services = ServiceRegistry::new(&config, Arc::new(store), Arc::new(SystemLauncher))?;

        info!("AppState initialized");
        Ok(Self {
            config,
            services,
            navigator: Arc::new(TerminalNavigator),
        })
    }

    pub fn gate(&self) -> SessionGate {
        SessionGate::new(self.services.session.clone(), self.navigator.clone())
    }

    pub fn dashboard(&self) -> DashboardView {
        DashboardView::new(&self.services, self.gate())
    }

    pub fn generate(&self) -> GenerateView {
        GenerateView::new(&self.services, self.gate())
    }
}
