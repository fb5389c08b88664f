use crate::config::AppConfig;

/// Shared server state. The mock provider is stateless (status is derived
/// from the prediction id itself), so only the configuration lives here.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}
