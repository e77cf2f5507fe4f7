use std::sync::Arc;

use langop_cache::CapabilityCache;
use langop_client::OrchestratorClient;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn OrchestratorClient>,
    pub cache: Arc<CapabilityCache>,
    pub auth_token: Arc<String>,
}
