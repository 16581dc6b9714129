use std::sync::Arc;

use crate::generation::orchestrator::StageSettings;
use crate::llm_client::TextCompleter;
use crate::profiles::ProfileCache;

/// Shared application state passed to every tailoring run.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn TextCompleter>,
    /// Explicit profile cache. Writes go through it so stale entries are evicted.
    pub profiles: Arc<ProfileCache>,
    pub settings: StageSettings,
}
