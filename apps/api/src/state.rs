use std::sync::Arc;

use crate::config::Config;
use crate::opportunities::service::OpportunityService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Cached aggregation snapshot plus the query engine over it.
    pub opportunities: Arc<OpportunityService>,
}
