use std::sync::Arc;

use crate::config::Config;
use crate::repository::ReservationRepository;

/// Shared state handed to every route through an `Extension` layer.
#[derive(Clone)]
pub struct AppContext {
    pub repo: Arc<dyn ReservationRepository>,
    pub config: Arc<Config>,
}

impl AppContext {
    pub fn new(repo: Arc<dyn ReservationRepository>, config: Config) -> Self {
        Self {
            repo,
            config: Arc::new(config),
        }
    }
}
