//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ShortenerService;
use crate::domain::deletion_worker::DeletionPool;
use crate::domain::repositories::RecordRepository;
use crate::utils::trusted_subnet::TrustedSubnet;

/// Shortener service over whichever backend was selected at startup.
pub type DynShortenerService = ShortenerService<dyn RecordRepository>;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<DynShortenerService>,
    /// Prefix joined with a key to form the returned short URL.
    pub base_url: Arc<str>,
    pub trusted_subnet: TrustedSubnet,
}

impl AppState {
    /// Builds the service graph around `repository` and an already started pool.
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        deletion_pool: Arc<DeletionPool>,
        base_url: &str,
        trusted_subnet: TrustedSubnet,
    ) -> Self {
        Self {
            shortener: Arc::new(ShortenerService::new(repository, deletion_pool)),
            base_url: Arc::from(base_url.trim_end_matches('/')),
            trusted_subnet,
        }
    }

    /// Full short URL for `key`.
    pub fn short_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}
