use crate::error::SearchError;

pub mod client;
pub mod models;

use models::{HealthResponse, SearchResponse};

/// The remote search service as seen from the page.
///
/// Implementations return the decoded body for any 2xx answer, including
/// `success: false`; non-2xx answers become [`SearchError::Service`].
#[allow(async_fn_in_trait)]
pub trait SearchService {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;

    async fn health(&self) -> Result<HealthResponse, SearchError>;
}

/// Logs the service health. Never fails and never touches the page.
pub async fn probe_health<S: SearchService>(service: &S) {
    match service.health().await {
        Ok(health) if health.is_healthy() => {
            log::info!("search service healthy");
            if health.summarizer_available == Some(false) {
                log::info!("summaries unavailable, results will render without one");
            }
        }
        Ok(health) => {
            log::warn!(
                "search service degraded: status={}, vector_store_available={}",
                health.status,
                health.vector_store_available
            );
        }
        Err(e) => {
            log::warn!("health check failed: {:#}", e);
        }
    }
}
