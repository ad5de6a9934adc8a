//! Dealer locator.

use std::sync::Arc;

use tracing::debug;

use super::ports::DealerRepository;
use super::{Dealer, DealerFilter, Error, NearbyDealer, NearbyQuery, nearest_dealers};

/// Dealer search by region and by proximity.
#[derive(Clone)]
pub struct DealerLocatorService {
    repository: Arc<dyn DealerRepository>,
}

impl DealerLocatorService {
    /// Wire the service to its repository.
    pub fn new(repository: Arc<dyn DealerRepository>) -> Self {
        Self { repository }
    }

    /// Dealers in a city and/or state.
    pub async fn search(&self, filter: &DealerFilter) -> Result<Vec<Dealer>, Error> {
        Ok(self.repository.list(filter).await?)
    }

    /// Dealers within the query radius, nearest first.
    pub async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<NearbyDealer>, Error> {
        let candidates = self.repository.with_coordinates().await?;
        let total = candidates.len();
        let hits = nearest_dealers(candidates, query);
        debug!(candidates = total, hits = hits.len(), radius_km = query.radius_km(), "nearby dealer search");
        Ok(hits)
    }
}
