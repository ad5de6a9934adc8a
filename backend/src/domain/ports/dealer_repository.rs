//! Port for the dealer directory.

use async_trait::async_trait;

use crate::domain::{Dealer, DealerFilter};

use super::define_port_error;

define_port_error! {
    /// Errors raised by dealer directory adapters.
    pub enum DealerRepositoryError {
        /// Backing service unreachable.
        Connection { message: String } => "dealer directory connection failed: {message}",
        /// Request failed on the backing service.
        Query { message: String } => "dealer directory query failed: {message}",
        /// Response body did not match the expected shape.
        Decode { message: String } => "dealer directory response could not be decoded: {message}",
        /// Anonymous key refused.
        Unauthorized { message: String } => "dealer directory rejected credentials: {message}",
    }
}

/// Read access to active dealers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DealerRepository: Send + Sync {
    /// Dealers matching `filter`, ordered by state, city, name.
    async fn list(&self, filter: &DealerFilter) -> Result<Vec<Dealer>, DealerRepositoryError>;

    /// Dealers that have coordinates, for proximity search.
    async fn with_coordinates(&self) -> Result<Vec<Dealer>, DealerRepositoryError>;
}

/// Empty directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDealerRepository;

#[async_trait]
impl DealerRepository for FixtureDealerRepository {
    async fn list(&self, _filter: &DealerFilter) -> Result<Vec<Dealer>, DealerRepositoryError> {
        Ok(Vec::new())
    }

    async fn with_coordinates(&self) -> Result<Vec<Dealer>, DealerRepositoryError> {
        Ok(Vec::new())
    }
}
