//! `dealers` table adapter.
//!
//! City and state matching happens in process through
//! [`DealerFilter::matches`]: the directory is small, and exact
//! case-insensitive equality is awkward to express safely with `ilike`.

use async_trait::async_trait;
use reqwest::Method;

use super::client::{Caller, SupabaseClient, rest_error_into_port};
use super::dto::DealerRow;
use crate::domain::ports::{DealerRepository, DealerRepositoryError};
use crate::domain::{Dealer, DealerFilter};

rest_error_into_port!(DealerRepositoryError);

const TABLE: &str = "dealers";
const DIRECTORY_ORDER: &str = "state.asc,city.asc,name.asc";

/// Dealer directory over PostgREST.
#[derive(Clone, Debug)]
pub struct SupabaseDealerRepository {
    client: SupabaseClient,
}

impl SupabaseDealerRepository {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    async fn active(&self, extra: &[(&str, &str)]) -> Result<Vec<Dealer>, DealerRepositoryError> {
        let request = self
            .client
            .table(Method::GET, TABLE, Caller::Anonymous)?
            .query(&[
                ("select", "*"),
                ("active", "eq.true"),
                ("order", DIRECTORY_ORDER),
            ])
            .query(extra);
        let rows: Vec<DealerRow> = self.client.send(request).await?.json()?;
        Ok(rows.into_iter().map(Dealer::from).collect())
    }
}

#[async_trait]
impl DealerRepository for SupabaseDealerRepository {
    async fn list(&self, filter: &DealerFilter) -> Result<Vec<Dealer>, DealerRepositoryError> {
        let dealers = self.active(&[]).await?;
        Ok(dealers
            .into_iter()
            .filter(|dealer| filter.matches(dealer))
            .collect())
    }

    async fn with_coordinates(&self) -> Result<Vec<Dealer>, DealerRepositoryError> {
        let dealers = self
            .active(&[("latitude", "not.is.null"), ("longitude", "not.is.null")])
            .await?;
        Ok(dealers
            .into_iter()
            .filter(|dealer| dealer.location.is_some())
            .collect())
    }
}
