//! `leads` table adapter.

use async_trait::async_trait;
use pagination::{Page, PageRequest};
use reqwest::Method;
use serde::Serialize;

use super::client::{Caller, Prefer, SupabaseClient, rest_error_into_port, with_prefer};
use super::dto::{LeadInsert, LeadRow};
use crate::domain::ports::{LeadRepository, LeadRepositoryError};
use crate::domain::{AccessToken, Lead, LeadFilter, LeadId, LeadStatus, LeadUpdate, NewLead};

rest_error_into_port!(LeadRepositoryError);

const TABLE: &str = "leads";
const NEWEST_FIRST: &str = "created_at.desc";

/// Lead storage over PostgREST.
#[derive(Clone, Debug)]
pub struct SupabaseLeadRepository {
    client: SupabaseClient,
}

impl SupabaseLeadRepository {
    /// Wrap a shared client.
    #[must_use]
    pub const fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

/// PostgREST query pairs for a lead filter.
pub(super) fn filter_params(filter: &LeadFilter) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(status) = filter.status {
        params.push(("status", format!("eq.{status}")));
    }
    if let Some(term) = &filter.search {
        let term = term.as_ref();
        params.push((
            "or",
            format!(
                "(name.ilike.*{term}*,email.ilike.*{term}*,phone.ilike.*{term}*,city.ilike.*{term}*)"
            ),
        ));
    }
    params
}

#[derive(Serialize)]
struct LeadPatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<&'a str>,
}

#[async_trait]
impl LeadRepository for SupabaseLeadRepository {
    async fn insert(&self, lead: &NewLead) -> Result<(), LeadRepositoryError> {
        let request = self
            .client
            .table(Method::POST, TABLE, Caller::Anonymous)?
            .json(&LeadInsert::from(lead));
        self.client.send(with_prefer(request, Prefer::Minimal)).await?;
        Ok(())
    }

    async fn list(
        &self,
        token: &AccessToken,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Page<Lead>, LeadRepositoryError> {
        let mut params = filter_params(filter);
        params.extend([
            ("select", "*".to_owned()),
            ("order", NEWEST_FIRST.to_owned()),
            ("offset", page.offset().to_string()),
            ("limit", page.limit().to_string()),
        ]);
        let request = self
            .client
            .table(Method::GET, TABLE, Caller::Admin(token))?
            .query(&params);
        let (rows, total): (Vec<LeadRow>, u64) = self.client.send_counted(request).await?;
        Ok(Page::new(rows.into_iter().map(Lead::from).collect(), page, total))
    }

    async fn update(
        &self,
        token: &AccessToken,
        id: LeadId,
        update: &LeadUpdate,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        let request = self
            .client
            .table(Method::PATCH, TABLE, Caller::Admin(token))?
            .query(&[("id", format!("eq.{id}")), ("select", "*".to_owned())])
            .json(&LeadPatchBody {
                status: update.status(),
                notes: update.notes(),
            });
        let response = self
            .client
            .send(with_prefer(request, Prefer::Representation))
            .await?;
        let rows: Vec<LeadRow> = response.json()?;
        Ok(rows.into_iter().next().map(Lead::from))
    }

    async fn export(
        &self,
        token: &AccessToken,
        filter: &LeadFilter,
    ) -> Result<Vec<Lead>, LeadRepositoryError> {
        let mut params = filter_params(filter);
        params.extend([("select", "*".to_owned()), ("order", NEWEST_FIRST.to_owned())]);
        let request = self
            .client
            .table(Method::GET, TABLE, Caller::Admin(token))?
            .query(&params);
        let rows: Vec<LeadRow> = self.client.send(request).await?.json()?;
        Ok(rows.into_iter().map(Lead::from).collect())
    }
}
