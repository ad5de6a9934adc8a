//! Port for lead storage.
//!
//! Inserts run with the public (anonymous) role, which row-level security
//! limits to `insert`. Reads and updates carry the admin's [`AccessToken`]
//! so the hosted database can authorise them.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{AccessToken, Lead, LeadFilter, LeadId, LeadUpdate, NewLead};

use super::define_port_error;

define_port_error! {
    /// Errors raised by lead storage adapters.
    pub enum LeadRepositoryError {
        /// Backing service unreachable.
        Connection { message: String } => "lead store connection failed: {message}",
        /// Request failed on the backing service.
        Query { message: String } => "lead store query failed: {message}",
        /// Response body did not match the expected shape.
        Decode { message: String } => "lead store response could not be decoded: {message}",
        /// Token missing, expired, or refused by row-level security.
        Unauthorized { message: String } => "lead store rejected credentials: {message}",
    }
}

/// Lead persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadRepository: Send + Sync {
    /// Store a new lead with status `new`.
    async fn insert(&self, lead: &NewLead) -> Result<(), LeadRepositoryError>;

    /// Newest-first page of leads matching `filter`.
    async fn list(
        &self,
        token: &AccessToken,
        filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Page<Lead>, LeadRepositoryError>;

    /// Apply `update`; `None` when no lead has `id`.
    async fn update(
        &self,
        token: &AccessToken,
        id: LeadId,
        update: &LeadUpdate,
    ) -> Result<Option<Lead>, LeadRepositoryError>;

    /// Every lead matching `filter`, newest first, for CSV export.
    async fn export(
        &self,
        token: &AccessToken,
        filter: &LeadFilter,
    ) -> Result<Vec<Lead>, LeadRepositoryError>;
}

/// Accepts inserts and holds nothing; used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLeadRepository;

#[async_trait]
impl LeadRepository for FixtureLeadRepository {
    async fn insert(&self, _lead: &NewLead) -> Result<(), LeadRepositoryError> {
        Ok(())
    }

    async fn list(
        &self,
        _token: &AccessToken,
        _filter: &LeadFilter,
        page: PageRequest,
    ) -> Result<Page<Lead>, LeadRepositoryError> {
        Ok(Page::empty(page))
    }

    async fn update(
        &self,
        _token: &AccessToken,
        _id: LeadId,
        _update: &LeadUpdate,
    ) -> Result<Option<Lead>, LeadRepositoryError> {
        Ok(None)
    }

    async fn export(
        &self,
        _token: &AccessToken,
        _filter: &LeadFilter,
    ) -> Result<Vec<Lead>, LeadRepositoryError> {
        Ok(Vec::new())
    }
}
