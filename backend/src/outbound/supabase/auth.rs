//! GoTrue password and refresh-token grants.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::{Caller, RestError, RestResponse, SupabaseClient};
use crate::domain::ports::{AdminAuthError, AdminAuthService};
use crate::domain::{AccessToken, AdminCredentials, AdminSession, EmailAddress, RefreshToken};

impl From<RestError> for AdminAuthError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Connection { message } => Self::connection(message),
            other => Self::unexpected(other.to_string()),
        }
    }
}

/// Admin authentication against the hosted auth service.
#[derive(Clone)]
pub struct SupabaseAuthService {
    client: SupabaseClient,
    clock: Arc<dyn Clock>,
}

impl SupabaseAuthService {
    /// Wrap a shared client; `clock` turns `expires_in` into an instant.
    #[must_use]
    pub fn new(client: SupabaseClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    async fn grant<B: Serialize + Sync>(
        &self,
        grant_type: &str,
        body: &B,
    ) -> Result<RestResponse, AdminAuthError> {
        let request = self
            .client
            .auth("token", Caller::Anonymous)?
            .query(&[("grant_type", grant_type)])
            .json(body);
        Ok(self.client.send_raw(request).await?)
    }

    fn session(&self, response: &RestResponse) -> Result<AdminSession, AdminAuthError> {
        let grant: TokenGrant = response.json()?;
        grant.into_session(self.clock.utc())
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Deserialize)]
struct TokenGrant {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
    user: GrantUser,
}

#[derive(Deserialize)]
struct GrantUser {
    id: String,
    email: Option<String>,
}

impl TokenGrant {
    fn into_session(self, now: DateTime<Utc>) -> Result<AdminSession, AdminAuthError> {
        let email = self
            .user
            .email
            .ok_or_else(|| AdminAuthError::unexpected("token grant has no user email"))
            .and_then(|raw| {
                EmailAddress::new(raw)
                    .map_err(|err| AdminAuthError::unexpected(format!("user email: {err}")))
            })?;
        Ok(AdminSession {
            user_id: self.user.id,
            email,
            access_token: AccessToken::new(self.access_token),
            refresh_token: RefreshToken::new(self.refresh_token),
            expires_at: now + Duration::seconds(self.expires_in.max(0)),
        })
    }
}

/// Grant refusals come back as 400 (`invalid_grant`) or 401.
fn refused(status: StatusCode) -> bool {
    matches!(status, StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED)
}

fn unexpected(response: &RestResponse) -> AdminAuthError {
    AdminAuthError::unexpected(format!(
        "status {}: {}",
        response.status.as_u16(),
        response.preview()
    ))
}

#[async_trait]
impl AdminAuthService for SupabaseAuthService {
    async fn sign_in(&self, credentials: &AdminCredentials) -> Result<AdminSession, AdminAuthError> {
        let response = self
            .grant(
                "password",
                &PasswordGrant {
                    email: credentials.email().as_ref(),
                    password: credentials.password(),
                },
            )
            .await?;
        match response.status {
            status if status.is_success() => self.session(&response),
            status if refused(status) => Err(AdminAuthError::invalid_credentials()),
            _ => Err(unexpected(&response)),
        }
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<AdminSession, AdminAuthError> {
        let response = self
            .grant(
                "refresh_token",
                &RefreshGrant {
                    refresh_token: refresh_token.expose(),
                },
            )
            .await?;
        match response.status {
            status if status.is_success() => self.session(&response),
            status if refused(status) => Err(AdminAuthError::refresh_rejected()),
            _ => Err(unexpected(&response)),
        }
    }

    async fn sign_out(&self, access_token: &AccessToken) -> Result<(), AdminAuthError> {
        let request = self.client.auth("logout", Caller::Admin(access_token))?;
        let response = self.client.send_raw(request).await?;
        match response.status {
            status if status.is_success() => Ok(()),
            // Token already expired or revoked: nothing left to end.
            status if refused(status) || status == StatusCode::FORBIDDEN => {
                debug!(status = status.as_u16(), "sign-out found no live session");
                Ok(())
            }
            _ => Err(unexpected(&response)),
        }
    }
}
