//! Driving port for administrator authentication.
//!
//! Credentials and token lifecycles belong to the hosted auth service; this
//! port only exchanges them for [`AdminSession`] values.

use async_trait::async_trait;

use crate::domain::{AccessToken, AdminCredentials, AdminSession, Error, RefreshToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by authentication adapters.
    pub enum AdminAuthError {
        /// Email/password pair refused.
        InvalidCredentials => "invalid email or password",
        /// Refresh token expired or revoked.
        RefreshRejected => "session refresh was rejected",
        /// Auth service unreachable.
        Connection { message: String } => "auth service connection failed: {message}",
        /// Auth service answered with something unexpected.
        Unexpected { message: String } => "auth service returned an unexpected response: {message}",
    }
}

impl From<AdminAuthError> for Error {
    fn from(err: AdminAuthError) -> Self {
        match err {
            AdminAuthError::InvalidCredentials => Self::unauthorized("invalid email or password"),
            AdminAuthError::RefreshRejected => Self::unauthorized("session expired"),
            other => Self::internal(other.to_string()),
        }
    }
}

/// Exchange credentials and tokens with the auth provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminAuthService: Send + Sync {
    /// Password sign-in.
    async fn sign_in(&self, credentials: &AdminCredentials) -> Result<AdminSession, AdminAuthError>;

    /// Swap a refresh token for a new session.
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<AdminSession, AdminAuthError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &AccessToken) -> Result<(), AdminAuthError>;
}

/// Refuses every sign-in; used when no auth provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdminAuthService;

#[async_trait]
impl AdminAuthService for FixtureAdminAuthService {
    async fn sign_in(&self, _credentials: &AdminCredentials) -> Result<AdminSession, AdminAuthError> {
        Err(AdminAuthError::invalid_credentials())
    }

    async fn refresh(&self, _refresh_token: &RefreshToken) -> Result<AdminSession, AdminAuthError> {
        Err(AdminAuthError::refresh_rejected())
    }

    async fn sign_out(&self, _access_token: &AccessToken) -> Result<(), AdminAuthError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(AdminAuthError::invalid_credentials(), ErrorCode::Unauthorized)]
    #[case(AdminAuthError::refresh_rejected(), ErrorCode::Unauthorized)]
    #[case(AdminAuthError::connection("timeout"), ErrorCode::InternalError)]
    #[case(AdminAuthError::unexpected("html"), ErrorCode::InternalError)]
    fn maps_to_domain_codes(#[case] err: AdminAuthError, #[case] expected: ErrorCode) {
        assert_eq!(Error::from(err).code(), expected);
    }

    #[tokio::test]
    async fn fixture_refuses_sign_in() {
        let creds = AdminCredentials::new("ops@example.com", "pw").expect("creds");
        let result = FixtureAdminAuthService.sign_in(&creds).await;
        assert_eq!(result, Err(AdminAuthError::InvalidCredentials));
    }
}
