//! Administrator authentication primitives.
//!
//! Admins sign in against the hosted auth service; the resulting tokens are
//! kept in the encrypted session cookie and forwarded on admin data calls so
//! row-level security applies.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::validation::FieldViolation;
use super::{ContactValidationError, EmailAddress};

/// Seconds before expiry at which a session is treated as expired.
pub const SESSION_REFRESH_LEEWAY_SECS: i64 = 30;

/// Login payload rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    /// Email missing or malformed.
    #[error(transparent)]
    Email(#[from] ContactValidationError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl FieldViolation for CredentialsError {
    fn code(&self) -> &'static str {
        match self {
            Self::Email(inner) => inner.code(),
            Self::EmptyPassword => "required",
        }
    }
}

/// Email and password submitted on the admin login page.
///
/// # Examples
/// ```
/// use site_backend::domain::AdminCredentials;
///
/// let creds = AdminCredentials::new("Ops@Example.com", "hunter2").unwrap();
/// assert_eq!(creds.email().as_ref(), "ops@example.com");
/// assert!(AdminCredentials::new("ops@example.com", "").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl AdminCredentials {
    /// Validate raw inputs. The password keeps surrounding whitespace.
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Raw password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

macro_rules! secret_token {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw token.
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            /// Raw token for outbound headers.
            #[must_use]
            pub fn expose(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(<redacted>)"))
            }
        }
    };
}

secret_token!(
    /// Bearer token proving an admin's identity to the hosted service.
    AccessToken
);
secret_token!(
    /// Long-lived token exchanged for a fresh [`AccessToken`].
    RefreshToken
);

/// Signed-in administrator, persisted in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSession {
    pub user_id: String,
    pub email: EmailAddress,
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    /// Whether the access token is expired or about to expire at `now`.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now + Duration::seconds(SESSION_REFRESH_LEEWAY_SECS)
    }
}

/// Emails permitted to use the dashboard. An empty list admits anyone the
/// auth service accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList(HashSet<String>);

impl AdminAllowList {
    /// Parse a comma separated list; entries are trimmed and lower-cased.
    ///
    /// # Examples
    /// ```
    /// use site_backend::domain::{AdminAllowList, EmailAddress};
    ///
    /// let list = AdminAllowList::parse(" Sales@Example.com, ops@example.com ,");
    /// assert!(list.permits(&EmailAddress::new("sales@example.com").unwrap()));
    /// assert!(!list.permits(&EmailAddress::new("intruder@example.com").unwrap()));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(|entry| entry.trim().to_lowercase())
                .filter(|entry| !entry.is_empty())
                .collect(),
        )
    }

    /// Whether `email` may sign in.
    #[must_use]
    pub fn permits(&self, email: &EmailAddress) -> bool {
        self.0.is_empty() || self.0.contains(email.as_ref())
    }
}
