//! Admin sign-in, sign-out and session introspection.
//!
//! ```text
//! POST /api/admin/login {"email":"ops@example.com","password":"..."}
//! POST /api/admin/logout
//! GET  /api/admin/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{AdminCredentials, AdminSession, CredentialsError, Error, ValidationReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_store_header;
use crate::inbound::http::session::{AuthenticatedAdmin, SessionContext};
use crate::inbound::http::state::HttpState;

/// Login form body.
#[derive(Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "ops@example.com")]
    pub email: Option<String>,
    #[schema(example = "correct horse battery staple", format = Password)]
    pub password: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginRequest {
    fn into_credentials(self) -> Result<AdminCredentials, Error> {
        let email = self.email.unwrap_or_default();
        let password = Zeroizing::new(self.password.unwrap_or_default());
        AdminCredentials::new(&email, &password).map_err(|err| {
            let field = match err {
                CredentialsError::Email(_) => "email",
                CredentialsError::EmptyPassword => "password",
            };
            let mut report = ValidationReport::default();
            report.check::<(), _>(field, Err(err));
            report.into_error()
        })
    }
}

/// Public view of the signed-in admin. Tokens never leave the cookie.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub user_id: String,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&AdminSession> for SessionInfo {
    fn from(session: &AdminSession) -> Self {
        Self {
            user_id: session.user_id.clone(),
            email: session.email.to_string(),
            expires_at: session.expires_at,
        }
    }
}

/// Sign in and start a session.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = SessionInfo,
            headers(("Set-Cookie" = String, description = "Encrypted session cookie"))),
        (status = 400, description = "Malformed email or empty password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account not on the admin allow-list", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = payload.into_inner().into_credentials()?;
    let admin = state.admin.sign_in(&credentials).await?;
    session.persist_admin(&admin)?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(SessionInfo::from(&admin)))
}

/// End the session. Always succeeds.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["admin"],
    operation_id = "adminLogout",
    security([])
)]
#[post("/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> HttpResponse {
    if let Ok(Some(admin)) = session.admin() {
        state.admin.sign_out(&admin).await;
    }
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The signed-in admin.
#[utoipa::path(
    get,
    path = "/api/admin/session",
    responses(
        (status = 200, description = "Current session", body = SessionInfo),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSession",
    security(("SessionCookie" = []))
)]
#[get("/session")]
pub async fn current_session(admin: AuthenticatedAdmin) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(private_no_store_header())
        .json(SessionInfo::from(&admin.0))
}
