//! Shared PostgREST transport.
//!
//! Owns the reqwest client, header conventions and status mapping for every
//! table adapter. Adapters describe *what* to fetch; this module decides how
//! the request is authorised and how failures are classified.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url, header};
use serde::de::DeserializeOwned;

use crate::domain::AccessToken;
use crate::domain::ports::define_port_error;

const BODY_PREVIEW_CHARS: usize = 160;
const USER_AGENT: &str = concat!("site-backend/", env!("CARGO_PKG_VERSION"));

define_port_error! {
    /// Transport-level failure shared by the table adapters.
    pub enum RestError {
        /// Request never completed.
        Connection { message: String } => "connection failed: {message}",
        /// Non-success status other than 401/403.
        Query { message: String } => "request failed: {message}",
        /// Body or header did not have the expected shape.
        Decode { message: String } => "unexpected response: {message}",
        /// Token refused.
        Unauthorized { message: String } => "credentials rejected: {message}",
    }
}

/// Convert [`RestError`] into each port's error enum, variant for variant.
macro_rules! rest_error_into_port {
    ($($port:ty),+ $(,)?) => {
        $(
            impl From<$crate::outbound::supabase::client::RestError> for $port {
                fn from(err: $crate::outbound::supabase::client::RestError) -> Self {
                    use $crate::outbound::supabase::client::RestError;
                    match err {
                        RestError::Connection { message } => Self::connection(message),
                        RestError::Query { message } => Self::query(message),
                        RestError::Decode { message } => Self::decode(message),
                        RestError::Unauthorized { message } => Self::unauthorized(message),
                    }
                }
            }
        )+
    };
}

pub(crate) use rest_error_into_port;

/// Who the request acts for.
#[derive(Clone, Copy)]
pub(crate) enum Caller<'a> {
    /// Public visitor: the anon key is both `apikey` and bearer.
    Anonymous,
    /// Signed-in admin: row-level security sees their token.
    Admin(&'a AccessToken),
}

/// `Prefer` header values used by the adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Prefer {
    Minimal,
    Representation,
    CountExact,
}

impl Prefer {
    const fn header(self) -> &'static str {
        match self {
            Self::Minimal => "return=minimal",
            Self::Representation => "return=representation",
            Self::CountExact => "count=exact",
        }
    }
}

/// Connection settings for the hosted project.
#[derive(Clone, Debug)]
pub struct SupabaseSettings {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: Url,
    /// Public anon key.
    pub anon_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Cloneable handle over one HTTP connection pool.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base: Url,
    anon_key: Arc<str>,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: SupabaseSettings) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let mut base = settings.url;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http,
            base,
            anon_key: Arc::from(settings.anon_key),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RestError> {
        self.base
            .join(path)
            .map_err(|err| RestError::query(format!("invalid endpoint {path}: {err}")))
    }

    fn authorised(&self, builder: RequestBuilder, caller: Caller<'_>) -> RequestBuilder {
        let bearer = match caller {
            Caller::Anonymous => &*self.anon_key,
            Caller::Admin(token) => token.expose(),
        };
        builder
            .header("apikey", &*self.anon_key)
            .bearer_auth(bearer)
            .header(header::ACCEPT, "application/json")
    }

    /// Request against `/rest/v1/{table}`.
    pub(crate) fn table(
        &self,
        method: Method,
        table: &str,
        caller: Caller<'_>,
    ) -> Result<RequestBuilder, RestError> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        Ok(self.authorised(self.http.request(method, url), caller))
    }

    /// Request against `/auth/v1/{path}`.
    pub(crate) fn auth(
        &self,
        path: &str,
        caller: Caller<'_>,
    ) -> Result<RequestBuilder, RestError> {
        let url = self.endpoint(&format!("auth/v1/{path}"))?;
        Ok(self.authorised(self.http.post(url), caller))
    }

    /// Send and classify the outcome. Non-success statuses become errors.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<RestResponse, RestError> {
        let raw = self.send_raw(request).await?;
        if raw.status.is_success() {
            Ok(raw)
        } else {
            Err(map_status_error(raw.status, &raw.body))
        }
    }

    /// Send a counted listing and decode its rows and total.
    ///
    /// PostgREST answers an offset past the last row with 416; that is an
    /// empty slice of a shorter listing, not a failure.
    pub(crate) async fn send_counted<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<(Vec<T>, u64), RestError> {
        let raw = self
            .send_raw(with_prefer(request, Prefer::CountExact))
            .await?;
        if raw.status == StatusCode::RANGE_NOT_SATISFIABLE {
            let total = raw
                .content_range
                .as_deref()
                .and_then(parse_content_range)
                .unwrap_or(0);
            return Ok((Vec::new(), total));
        }
        if !raw.status.is_success() {
            return Err(map_status_error(raw.status, &raw.body));
        }
        Ok((raw.json()?, raw.total()?))
    }

    /// Send and return the response whatever its status.
    pub(crate) async fn send_raw(&self, request: RequestBuilder) -> Result<RestResponse, RestError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(map_transport_error)?
            .to_vec();
        Ok(RestResponse {
            status,
            content_range,
            body,
        })
    }
}

pub(crate) fn with_prefer(builder: RequestBuilder, prefer: Prefer) -> RequestBuilder {
    builder.header("Prefer", prefer.header())
}

/// Buffered response.
#[derive(Debug)]
pub(crate) struct RestResponse {
    pub(crate) status: StatusCode,
    content_range: Option<String>,
    pub(crate) body: Vec<u8>,
}

impl RestResponse {
    /// Decode the JSON body.
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T, RestError> {
        serde_json::from_slice(&self.body)
            .map_err(|err| RestError::decode(format!("invalid JSON payload: {err}")))
    }

    /// Total row count from `Content-Range`.
    pub(crate) fn total(&self) -> Result<u64, RestError> {
        let header = self
            .content_range
            .as_deref()
            .ok_or_else(|| RestError::decode("missing Content-Range header"))?;
        parse_content_range(header)
            .ok_or_else(|| RestError::decode(format!("malformed Content-Range {header:?}")))
    }

    /// Truncated body for logs and error messages.
    pub(crate) fn preview(&self) -> String {
        body_preview(&self.body)
    }
}

/// Total from a PostgREST `Content-Range` (`0-24/137`, `*/0`).
fn parse_content_range(raw: &str) -> Option<u64> {
    let (_, total) = raw.trim().rsplit_once('/')?;
    total.parse().ok()
}

fn map_transport_error(error: reqwest::Error) -> RestError {
    RestError::connection(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RestError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RestError::unauthorized(message),
        _ => RestError::query(message),
    }
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(BODY_PREVIEW_CHARS).collect();
    if compact.chars().count() > BODY_PREVIEW_CHARS {
        format!("{preview}...")
    } else {
        preview
    }
}
