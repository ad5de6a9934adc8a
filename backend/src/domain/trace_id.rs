//! Request correlation identifier.
//!
//! A [`TraceId`] is bound to the task serving a request so log lines and
//! error payloads produced deep inside services carry the same id as the
//! `trace-id` response header. Task-locals do not follow `tokio::spawn`;
//! wrap spawned work in [`TraceId::scope`].

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Response (and optional request) header carrying the trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Per-request trace identifier.
///
/// # Examples
/// ```
/// use site_backend::domain::TraceId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let id: TraceId = "6f1c1b9e-2d1e-4c55-9a8f-5b8a1d0c2e11".parse().unwrap();
/// let seen = TraceId::scope(id, async { TraceId::current() }).await;
/// assert_eq!(seen, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse an identifier supplied by an upstream proxy when it is a UUID.
    ///
    /// Anything else (missing, blank, malformed) yields a fresh identifier so
    /// clients cannot inject arbitrary strings into logs.
    #[must_use]
    pub fn from_upstream(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// The identifier bound to the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` bound as the current identifier.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const UPSTREAM: &str = "6f1c1b9e-2d1e-4c55-9a8f-5b8a1d0c2e11";

    #[tokio::test]
    async fn current_is_bound_inside_scope_only() {
        let id = TraceId::generate();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    fn upstream_uuid_is_reused() {
        let id = TraceId::from_upstream(Some(UPSTREAM));
        assert_eq!(id.to_string(), UPSTREAM);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("<script>"))]
    fn unusable_upstream_values_are_replaced(#[case] raw: Option<&str>) {
        let id = TraceId::from_upstream(raw);
        assert_ne!(id.to_string(), raw.unwrap_or_default());
        assert_ne!(id.as_uuid(), &Uuid::nil());
    }
}
