//! Correlation id for one HTTP request.
//!
//! The id is kept in tokio task-local storage by the `Trace` middleware, so
//! ledger services and `Error` constructors can read it without it being
//! passed around. Work moved onto another task must re-enter
//! [`TraceId::scope`] to keep the id.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header echoing the id on every response and accepted on requests.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying a request across logs, error bodies and outcomes.
///
/// # Examples
/// ```
/// use inventory::TraceId;
///
/// let id = TraceId::from_header(" 6f1c1b2e-3a52-4d84-9f3e-0e8f4f7c2a10 ");
/// assert!(id.is_some());
/// assert!(TraceId::from_header("00000000-0000-0000-0000-000000000000").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a caller-supplied header value; blank, malformed and nil ids
    /// are ignored so the middleware mints a fresh one.
    #[must_use]
    pub fn from_header(raw: &str) -> Option<Self> {
        raw.trim()
            .parse::<Uuid>()
            .ok()
            .filter(|uuid| !uuid.is_nil())
            .map(Self)
    }

    /// Id of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// [`TraceId::current`] rendered for error and outcome payloads.
    #[must_use]
    pub fn current_string() -> Option<String> {
        Self::current().map(|id| id.to_string())
    }

    /// Run `fut` with `trace_id` as the current id.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
