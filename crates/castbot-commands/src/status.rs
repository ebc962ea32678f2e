//! Stream status lookup.
//!
//! The Owncast `/api/status` endpoint reports whether the stream is live,
//! viewer counts, and when the broadcaster last connected. Lookups go
//! through a [`StatusProvider`] so templates never reach for global state.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::Mutex as TokioMutex;
use tracing::{debug, error};

use crate::error::StatusError;

/// Body of `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub viewer_count: u64,
    #[serde(default)]
    pub overall_max_viewer_count: u64,
    #[serde(default)]
    pub session_max_viewer_count: u64,
    #[serde(default)]
    pub last_connect_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_disconnect_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub version_number: String,
}

/// Source of server status. Must be safe to call from many tasks at once.
pub trait StatusProvider: Send + Sync + 'static {
    fn status(&self) -> impl Future<Output = Result<ServerStatus, StatusError>> + Send;
}

struct CachedStatus {
    fetched_at: Instant,
    status: ServerStatus,
}

/// Fetches status over HTTP and caches it.
///
/// With no TTL the first successful lookup is kept for the life of the
/// provider. Concurrent callers wait on a single in-flight request.
pub struct HttpStatusProvider {
    client: reqwest::Client,
    endpoint: String,
    ttl: Option<Duration>,
    cache: TokioMutex<Option<CachedStatus>>,
}

/// Upper bound on one status request, connect to body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

impl HttpStatusProvider {
    /// `base_url` is the server root, e.g. `https://stream.example.com`.
    pub fn new(base_url: &str, ttl: Option<Duration>) -> Self {
        Self::with_timeout(base_url, ttl, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Like [`HttpStatusProvider::new`] with a custom request timeout. A
    /// server that never answers fails the lookup instead of holding the
    /// cache lock.
    pub fn with_timeout(base_url: &str, ttl: Option<Duration>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: format!("{}/api/status", base_url.trim_end_matches('/')),
            ttl,
            cache: TokioMutex::new(None),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch(&self) -> Result<ServerStatus, StatusError> {
        debug!("fetching server status from {}", self.endpoint);
        let status = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json::<ServerStatus>()
            .await?;
        Ok(status)
    }
}

impl StatusProvider for HttpStatusProvider {
    async fn status(&self) -> Result<ServerStatus, StatusError> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            let fresh = self.ttl.is_none_or(|ttl| cached.fetched_at.elapsed() < ttl);
            if fresh {
                return Ok(cached.status.clone());
            }
        }

        let status = self.fetch().await?;
        *cache = Some(CachedStatus {
            fetched_at: Instant::now(),
            status: status.clone(),
        });
        Ok(status)
    }
}

/// Time since the broadcaster last connected, e.g. `1h2m3s`.
///
/// Lookup failures are logged and render as an empty string.
pub async fn uptime_text<S: StatusProvider>(provider: &S) -> String {
    let status = match provider.status().await {
        Ok(status) => status,
        Err(e) => {
            error!("{e}");
            return String::new();
        }
    };

    let Some(since) = status.last_connect_time else {
        error!("{}", StatusError::NeverConnected);
        return String::new();
    };

    let elapsed = (Utc::now() - since).to_std().unwrap_or_default();
    format_elapsed(elapsed)
}

/// Format a duration truncated to whole seconds: `0s`, `59s`, `4m0s`,
/// `1h2m3s`. Hours are not rolled up into days.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total / 60) % 60, total % 60);

    if hours > 0 {
        format!("{hours}h{minutes}m{seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
