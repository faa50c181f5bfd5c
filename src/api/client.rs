use std::io;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::DeskConfig;
use crate::error::DeskError;

/// Blocking client for the analysis backend. Each endpoint family adds its
/// own `impl ApiClient` block next to this one.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    pub(crate) request_timeout: Duration,
    pub(crate) write_timeout: Duration,
    pub(crate) analyze_timeout: Duration,
}

/// Outcome of a request the caller wants to inspect for 404 itself.
pub(crate) enum Fetched<T> {
    Found(T),
    NotFound,
}

impl ApiClient {
    pub fn new(config: &DeskConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .user_agent(concat!("admitdesk/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            write_timeout: Duration::from_secs(config.write_timeout_secs),
            analyze_timeout: Duration::from_secs(config.analyze_timeout_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issue a request and decode the JSON answer. A 404 is returned as
    /// `Fetched::NotFound`; every other failure is mapped to a `DeskError`.
    pub(crate) fn request<B, T>(
        &self,
        method: &str,
        path: &str,
        body: Option<&B>,
        timeout: Duration,
        what: &str,
    ) -> Result<Fetched<T>, DeskError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!(method, url = %url, "backend request");
        let request = self.agent.request(method, &url).timeout(timeout);
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        match result {
            Ok(response) => {
                let status = response.status();
                let decoded = response
                    .into_json::<T>()
                    .map_err(|e| DeskError::backend(format!("{what}: unexpected response from backend: {e}")))?;
                debug!(method, url = %url, status, "backend response");
                Ok(Fetched::Found(decoded))
            }
            Err(ureq::Error::Status(404, _)) => {
                debug!(method, url = %url, "backend returned 404");
                Ok(Fetched::NotFound)
            }
            Err(e) => Err(self.map_error(e, what)),
        }
    }

    /// Like `request`, but a 404 is an error built by `not_found`.
    pub(crate) fn request_found<B, T>(
        &self,
        method: &str,
        path: &str,
        body: Option<&B>,
        timeout: Duration,
        what: &str,
        not_found: impl FnOnce() -> DeskError,
    ) -> Result<T, DeskError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match self.request(method, path, body, timeout, what)? {
            Fetched::Found(value) => Ok(value),
            Fetched::NotFound => Err(not_found()),
        }
    }

    fn map_error(&self, err: ureq::Error, what: &str) -> DeskError {
        match err {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                let detail = error_detail(&body);
                warn!(code, what, "backend rejected request");
                DeskError::backend(format!("{what} failed (HTTP {code}): {detail}"))
            }
            ureq::Error::Transport(transport) => match transport.kind() {
                ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => {
                    DeskError::backend_unavailable(&self.base_url)
                }
                ureq::ErrorKind::Io if is_timeout(&transport) => DeskError::backend_timeout(what),
                _ => DeskError::backend(format!("{what} failed: {transport}")),
            },
        }
    }

    pub fn health(&self) -> Result<Value, DeskError> {
        self.request_found::<(), Value>("GET", "healthz", None, self.request_timeout, "Health check", || {
            DeskError::backend("Backend has no /healthz endpoint")
        })
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    std::error::Error::source(transport)
        .and_then(|src| src.downcast_ref::<io::Error>())
        .is_some_and(|e| matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock))
}

/// FastAPI error bodies carry `{"detail": ...}`; fall back to the raw body.
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        _ if body.trim().is_empty() => "no details".to_string(),
        _ => body.trim().to_string(),
    }
}
