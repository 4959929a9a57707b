// Shared request pipeline for every resource client.
//
// One configured `reqwest::Client` per transport. All four verbs funnel
// through `execute`, which logs the outgoing request and incoming status,
// unwraps the `ApiResponse` envelope, and classifies failures into a
// single `Error`.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::envelope::ApiResponse;
use crate::error::Error;

/// Fixed request timeout used unless a caller overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Query string pairs appended to a request URL.
pub type Query<'a> = &'a [(&'a str, &'a str)];

/// Request payload. JSON is the default encoding; `Multipart` is used
/// for file uploads.
#[derive(Debug)]
pub enum RequestBody {
    Json(Value),
    Multipart(Form),
}

impl RequestBody {
    /// Serialize any value into a JSON body.
    pub fn json(value: &impl serde::Serialize) -> Result<Self, Error> {
        serde_json::to_value(value).map(Self::Json).map_err(|e| {
            debug!(error = %e, "failed to encode request body");
            Error::RequestFailed
        })
    }
}

/// Shared transport configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub default_headers: HeaderMap,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("mihomo-updater/", env!("CARGO_PKG_VERSION")).into(),
            default_headers,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(self.default_headers.clone())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stateless request pipeline against a single service base URL.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    /// Create a transport, building its HTTP client from `config`.
    pub fn new(base_url: Url, config: &TransportConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a transport around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Parse `base_url` and build a transport with default settings.
    pub fn from_url(base_url: &str) -> Result<Self, Error> {
        let url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("invalid base URL '{base_url}': {e}")))?;
        Self::new(url, &TransportConfig::default())
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Verbs ────────────────────────────────────────────────────────

    /// `GET {path}` with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<Query<'_>>,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(Method::GET, path, query, None).await
    }

    /// `POST {path}` with an optional JSON or multipart body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(Method::POST, path, None, body).await
    }

    /// `PUT {path}` with an optional JSON or multipart body.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(Method::PUT, path, None, body).await
    }

    /// `DELETE {path}` with optional query parameters.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<Query<'_>>,
    ) -> Result<ApiResponse<T>, Error> {
        self.execute(Method::DELETE, path, query, None).await
    }

    /// `GET {path}` for endpoints that answer with a bare JSON body
    /// instead of the envelope.
    pub async fn get_raw<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let resp = self.send(Method::GET, path, None, None).await?;
        decode(&resp)
    }

    // ── Pipeline ─────────────────────────────────────────────────────

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<Query<'_>>,
        body: Option<RequestBody>,
    ) -> Result<ApiResponse<T>, Error> {
        let resp = self.send(method, path, query, body).await?;
        decode(&resp)
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<Query<'_>>,
        body: Option<RequestBody>,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut req = self.http.request(method, url);
        if let Some(query) = query {
            req = req.query(query);
        }
        req = match body {
            Some(RequestBody::Json(value)) => req.json(&value),
            Some(RequestBody::Multipart(form)) => req.multipart(form),
            None => req,
        };

        let resp = req.send().await.map_err(|e| {
            debug!(error = %e, "request produced no response");
            Error::from_send(&e)
        })?;

        let status = resp.status();
        debug!(status = status.as_u16(), "response received");

        let text = resp.text().await;
        if status.is_success() {
            return text.map_err(|e| {
                debug!(error = %e, "failed to read response body");
                Error::RequestFailed
            });
        }

        // The status alone decides 404 and 500; an unreadable body only
        // loses the server message.
        let text = text.unwrap_or_else(|e| {
            debug!(error = %e, "failed to read error response body");
            String::new()
        });
        Err(Error::from_status(status.as_u16(), &text))
    }

    /// Join `path` onto the base URL, keeping any base path prefix.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&full).map_err(|e| {
            debug!(error = %e, path, "invalid request URL");
            Error::RequestFailed
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "unexpected response payload");
        Error::RequestFailed
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_json_with_fixed_timeout() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.timeout, Duration::from_millis(15_000));
        assert_eq!(
            cfg.default_headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let transport = Transport::from_url("http://localhost:5000/updater/").unwrap();
        let url = transport.url("/api/config").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/updater/api/config");
    }

    #[test]
    fn from_url_rejects_garbage() {
        let err = Transport::from_url("not a url").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
