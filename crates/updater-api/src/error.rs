use thiserror::Error;

/// Top-level error type for the `updater-api` crate.
///
/// Every request failure collapses into exactly one of these variants,
/// and the `Display` output is the user-facing message. The underlying
/// `reqwest` / `serde_json` detail is logged at `debug` and dropped; it
/// never travels past the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // ── Response received, non-2xx ──────────────────────────────────
    /// HTTP 404.
    #[error("requested resource not found")]
    NotFound,

    /// HTTP 500.
    #[error("internal server error")]
    InternalServerError,

    /// Any other non-2xx status whose body carried a `message` field.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Any other non-2xx status without a usable `message`.
    #[error("request error (status {status})")]
    Status { status: u16 },

    // ── No response ─────────────────────────────────────────────────
    /// The request went out but nothing came back (connect failure, timeout).
    #[error("server unresponsive, check network connectivity")]
    Unresponsive,

    // ── Everything else ─────────────────────────────────────────────
    /// The request could not be built, or the reply was not a valid envelope.
    #[error("request failed")]
    RequestFailed,

    // ── Construction ────────────────────────────────────────────────
    /// Invalid base URL or HTTP client settings. Raised before any request.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<serde_json::Value>,
}

impl Error {
    /// Classify a non-2xx response by status code and raw body.
    ///
    /// 404 and 500 always map to fixed messages, even when the server
    /// supplied its own. Other codes prefer a non-empty string `message`
    /// field from a JSON body.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            404 => Self::NotFound,
            500 => Self::InternalServerError,
            _ => {
                let message = serde_json::from_str::<ErrorBody>(body)
                    .ok()
                    .and_then(|b| b.message)
                    .and_then(|m| match m {
                        serde_json::Value::String(s) if !s.is_empty() => Some(s),
                        _ => None,
                    });
                match message {
                    Some(message) => Self::Rejected { status, message },
                    None => Self::Status { status },
                }
            }
        }
    }

    /// Classify a `reqwest` failure that produced no HTTP response.
    pub(crate) fn from_send(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            Self::RequestFailed
        } else if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::Unresponsive
        } else {
            Self::RequestFailed
        }
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound => Some(404),
            Self::InternalServerError => Some(500),
            Self::Rejected { status, .. } | Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if no response was received at all.
    pub fn is_unresponsive(&self) -> bool {
        matches!(self, Self::Unresponsive)
    }
}
