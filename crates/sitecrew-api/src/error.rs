// ── Backend transport error taxonomy ──

use thiserror::Error;

/// Errors surfaced by the backend HTTP clients.
///
/// Timeouts and connection failures are split from generic transport errors
/// so callers can report them distinctly; neither is retried here — retry,
/// if any, is a client responsibility.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("connection failed: {message}")]
    Connect { message: String },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode backend response: {message}")]
    Deserialization { message: String, body: String },

    #[error("invalid credential material: {message}")]
    Credentials { message: String },
}

impl Error {
    /// Map a `reqwest` failure into the taxonomy, attributing timeouts to
    /// the configured deadline.
    pub(crate) fn from_reqwest(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                seconds: timeout_secs,
            }
        } else if err.is_connect() {
            Self::Connect {
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}
