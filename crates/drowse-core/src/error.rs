// ── Core error types ──
//
// User-facing errors from drowse-core. These are NOT wire-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<drowse_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the Sleeptracker cloud: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to the Sleeptracker cloud timed out")]
    Timeout,

    // ── Command errors ───────────────────────────────────────────────
    #[error("Unknown momentary command: {name}")]
    UnknownCommand { name: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Cloud API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<drowse_api::Error> for CoreError {
    fn from(err: drowse_api::Error) -> Self {
        match err {
            drowse_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            drowse_api::Error::AuthRejected { status } => CoreError::AuthenticationFailed {
                message: format!("cloud rejected the session token (HTTP {status})"),
            },
            drowse_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            drowse_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            drowse_api::Error::Protocol { message } => CoreError::Api {
                message,
                status: None,
            },
            drowse_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("unreadable cloud response: {message}"),
                status: None,
            },
        }
    }
}
