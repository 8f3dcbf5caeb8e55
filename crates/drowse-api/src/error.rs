use thiserror::Error;

/// Top-level error type for the `drowse-api` crate.
///
/// Covers every failure mode across both API planes:
/// login/session handling on the auth plane, dispatch and payload
/// decoding on the control plane. `drowse-core` maps these into
/// user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, malformed grant, missing token).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Bearer token rejected by the control plane even after a fresh
    /// login (HTTP 401/403 on the retried request).
    #[error("Authorization rejected (HTTP {status}) after token refresh")]
    AuthRejected { status: u16 },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout,
    /// or a non-success status from the cloud).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Protocol ────────────────────────────────────────────────────
    /// The cloud answered 2xx but the payload is missing something the
    /// protocol requires (e.g. no processor id on the active-tracker
    /// lookup).
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the control plane rejected the bearer token
    /// even after re-login. Retrying without new credentials will not
    /// resolve this.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, Self::AuthRejected { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthRejected { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Clamp a response body to a short prefix for error messages, without
/// splitting a UTF-8 sequence.
pub(crate) fn preview(body: &str) -> &str {
    let mut cut = body.len().min(200);
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    &body[..cut]
}
