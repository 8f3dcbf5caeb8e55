// Auth-plane session handling.
//
// The Sleeptracker cloud grants bearer tokens through
// `POST {auth base}/user/session` with HTTP Basic credentials. This
// module owns the cached grant and decides when it must be refreshed.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Default auth-plane base URL.
pub const DEFAULT_AUTH_BASE: &str = "https://auth.tsi.sleeptracker.com/v1/app";

/// Client id the auth plane expects in the login body.
pub const DEFAULT_AUTH_CLIENT_ID: &str = "E3MlC3qvwJbsWo";

/// App version string sent alongside every request body.
pub const DEFAULT_CLIENT_VERSION: &str = "3.2.5";

/// Sessions within this many seconds of expiry are refreshed before use,
/// so a request never goes out with a token about to lapse mid-flight.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Correlation id the mobile app sends on login.
const LOGIN_REQUEST_ID: &str = "Android: getNewSession";

/// Rewrite an auth base URL for a tenant namespace.
///
/// Stock bases end in `/app`; a namespaced deployment moves that final
/// segment under `/namespace/{ns}/app`. Bases without a trailing `/app`
/// get the namespace suffix appended to the path as-is. An empty
/// namespace leaves the base untouched.
pub fn apply_namespace(base: &str, namespace: &str) -> String {
    if namespace.is_empty() {
        return base.to_owned();
    }
    let base = base.trim_end_matches('/');
    let root = base.strip_suffix("/app").unwrap_or(base).trim_end_matches('/');
    format!("{root}/namespace/{namespace}/app")
}

/// Login credentials for the auth plane.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: SecretString,
}

/// A bearer token plus its expiry, as granted by the auth plane.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    /// Expiry as Unix epoch seconds. Zero when the grant carried no
    /// expiry; such a session serves the current call and is refreshed
    /// on the next one.
    pub expires_at: i64,
}

impl Session {
    /// Whether the token still has at least [`EXPIRY_MARGIN_SECS`] of
    /// lifetime left at `now` (Unix epoch seconds).
    pub fn is_fresh(&self, now: i64) -> bool {
        self.expires_at - now >= EXPIRY_MARGIN_SECS
    }
}

/// Owns the cached [`Session`] and performs credential logins.
///
/// All token reads go through [`ensure_token`](Self::ensure_token),
/// which refreshes stale or absent grants before handing one out. The
/// internal mutex makes a login atomic with the cache update, so two
/// concurrent callers never interleave half-written state.
pub struct SessionManager {
    http: reqwest::Client,
    login_url: Url,
    credentials: Credentials,
    auth_client_id: String,
    client_version: String,
    session: Mutex<Option<Session>>,
}

/// Wire shape of a successful login response. Extra fields ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginGrant {
    token: Option<String>,
    expiration_time_secs: Option<i64>,
}

impl SessionManager {
    /// Create a session manager for the given auth base and namespace.
    pub fn new(
        http: reqwest::Client,
        auth_base: &str,
        namespace: &str,
        credentials: Credentials,
        auth_client_id: String,
        client_version: String,
    ) -> Result<Self, Error> {
        let base = apply_namespace(auth_base.trim_end_matches('/'), namespace.trim());
        let login_url = Url::parse(&format!("{base}/user/session"))?;
        Ok(Self {
            http,
            login_url,
            credentials,
            auth_client_id,
            client_version,
            session: Mutex::new(None),
        })
    }

    /// Return a bearer token, logging in first if the cached session is
    /// absent or within [`EXPIRY_MARGIN_SECS`] of expiry.
    ///
    /// Login failures are fatal for the calling operation; there is no
    /// internal retry here.
    pub async fn ensure_token(&self) -> Result<String, Error> {
        let mut slot = self.session.lock().await;
        let now = epoch_now();
        if let Some(session) = slot.as_ref() {
            if session.is_fresh(now) {
                return Ok(session.token.clone());
            }
        }
        let session = self.login().await?;
        let token = session.token.clone();
        *slot = Some(session);
        Ok(token)
    }

    /// Drop the cached session so the next [`ensure_token`](Self::ensure_token)
    /// performs a fresh login. Called when the control plane rejects a
    /// bearer token that should still have been valid.
    pub async fn invalidate(&self) {
        let mut slot = self.session.lock().await;
        *slot = None;
    }

    async fn login(&self) -> Result<Session, Error> {
        debug!("logging in at {}", self.login_url);

        let body = json!({
            "clientID": self.auth_client_id,
            "clientVersion": self.client_version,
            "id": LOGIN_REQUEST_ID,
        });

        let resp = self
            .http
            .post(self.login_url.clone())
            .basic_auth(
                &self.credentials.email,
                Some(self.credentials.password.expose_secret()),
            )
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let text = resp.text().await.map_err(Error::Transport)?;
        let grant: LoginGrant =
            serde_json::from_str(&text).map_err(|e| Error::Deserialization {
                message: format!("{e} (body preview: {:?})", crate::error::preview(&text)),
                body: text.clone(),
            })?;

        let token = grant
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "login succeeded but no token was returned".into(),
            })?;
        let expires_at = grant.expiration_time_secs.unwrap_or(0);

        // Never log the token itself, only its expiry.
        debug!("got session token, exp={expires_at}");

        Ok(Session { token, expires_at })
    }
}

fn epoch_now() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_rewrite_replaces_trailing_app_segment() {
        assert_eq!(
            apply_namespace("https://auth.example.com/v1/app", "acme"),
            "https://auth.example.com/v1/namespace/acme/app"
        );
    }

    #[test]
    fn namespace_rewrite_appends_when_base_lacks_app_segment() {
        assert_eq!(
            apply_namespace("https://auth.example.com/v1", "acme"),
            "https://auth.example.com/v1/namespace/acme/app"
        );
    }

    #[test]
    fn namespace_rewrite_tolerates_trailing_slashes() {
        assert_eq!(
            apply_namespace("https://auth.example.com/v1/app///", "acme"),
            "https://auth.example.com/v1/namespace/acme/app"
        );
    }

    #[test]
    fn namespace_rewrite_skips_empty_namespace() {
        assert_eq!(
            apply_namespace("https://auth.example.com/v1/app", ""),
            "https://auth.example.com/v1/app"
        );
    }

    #[test]
    fn session_freshness_honors_expiry_margin() {
        let session = Session {
            token: "t".into(),
            expires_at: 1_000,
        };
        assert!(session.is_fresh(1_000 - EXPIRY_MARGIN_SECS));
        assert!(!session.is_fresh(1_000 - EXPIRY_MARGIN_SECS + 1));
    }

    #[test]
    fn zero_expiry_session_is_never_fresh() {
        let session = Session {
            token: "t".into(),
            expires_at: 0,
        };
        assert!(!session.is_fresh(0));
    }
}
