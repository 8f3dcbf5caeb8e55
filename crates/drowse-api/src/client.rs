// Control-plane HTTP client.
//
// Wraps `reqwest::Client` with Sleeptracker-specific body merging,
// bearer auth, and the single-retry-on-auth-rejection dispatch policy.
// Every higher-level operation (snapshots, safety light, telemetry)
// funnels through the one dispatch primitive.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::{Error, preview};
use crate::model::{
    ActiveProcessor, COMMAND_SAFETY_LIGHT_TOGGLE, CommandRequest, CommandResponse,
    EnvironmentSample, StatusSnapshot,
};
use crate::session::{Credentials, SessionManager};
use crate::snapshot;
use crate::transport::TransportConfig;
use crate::{DEFAULT_AUTH_BASE, DEFAULT_AUTH_CLIENT_ID, DEFAULT_CLIENT_VERSION};

/// Default control-plane base URL.
pub const DEFAULT_CONTROL_BASE: &str =
    "https://app.tsi.sleeptracker.com/actrack-client/v2/fpcsiot";

/// Client id the control plane expects in request bodies.
pub const CONTROL_CLIENT_ID: &str = "sleeptracker-android-tsi";

/// Prefix for generated per-request correlation ids.
const REQUEST_ID_PREFIX: &str = "drowse";

const ACTIVE_TRACKER_PATH: &str = "/processor/getActiveSleeptracker";
const BASE_CONTROLS_PATH: &str = "/processor/adjustableBaseControls";
const ENVIRONMENT_PATH: &str = "/processor/latestEnvironmentSensorData";

/// Connection settings for a [`BedClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Credentials,
    /// Tenant namespace; empty for the default organization.
    pub namespace: String,
    /// Fixed processor id. Set, it skips the active-tracker lookup.
    pub processor_id: Option<i64>,
    pub auth_client_id: String,
    pub client_version: String,
    pub auth_base: String,
    pub control_base: String,
    pub transport: TransportConfig,
}

impl ClientConfig {
    /// Config with stock endpoints for the given credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            namespace: String::new(),
            processor_id: None,
            auth_client_id: DEFAULT_AUTH_CLIENT_ID.to_owned(),
            client_version: DEFAULT_CLIENT_VERSION.to_owned(),
            auth_base: DEFAULT_AUTH_BASE.to_owned(),
            control_base: DEFAULT_CONTROL_BASE.to_owned(),
            transport: TransportConfig::default(),
        }
    }
}

/// Async client for one Sleeptracker account and bed.
///
/// All operations go through [`call`](Self::call), which injects the
/// client identity triple, attaches a bearer token from the session
/// manager, and retries exactly once when the control plane rejects
/// the token. No other failure is retried here.
pub struct BedClient {
    http: reqwest::Client,
    session: SessionManager,
    control_base: String,
    client_version: String,
    processor_override: Option<i64>,
    processor_cache: Mutex<Option<i64>>,
}

impl BedClient {
    /// Build a client, its HTTP transport, and its session manager.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let http = config.transport.build_client()?;
        let session = SessionManager::new(
            http.clone(),
            &config.auth_base,
            &config.namespace,
            config.credentials,
            config.auth_client_id,
            config.client_version.clone(),
        )?;
        let control_base = config.control_base.trim_end_matches('/').to_owned();
        Url::parse(&control_base)?;
        Ok(Self {
            http,
            session,
            control_base,
            client_version: config.client_version,
            processor_override: config.processor_id,
            processor_cache: Mutex::new(None),
        })
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// POST a payload to a control-plane path with identity fields and
    /// bearer auth.
    ///
    /// On HTTP 401/403 the cached session is dropped and the same body
    /// is re-sent once with a fresh token, so the cloud sees a single
    /// logical request under one correlation id. A second rejection
    /// surfaces as [`Error::AuthRejected`]; every other failure
    /// propagates unmodified with no further attempts.
    pub async fn call<T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> Result<T, Error> {
        let url = Url::parse(&format!("{}{}", self.control_base, path))?;
        let body = self.wire_body(payload)?;

        debug!("POST {}", url);

        let token = self.session.ensure_token().await?;
        let resp = self.post_raw(url.clone(), &body, &token).await?;
        let status = resp.status();

        let resp = if is_auth_rejection(status) {
            debug!("token rejected (HTTP {status}), refreshing and retrying once");
            self.session.invalidate().await;
            let token = self.session.ensure_token().await?;
            let retried = self.post_raw(url, &body, &token).await?;
            let retry_status = retried.status();
            if is_auth_rejection(retry_status) {
                return Err(Error::AuthRejected {
                    status: retry_status.as_u16(),
                });
            }
            retried
        } else {
            resp
        };

        decode_response(resp).await
    }

    async fn post_raw(
        &self,
        url: Url,
        body: &Value,
        token: &str,
    ) -> Result<reqwest::Response, Error> {
        self.http
            .post(url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)
    }

    /// Merge a payload with the client identity triple. Caller-supplied
    /// identity fields are preserved.
    fn wire_body(&self, payload: &impl Serialize) -> Result<Value, Error> {
        let mut body = serde_json::to_value(payload).map_err(|e| Error::Protocol {
            message: format!("payload did not serialize: {e}"),
        })?;
        let Value::Object(ref mut fields) = body else {
            return Err(Error::Protocol {
                message: "control-plane payloads must be JSON objects".into(),
            });
        };
        fields
            .entry("clientID")
            .or_insert_with(|| Value::from(CONTROL_CLIENT_ID));
        fields
            .entry("clientVersion")
            .or_insert_with(|| Value::from(self.client_version.clone()));
        fields
            .entry("id")
            .or_insert_with(|| Value::from(make_request_id()));
        Ok(body)
    }

    // ── Processor resolution ─────────────────────────────────────────

    /// The processor id for this account.
    ///
    /// A configured override wins unconditionally. Otherwise the
    /// active-tracker lookup runs once and the result is cached for
    /// the life of the client.
    pub async fn processor_id(&self) -> Result<i64, Error> {
        if let Some(id) = self.processor_override {
            return Ok(id);
        }
        let mut cache = self.processor_cache.lock().await;
        if let Some(id) = *cache {
            return Ok(id);
        }
        let active: ActiveProcessor = self.call(ACTIVE_TRACKER_PATH, &json!({})).await?;
        let id = active.id().ok_or_else(|| Error::Protocol {
            message: "active-tracker lookup returned no processor id".into(),
        })?;
        *cache = Some(id);
        Ok(id)
    }

    // ── Base controls ────────────────────────────────────────────────

    /// Send an adjustable-base control command.
    pub async fn send_command(&self, request: &CommandRequest) -> Result<CommandResponse, Error> {
        self.call(BASE_CONTROLS_PATH, request).await
    }

    /// Request a status snapshot and resolve the canonical side.
    ///
    /// `None` means the bed answered without a usable snapshot; callers
    /// must treat that as unknown state, never as "off".
    pub async fn status_snapshot(&self) -> Result<Option<StatusSnapshot>, Error> {
        let resp = self.send_command(&CommandRequest::status()).await?;
        let snapshots = resp.body.and_then(|b| b.snapshots).unwrap_or_default();
        Ok(snapshot::resolve(snapshots))
    }

    /// Whether the safety light reads as on, or `None` when no snapshot
    /// came back.
    pub async fn safety_light(&self) -> Result<Option<bool>, Error> {
        let snap = self.status_snapshot().await?;
        Ok(snap.map(|s| s.safety_light_is_on()))
    }

    /// Fire the stateless safety-light toggle relay once.
    pub async fn toggle_safety_light(&self) -> Result<(), Error> {
        self.send_command(&CommandRequest::bare(COMMAND_SAFETY_LIGHT_TOGGLE))
            .await?;
        Ok(())
    }

    // ── Telemetry ────────────────────────────────────────────────────

    /// Fetch the latest environment sensor data for the resolved
    /// processor.
    pub async fn environment(&self) -> Result<EnvironmentSample, Error> {
        let pid = self.processor_id().await?;
        self.call(ENVIRONMENT_PATH, &json!({ "sleeptrackerProcessorID": pid }))
            .await
    }
}

fn is_auth_rejection(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
}

/// Correlation id in the `prefix-millis-hex8` shape the cloud logs by.
fn make_request_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let entropy = uuid::Uuid::new_v4().simple().to_string();
    format!("{REQUEST_ID_PREFIX}-{millis}-{}", &entropy[..8])
}

async fn decode_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let resp = resp.error_for_status().map_err(Error::Transport)?;
    let body = resp.text().await.map_err(Error::Transport)?;
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn test_client() -> BedClient {
        let credentials = Credentials {
            email: "user@example.com".into(),
            password: SecretString::from("hunter2".to_owned()),
        };
        BedClient::new(ClientConfig::new(credentials)).unwrap()
    }

    #[test]
    fn wire_body_injects_identity_triple() {
        let client = test_client();
        let body = client.wire_body(&CommandRequest::bare(230)).unwrap();
        assert_eq!(body["bedControlCommand"], 230);
        assert_eq!(body["clientID"], CONTROL_CLIENT_ID);
        assert_eq!(body["clientVersion"], DEFAULT_CLIENT_VERSION);
        let id = body["id"].as_str().unwrap();
        assert!(id.starts_with("drowse-"), "unexpected id shape: {id}");
    }

    #[test]
    fn wire_body_keeps_caller_supplied_identity() {
        let client = test_client();
        let body = client
            .wire_body(&json!({"bedControlCommand": 1, "id": "custom-id"}))
            .unwrap();
        assert_eq!(body["id"], "custom-id");
        assert_eq!(body["clientID"], CONTROL_CLIENT_ID);
    }

    #[test]
    fn wire_body_rejects_non_object_payloads() {
        let client = test_client();
        let result = client.wire_body(&json!(5));
        assert!(matches!(result, Err(Error::Protocol { .. })));
    }

    #[test]
    fn request_id_has_prefix_millis_and_hex_tail() {
        let id = make_request_id();
        let mut parts = id.splitn(3, '-');
        assert_eq!(parts.next(), Some(REQUEST_ID_PREFIX));
        let millis: i64 = parts.next().unwrap().parse().unwrap();
        assert!(millis > 0);
        let tail = parts.next().unwrap();
        assert_eq!(tail.len(), 8);
        assert!(tail.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
