// ── Runtime bed configuration ──
//
// These types describe *how* to reach one bed behind the Sleeptracker
// cloud. They carry credential data and connection tuning, but never
// touch disk. The CLI constructs a `BedConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;

use drowse_api::{
    ClientConfig, CommandRequest, Credentials, DEFAULT_AUTH_BASE, DEFAULT_AUTH_CLIENT_ID,
    DEFAULT_CLIENT_VERSION, DEFAULT_CONTROL_BASE, TransportConfig,
};

/// A named momentary command exposed by the bed.
#[derive(Debug, Clone, Serialize)]
pub struct MomentaryCommandSpec {
    /// Name callers press the command by (e.g. `head-up`).
    pub name: String,
    /// Raw adjustable-base command code.
    pub command: i64,
    /// Massage intensity delta sent with the command, if any.
    pub massage_adjustment: Option<i64>,
    /// Whether the command also asks for a status snapshot.
    pub request_status: Option<bool>,
}

impl MomentaryCommandSpec {
    /// A spec carrying only a code, named after that code.
    pub fn bare(command: i64) -> Self {
        Self {
            name: format!("command-{command}"),
            command,
            massage_adjustment: None,
            request_status: None,
        }
    }

    /// The wire request this spec produces.
    pub fn request(&self) -> CommandRequest {
        CommandRequest {
            bed_control_command: self.command,
            massage_adjustment: self.massage_adjustment,
            request_status: self.request_status,
        }
    }
}

/// Configuration for one bed/account pair.
///
/// Built by the CLI, passed to [`Bed`](crate::bed::Bed) -- core never
/// reads config files.
#[derive(Debug, Clone)]
pub struct BedConfig {
    pub email: String,
    pub password: SecretString,
    /// Tenant namespace; empty for the default organization.
    pub namespace: String,
    /// Fixed processor id override. Unset, the id is resolved lazily
    /// through the active-tracker lookup.
    pub processor_id: Option<i64>,
    pub auth_client_id: String,
    pub client_version: String,
    pub auth_base: String,
    pub control_base: String,
    /// Request timeout.
    pub timeout: Duration,
    /// How often the environment monitor polls (seconds). 0 = never.
    pub env_poll_interval_secs: u64,
    /// Named momentary commands exposed by this bed.
    pub commands: Vec<MomentaryCommandSpec>,
}

impl Default for BedConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: SecretString::from(String::new()),
            namespace: String::new(),
            processor_id: None,
            auth_client_id: DEFAULT_AUTH_CLIENT_ID.into(),
            client_version: DEFAULT_CLIENT_VERSION.into(),
            auth_base: DEFAULT_AUTH_BASE.into(),
            control_base: DEFAULT_CONTROL_BASE.into(),
            timeout: Duration::from_secs(30),
            env_poll_interval_secs: 60,
            commands: Vec::new(),
        }
    }
}

impl BedConfig {
    /// The transport-layer config this bed connects with.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            credentials: Credentials {
                email: self.email.clone(),
                password: self.password.clone(),
            },
            namespace: self.namespace.clone(),
            processor_id: self.processor_id,
            auth_client_id: self.auth_client_id.clone(),
            client_version: self.client_version.clone(),
            auth_base: self.auth_base.clone(),
            control_base: self.control_base.clone(),
            transport: TransportConfig {
                timeout: self.timeout,
            },
        }
    }
}
