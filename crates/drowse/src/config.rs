//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation to `drowse_core::BedConfig`.
//!
//! Core never sees these types -- it receives a pre-built `BedConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use drowse_core::{BedConfig, MomentaryCommandSpec};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration. Core never touches this type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named bed profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// CLI-owned bed profile definition.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Sleeptracker account email.
    pub email: Option<String>,

    /// Account password (plaintext -- prefer keyring or env var).
    pub password: Option<String>,

    /// Tenant namespace; absent for the default organization.
    pub namespace: Option<String>,

    /// Fixed processor id, skipping the active-tracker lookup.
    pub processor: Option<i64>,

    /// Authentication endpoint base URL override.
    pub auth_base: Option<String>,

    /// Control endpoint base URL override.
    pub control_base: Option<String>,

    /// Request timeout override (seconds).
    pub timeout: Option<u64>,

    /// Environment poll interval in seconds (0 disables polling).
    pub env_poll_secs: Option<u64>,

    /// Named momentary commands for this bed.
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
}

/// One `[[profiles.<name>.commands]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandEntry {
    /// Name used with `drowse press`.
    pub name: String,

    /// Raw adjustable-base command code.
    pub command: i64,

    /// Massage intensity delta sent with the command.
    pub massage_adjustment: Option<i64>,

    /// Whether the command also requests a status snapshot.
    pub request_status: Option<bool>,
}

impl CommandEntry {
    fn to_spec(&self) -> MomentaryCommandSpec {
        MomentaryCommandSpec {
            name: self.name.clone(),
            command: self.command,
            massage_adjustment: self.massage_adjustment,
            request_status: self.request_status,
        }
    }
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "drowse", "drowse")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("drowse");
    p
}

// ── Config loading / saving ──────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("DROWSE_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Write the config back to its canonical path.
pub fn save_config(config: &Config) -> Result<(), CliError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = toml::to_string_pretty(config).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: format!("could not serialize configuration: {e}"),
    })?;
    std::fs::write(&path, rendered)?;
    Ok(())
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Translate a CLI `Profile` + global flags into a `BedConfig`.
///
/// This is the single boundary where CLI config types cross into core
/// types. CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<BedConfig, CliError> {
    let base = BedConfig::default();

    // 1. Account email (flag > env > profile)
    let email = global
        .email
        .clone()
        .or_else(|| profile.email.clone())
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 2. Password chain
    let password = resolve_password(profile, profile_name, global)?;

    // 3. Namespace / processor (flag > env > profile)
    let namespace = global
        .namespace
        .clone()
        .or_else(|| profile.namespace.clone())
        .unwrap_or_default();
    let processor_id = global.processor.or(profile.processor);

    // 4. Endpoint overrides, validated as URLs
    let auth_base = match profile.auth_base {
        Some(ref s) => validated_url("auth_base", s)?,
        None => base.auth_base.clone(),
    };
    let control_base = match profile.control_base {
        Some(ref s) => validated_url("control_base", s)?,
        None => base.control_base.clone(),
    };

    // 5. Timeouts and polling (flag > profile > default)
    let timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or_else(default_timeout),
    );
    let env_poll_interval_secs = profile.env_poll_secs.unwrap_or(base.env_poll_interval_secs);

    Ok(BedConfig {
        email,
        password,
        namespace,
        processor_id,
        auth_base,
        control_base,
        timeout,
        env_poll_interval_secs,
        commands: profile.commands.iter().map(CommandEntry::to_spec).collect(),
        ..base
    })
}

fn validated_url(field: &str, value: &str) -> Result<String, CliError> {
    let _: url::Url = value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {value}"),
    })?;
    Ok(value.to_owned())
}

// ── Credential helpers ───────────────────────────────────────────────

/// Resolve the account password from the credential chain.
fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    // 1. CLI flag / env var
    if let Some(ref pw) = global.password {
        return Ok(SecretString::from(pw.clone()));
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("drowse", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}
