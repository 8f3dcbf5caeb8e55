//! `config` -- profile management and the interactive setup wizard.

use std::fmt::Write;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

/// Keyring service name under which passwords are stored.
const KEYRING_SERVICE: &str = "drowse";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Set { key, value } => set(global, &key, &value),
        ConfigCommand::Profiles => profiles(global),
        ConfigCommand::Use { name } => use_profile(&name),
        ConfigCommand::SetPassword { profile } => set_password(global, profile),
    }
}

// ── init wizard ──────────────────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();

    eprintln!("✨ drowse configuration wizard");
    eprintln!();

    let default_name = global.profile.clone().unwrap_or_else(|| "default".into());
    let name: String = Input::new()
        .with_prompt("Profile name")
        .default(default_name)
        .interact_text()
        .map_err(prompt_err)?;

    let email: String = Input::new()
        .with_prompt("Sleeptracker account email")
        .interact_text()
        .map_err(prompt_err)?;

    let password = rpassword::prompt_password("Account password: ").map_err(prompt_err)?;
    let plaintext = prompt_keyring_storage(&name, &password)?;

    let namespace: String = Input::new()
        .with_prompt("Tenant namespace (leave empty for the default)")
        .allow_empty(true)
        .default(String::new())
        .interact_text()
        .map_err(prompt_err)?;

    let profile = Profile {
        email: Some(email),
        password: plaintext,
        namespace: (!namespace.is_empty()).then_some(namespace),
        ..Profile::default()
    };
    cfg.profiles.insert(name.clone(), profile);

    // Point the default at the new profile unless one already resolves.
    let default_exists = cfg
        .default_profile
        .as_deref()
        .is_some_and(|d| cfg.profiles.contains_key(d));
    if !default_exists {
        cfg.default_profile = Some(name.clone());
    }

    config::save_config(&cfg)?;

    eprintln!();
    eprintln!(
        "✓ Profile '{name}' written to {}",
        config::config_path().display()
    );
    eprintln!("  Try: drowse status");
    Ok(())
}

/// Offer keyring storage for the password. Returns the plaintext to
/// keep in the config file, or `None` when the keyring took it.
fn prompt_keyring_storage(profile_name: &str, password: &str) -> Result<Option<String>, CliError> {
    let choices = [
        "System keyring (recommended)",
        "Plaintext in the config file",
    ];
    let idx = Select::new()
        .with_prompt("Where should the password be stored?")
        .items(&choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if idx != 0 {
        return Ok(Some(password.to_owned()));
    }

    match store_in_keyring(profile_name, password) {
        Ok(()) => {
            eprintln!("✓ Password stored in the system keyring");
            Ok(None)
        }
        Err(err) => {
            eprintln!("Keyring unavailable ({err}); keeping the password in the config file");
            Ok(Some(password.to_owned()))
        }
    }
}

fn store_in_keyring(profile_name: &str, password: &str) -> Result<(), keyring::Error> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))?;
    entry.set_password(password)
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

// ── show ─────────────────────────────────────────────────────────────

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let redacted = redact(&cfg);
    let out = output::render_single(&global.output, &redacted, format_config, |_| {
        config::config_path().display().to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Clone the config with every stored password masked.
fn redact(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("********".into());
        }
    }
    cfg
}

fn format_config(cfg: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Config file:     {}", config::config_path().display());
    let _ = writeln!(
        out,
        "Default profile: {}",
        cfg.default_profile.as_deref().unwrap_or("default")
    );

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let profile = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[{name}]");
        let _ = writeln!(out, "  email:         {}", opt(profile.email.as_deref()));
        let _ = writeln!(out, "  password:      {}", opt(profile.password.as_deref()));
        let _ = writeln!(out, "  namespace:     {}", opt(profile.namespace.as_deref()));
        let _ = writeln!(
            out,
            "  processor:     {}",
            profile
                .processor
                .map_or_else(|| "(auto)".into(), |p| p.to_string())
        );
        if let Some(ref url) = profile.auth_base {
            let _ = writeln!(out, "  auth base:     {url}");
        }
        if let Some(ref url) = profile.control_base {
            let _ = writeln!(out, "  control base:  {url}");
        }
        if let Some(secs) = profile.timeout {
            let _ = writeln!(out, "  timeout:       {secs}s");
        }
        if let Some(secs) = profile.env_poll_secs {
            let _ = writeln!(out, "  env poll:      {secs}s");
        }
        if !profile.commands.is_empty() {
            let list: Vec<String> = profile
                .commands
                .iter()
                .map(|c| format!("{}({})", c.name, c.command))
                .collect();
            let _ = writeln!(out, "  commands:      {}", list.join(", "));
        }
    }

    if cfg.profiles.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "No profiles configured. Run: drowse config init");
    }
    out.trim_end().to_string()
}

fn opt(value: Option<&str>) -> &str {
    value.unwrap_or("(unset)")
}

// ── set ──────────────────────────────────────────────────────────────

const VALID_KEYS: &str =
    "email, password, namespace, processor, auth-base, control-base, timeout, env-poll-secs";

fn set(global: &GlobalOpts, key: &str, value: &str) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let name = config::active_profile_name(global, &cfg);
    let profile = cfg.profiles.entry(name.clone()).or_default();

    match key {
        "email" => profile.email = Some(value.into()),
        "password" => {
            profile.password = Some(value.into());
            eprintln!("Stored in plaintext; prefer: drowse config set-password");
        }
        "namespace" => profile.namespace = Some(value.into()),
        "processor" => profile.processor = Some(parse_number(key, value)?),
        "auth-base" => profile.auth_base = Some(value.into()),
        "control-base" => profile.control_base = Some(value.into()),
        "timeout" => profile.timeout = Some(parse_number(key, value)?),
        "env-poll-secs" => profile.env_poll_secs = Some(parse_number(key, value)?),
        _ => {
            return Err(CliError::Validation {
                field: key.into(),
                reason: format!("unknown key (valid keys: {VALID_KEYS})"),
            });
        }
    }

    config::save_config(&cfg)?;
    if !global.quiet {
        eprintln!("✓ Set {key} for profile '{name}'");
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("not a number: {value}"),
    })
}

// ── profiles / use ───────────────────────────────────────────────────

fn profiles(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    if cfg.profiles.is_empty() {
        eprintln!("No profiles configured. Run: drowse config init");
        return Ok(());
    }

    let default = cfg.default_profile.as_deref().unwrap_or("default");
    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();

    let mut out = String::new();
    for name in names {
        let marker = if name == default { "*" } else { " " };
        let _ = writeln!(out, "{marker} {name}");
    }
    output::print_output(out.trim_end(), global.quiet);
    Ok(())
}

fn use_profile(name: &str) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    if !cfg.profiles.contains_key(name) {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: name.into(),
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    cfg.default_profile = Some(name.into());
    config::save_config(&cfg)?;
    eprintln!("✓ Default profile is now '{name}'");
    Ok(())
}

// ── set-password ─────────────────────────────────────────────────────

fn set_password(global: &GlobalOpts, profile_flag: Option<String>) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let name = profile_flag.unwrap_or_else(|| config::active_profile_name(global, &cfg));

    let password = rpassword::prompt_password("Account password: ").map_err(prompt_err)?;
    store_in_keyring(&name, &password).map_err(|err| CliError::Validation {
        field: "keyring".into(),
        reason: err.to_string(),
    })?;

    eprintln!("✓ Password stored in the system keyring for profile '{name}'");
    Ok(())
}
