//! `drowse` CLI entry point.

mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use drowse_core::{Bed, BedConfig};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config management never talks to the cloud.
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "drowse", &mut std::io::stdout());
            Ok(())
        }
        cmd => {
            let bed_config = build_bed_config(&cli.global)?;
            let bed = Bed::new(&bed_config)?;
            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &bed, &cli.global).await
        }
    }
}

/// Resolve the active profile into a [`BedConfig`], falling back to
/// flags/env vars alone when no profile exists on disk.
fn build_bed_config(global: &GlobalOpts) -> Result<BedConfig, CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return config::resolve_profile(profile, &profile_name, global);
    }

    // No profile on disk -- credentials must come from flags or env vars.
    let email = global.email.clone().ok_or_else(|| CliError::NoConfig {
        path: config::config_path().display().to_string(),
    })?;
    let Some(password) = global.password.clone() else {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    };

    Ok(BedConfig {
        email,
        password: SecretString::from(password),
        namespace: global.namespace.clone().unwrap_or_default(),
        processor_id: global.processor,
        timeout: std::time::Duration::from_secs(global.timeout.unwrap_or(30)),
        ..BedConfig::default()
    })
}
