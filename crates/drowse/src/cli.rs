//! Command-line surface for `drowse`: the clap command tree plus the
//! flags every subcommand shares.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// drowse -- command-line control for Sleeptracker smart beds
#[derive(Debug, Parser)]
#[command(
    name = "drowse",
    version,
    about = "Control Sleeptracker smart beds from the command line",
    long_about = "A CLI for Sleeptracker-powered adjustable beds.\n\n\
        Fires momentary base commands, reconciles the under-bed safety\n\
        light, and reads the bed's environment sensors through the\n\
        Sleeptracker cloud API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    // Account / connection flags. Each overrides the corresponding
    // profile value when given.
    /// Bed profile to use
    #[arg(long, short = 'p', env = "DROWSE_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Sleeptracker account email (overrides profile)
    #[arg(long, env = "DROWSE_EMAIL", global = true)]
    pub email: Option<String>,

    /// Sleeptracker account password
    #[arg(long, env = "DROWSE_PASSWORD", global = true, hide_env = true)]
    pub password: Option<String>,

    /// Tenant namespace (overrides profile)
    #[arg(long, short = 'n', env = "DROWSE_NAMESPACE", global = true)]
    pub namespace: Option<String>,

    /// Fixed processor id, skipping the active-tracker lookup
    #[arg(long, env = "DROWSE_PROCESSOR", global = true)]
    pub processor: Option<i64>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "DROWSE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    // Presentation flags.
    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DROWSE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table / detail view (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON for pipes
    JsonCompact,
    /// YAML
    Yaml,
    /// One value per line, for shell scripts
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the bed's reported status snapshot
    #[command(alias = "st")]
    Status,

    /// Control the under-bed safety light
    Light(LightArgs),

    /// Fire a momentary command by configured name or raw code
    Press {
        /// Command name (see `drowse commands`) or numeric code
        target: String,
    },

    /// List the configured momentary commands
    #[command(alias = "cmds")]
    Commands,

    /// Show environment sensor readings
    Env(EnvArgs),

    /// Show the resolved processor id for this bed
    #[command(alias = "proc")]
    Processor,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LIGHT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LightArgs {
    #[command(subcommand)]
    pub command: LightCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightCommand {
    /// Show the current safety-light state
    Show,

    /// Turn the safety light on (no-op if already on)
    On,

    /// Turn the safety light off (no-op if already off)
    Off,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ENV
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct EnvArgs {
    /// Keep polling and print each new sample until interrupted
    #[arg(long, short = 'w')]
    pub watch: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (e.g., "email", "namespace", "timeout")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
