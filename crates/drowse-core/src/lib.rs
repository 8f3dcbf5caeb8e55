//! Business logic between `drowse-api` and UI consumers (CLI).
//!
//! This crate owns the stateful behavior that makes a fire-and-forget
//! bed command feel like a well-behaved smart-home device:
//!
//! - **[`Bed`]** -- Central facade owning the API client, the per-bed
//!   reconcile gate, the configured momentary switches, and the lazily
//!   started environment monitor. Construction spawns nothing;
//!   background polling starts on first
//!   [`watch_environment()`](Bed::watch_environment).
//!
//! - **[`SafetyLight`]** -- Idempotent on/off control over the bed's
//!   stateless toggle relay: read the reported state, compare against
//!   the desired one, and fire the toggle only on a mismatch.
//!
//! - **[`MomentarySwitch`]** -- Idle → Triggered → Idle state machine
//!   around a single command code, with a cancellable auto-reversion
//!   timer and a `watch` channel for observers.
//!
//! - **[`EnvironmentMonitor`]** -- Interval polling of sensor telemetry
//!   published through a `tokio::sync::watch` channel; poll failures
//!   are logged and skipped, never fatal.
//!
//! Configuration ([`BedConfig`]) is handed in fully resolved by the
//! CLI; core never reads config files itself.

pub mod bed;
pub mod config;
pub mod error;
pub mod monitor;
pub mod safety_light;
pub mod switch;

// ── Primary re-exports ──────────────────────────────────────────────
pub use bed::Bed;
pub use config::{BedConfig, MomentaryCommandSpec};
pub use error::CoreError;
pub use monitor::EnvironmentMonitor;
pub use safety_light::{ReconcileGate, SafetyLight};
pub use switch::{DEFAULT_REVERT_AFTER, MomentarySwitch};

// Re-export wire model types at the crate root for ergonomics.
pub use drowse_api::{EnvironmentSample, StatusSnapshot};
