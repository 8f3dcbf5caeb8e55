// drowse-api: Async Rust client for the Sleeptracker smart bed cloud API

pub mod client;
pub mod error;
pub mod model;
pub mod session;
pub mod snapshot;
pub mod transport;

// ── Primary re-exports ──────────────────────────────────────────────
pub use client::{BedClient, CONTROL_CLIENT_ID, ClientConfig, DEFAULT_CONTROL_BASE};
pub use error::Error;
pub use model::{
    COMMAND_SAFETY_LIGHT_TOGGLE, COMMAND_STATUS, CommandRequest, CommandResponse,
    EnvironmentSample, StatusSnapshot,
};
pub use session::{
    Credentials, DEFAULT_AUTH_BASE, DEFAULT_AUTH_CLIENT_ID, DEFAULT_CLIENT_VERSION,
    EXPIRY_MARGIN_SECS, Session, SessionManager,
};
pub use transport::TransportConfig;
