// Wire types for the control plane.
//
// Request bodies always carry the client identity triple (clientID,
// clientVersion, id) next to the operation payload; responses are
// modeled loosely so new firmware fields never break decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command code that requests a status snapshot without moving the base.
pub const COMMAND_STATUS: i64 = 500;

/// Command code that toggles the under-bed safety light relay.
pub const COMMAND_SAFETY_LIGHT_TOGGLE: i64 = 230;

/// Payload for the adjustable-base-controls endpoint.
///
/// Optional fields are omitted from the wire body entirely when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    pub bed_control_command: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub massage_adjustment: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_status: Option<bool>,
}

impl CommandRequest {
    /// A bare command with no optional fields set.
    pub fn bare(command: i64) -> Self {
        Self {
            bed_control_command: command,
            massage_adjustment: None,
            request_status: None,
        }
    }

    /// The status request: [`COMMAND_STATUS`] with the snapshot flag set.
    pub fn status() -> Self {
        Self {
            bed_control_command: COMMAND_STATUS,
            massage_adjustment: None,
            request_status: Some(true),
        }
    }
}

/// Response envelope from the base-controls endpoint.
///
/// Envelopes vary across firmware versions, so everything except the
/// snapshot list is carried as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub body: Option<ResponseBody>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Inner `body` object of a command response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseBody {
    pub snapshots: Option<Vec<StatusSnapshot>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One side's status record from a snapshot list.
///
/// A missing `side` never matches the primary side; a missing
/// `safetyLightOn` reads as off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub side: Option<i64>,
    pub safety_light_on: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl StatusSnapshot {
    /// Whether the safety light reads as on in this snapshot.
    pub fn safety_light_is_on(&self) -> bool {
        self.safety_light_on.unwrap_or(false)
    }
}

/// Response from the active-tracker lookup. The cloud answers with one
/// of two id spellings depending on deployment age.
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveProcessor {
    #[serde(rename = "sleeptrackerProcessorID")]
    pub sleeptracker_processor_id: Option<i64>,
    #[serde(rename = "processorID")]
    pub processor_id: Option<i64>,
}

impl ActiveProcessor {
    /// The processor id under either spelling, newest spelling first.
    pub fn id(&self) -> Option<i64> {
        self.sleeptracker_processor_id.or(self.processor_id)
    }
}

/// A `{value}`-wrapped sensor reading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Reading {
    pub value: Option<f64>,
}

/// Latest environment sensor data for one processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSample {
    pub degrees_celsius: Option<Reading>,
    pub humidity_percentage: Option<Reading>,
    pub co2_ppm: Option<Reading>,
    pub voc_ppb: Option<Reading>,
    pub iaq: Option<Reading>,
}

impl EnvironmentSample {
    /// Temperature in degrees Celsius, if reported.
    pub fn temperature(&self) -> Option<f64> {
        self.degrees_celsius.and_then(|r| r.value)
    }

    /// Relative humidity percentage, if reported.
    pub fn humidity(&self) -> Option<f64> {
        self.humidity_percentage.and_then(|r| r.value)
    }

    /// CO2 concentration in ppm, if reported.
    pub fn co2(&self) -> Option<f64> {
        self.co2_ppm.and_then(|r| r.value)
    }

    /// Volatile organic compound density in ppb, if reported.
    pub fn voc(&self) -> Option<f64> {
        self.voc_ppb.and_then(|r| r.value)
    }

    /// Indoor air quality index, if reported. Lower is better.
    pub fn iaq_index(&self) -> Option<f64> {
        self.iaq.and_then(|r| r.value)
    }
}
