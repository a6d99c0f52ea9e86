//! Flow reading entity
//!
//! One synthetic sample from the simulated flow sensors, in the exact shape
//! the ingest API expects on the wire (camelCase keys, ISO-8601 timestamp).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single flow-sensor reading.
///
/// Immutable once built: readings are created fresh per cycle, submitted
/// once, and discarded. `output_flow <= input_flow` is the intended
/// semantic (output lags input when the pipe leaks) but is not enforced;
/// the sensor draws are independent and may occasionally cross.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowReading {
    /// Flow into the pipe segment, L/min, 3-decimal precision
    pub input_flow: f64,

    /// Flow out of the pipe segment, L/min, 3-decimal precision
    pub output_flow: f64,

    /// When the reading was taken (UTC)
    pub timestamp: DateTime<Utc>,

    /// Device this reading belongs to, constant per run
    pub device_id: String,
}

impl FlowReading {
    /// Build a reading, clamping both flows to non-negative and rounding
    /// to sensor precision.
    pub fn new(
        input_flow: f64,
        output_flow: f64,
        timestamp: DateTime<Utc>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            input_flow: round3(input_flow.max(0.0)),
            output_flow: round3(output_flow.max(0.0)),
            timestamp,
            device_id: device_id.into(),
        }
    }

    /// Difference between input and output flow. Positive when output lags
    /// input; can be slightly negative because the draws are independent.
    pub fn flow_deficit(&self) -> f64 {
        round3(self.input_flow - self.output_flow)
    }
}

/// Round to 3 decimal places, the precision real flow sensors report at.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
