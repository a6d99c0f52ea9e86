//! Synthetic flow sensor
//!
//! Generates one reading per call. On real hardware this is where the ADC
//! sampling would live; here the values are drawn from uniform ranges
//! around a nominal flow rate.

use chrono::{DateTime, Utc};
use pipeflow_core::config::SensorSettings;
use pipeflow_core::reading::FlowReading;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Input flow varies within +/- this much of the nominal rate, L/min.
const INPUT_VARIATION: f64 = 0.2;

/// Leak-branch output drop range, L/min.
const LEAK_DROP_MIN: f64 = 0.1;
const LEAK_DROP_MAX: f64 = 0.8;

/// Normal-branch output drop cap (ordinary measurement slack), L/min.
const NORMAL_DROP_MAX: f64 = 0.1;

/// Simulated pair of flow sensors on one pipe segment.
///
/// Each `read` draws an input flow around the nominal rate, then an output
/// drop: with `leak_probability` the drop is large enough to look like a
/// leak, otherwise it stays within normal measurement slack. Low leak
/// drops overlap the normal range; whether the ingest service flags them
/// is its call, not the sensor's.
pub struct FlowSensor {
    settings: SensorSettings,
    rng: SmallRng,
}

impl FlowSensor {
    /// Create a sensor with an entropy-seeded RNG
    pub fn new(settings: SensorSettings) -> Self {
        Self {
            settings,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a sensor with a deterministic RNG, for reproducible runs
    pub fn from_seed(settings: SensorSettings, seed: u64) -> Self {
        Self {
            settings,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Device identifier stamped on every reading
    pub fn device_id(&self) -> &str {
        &self.settings.device_id
    }

    /// Take one reading. Always succeeds; consumes randomness and a clock
    /// read, nothing else.
    pub fn read(&mut self) -> FlowReading {
        let variation = self.rng.gen_range(-INPUT_VARIATION..=INPUT_VARIATION);

        let leaking = self.rng.gen::<f64>() < self.settings.leak_probability;
        let drop = if leaking {
            self.rng.gen_range(LEAK_DROP_MIN..=LEAK_DROP_MAX)
        } else {
            self.rng.gen_range(0.0..=NORMAL_DROP_MAX)
        };
        trace!(variation, drop, leaking, "sensor draw");

        compose(&self.settings, variation, drop, Utc::now())
    }
}

/// Build a reading from explicit draws. Clamping and rounding live in
/// `FlowReading::new`; output is derived from the clamped input so a dry
/// pipe never reports negative flow.
fn compose(
    settings: &SensorSettings,
    variation: f64,
    drop: f64,
    at: DateTime<Utc>,
) -> FlowReading {
    let input = (settings.base_flow + variation).max(0.0);
    let output = (input - drop).max(0.0);
    FlowReading::new(input, output, at, settings.device_id.as_str())
}
