//! Loop driver
//!
//! Runs the generate-submit-report cycle: one warm-up pass first, then
//! continuous mode until Ctrl-C. Failed submissions never abort the loop;
//! they only stretch the delay before the next attempt.

use pipeflow_core::config::SimulatorConfig;
use pipeflow_core::reading::FlowReading;
use pipeflow_ingest::{report, IngestClient, IngestResult, RetryPolicy};
use pipeflow_sense::FlowSensor;
use std::time::Duration;
use tracing::info;

/// The simulator run loop: sensor, client, and schedule in one place.
///
/// Strictly sequential; the only suspension points are the bounded
/// network call and the sleeps between cycles.
pub struct Simulator {
    sensor: FlowSensor,
    client: IngestClient,
    interval: Duration,
    retry: RetryPolicy,
}

impl Simulator {
    /// Build the sensor, HTTP client, and schedule from configuration
    pub fn from_config(config: &SimulatorConfig) -> IngestResult<Self> {
        let sensor = FlowSensor::new(config.sensor.clone());
        let client = IngestClient::new(
            &config.ingest.endpoint,
            Duration::from_secs(config.ingest.timeout_secs),
        )?;

        Ok(Self {
            sensor,
            client,
            interval: Duration::from_secs(config.schedule.interval_secs),
            retry: RetryPolicy::from_settings(&config.schedule),
        })
    }

    /// One generate-submit-report cycle
    async fn cycle(&mut self) -> bool {
        let reading = self.sensor.read();
        self.submit_and_report(&reading).await
    }

    /// Warm-up cycle: the generated reading is also shown in full, so a
    /// first run against a dead endpoint still proves the generator side.
    pub async fn run_once(&mut self) -> bool {
        let reading = self.sensor.read();
        println!("Test reading for {}:", reading.device_id);
        println!(
            "{}",
            serde_json::to_string_pretty(&reading).unwrap_or_default()
        );
        self.submit_and_report(&reading).await
    }

    async fn submit_and_report(&self, reading: &FlowReading) -> bool {
        match self.client.submit(reading).await {
            Ok(ack) => {
                print!("{}", report::success_report(reading, &ack));
                true
            }
            Err(e) => {
                print!("{}", report::failure_report(&e));
                false
            }
        }
    }

    /// Run until interrupted: warm-up first, continuous mode only if the
    /// warm-up submission was accepted.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        info!("Starting simulator for {}", self.sensor.device_id());
        info!("Submitting readings to {}", self.client.endpoint());
        info!(
            "Interval: {}s, press Ctrl-C to stop",
            self.interval.as_secs()
        );

        if !self.run_once().await {
            anyhow::bail!(
                "initial submission failed; check that the ingest API is reachable at {}",
                self.client.endpoint()
            );
        }
        println!("Warm-up succeeded, entering continuous mode\n");

        let mut failures: u32 = 0;
        loop {
            let accepted = self.cycle().await;
            let delay = self.next_delay(accepted, &mut failures);
            if accepted {
                println!("Next reading in {}s\n", delay.as_secs());
            } else {
                println!("Retrying in {}s\n", delay.as_secs());
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Simulator stopped by user");
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }

        Ok(())
    }

    /// Pick the sleep before the next cycle: the configured interval after
    /// an accepted reading, the retry policy's delay otherwise. The
    /// failure streak feeds growing policies and resets on success.
    fn next_delay(&self, accepted: bool, failures: &mut u32) -> Duration {
        if accepted {
            *failures = 0;
            self.interval
        } else {
            let delay = self.retry.delay(*failures);
            *failures = failures.saturating_add(1);
            delay
        }
    }
}
