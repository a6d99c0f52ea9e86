//! HTTP client for the ingest API
//!
//! One reading per request, one long-lived `reqwest::Client` per run.
//! Access is strictly sequential; the client is reused for connection
//! pooling, not shared across tasks.

use crate::error::{IngestError, IngestResult};
use crate::types::IngestAck;
use pipeflow_core::reading::FlowReading;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client for submitting readings
pub struct IngestClient {
    client: Client,
    endpoint: String,
}

impl IngestClient {
    /// Create a new ingest client
    pub fn new(endpoint: &str, timeout: Duration) -> IngestResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("pipeflow-sim/{}", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// The URL readings are POSTed to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit one reading.
    ///
    /// Success means HTTP 201 with a parseable acknowledgement body.
    /// Everything else comes back as an `IngestError` carrying the
    /// diagnostic (status + body text, or the transport error).
    pub async fn submit(&self, reading: &FlowReading) -> IngestResult<IngestAck> {
        debug!(
            "Submitting reading for {} to {}",
            reading.device_id, self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(reading)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::CREATED => {
                let ack = response
                    .json::<IngestAck>()
                    .await
                    .map_err(|e| IngestError::MalformedAck(e.to_string()))?;
                debug!(
                    "Reading accepted, {} stored total",
                    ack.data.total_readings
                );
                Ok(ack)
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                warn!("Ingest rejected reading: {} - {}", status, body);
                Err(IngestError::rejected(status.as_u16(), body))
            }
        }
    }
}
