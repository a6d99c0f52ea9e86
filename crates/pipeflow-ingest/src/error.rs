//! Error types for pipeflow-ingest

use thiserror::Error;

/// Errors that can occur while submitting a reading.
///
/// None of these are fatal to the loop driver: every failed submission is
/// reported and retried on the configured delay.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Network/transport error: connection refused, timeout, DNS failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with something other than 201 Created
    #[error("Ingest rejected: {status} - {body}")]
    Rejected { status: u16, body: String },

    /// A 201 response whose body could not be parsed as an acknowledgement
    #[error("Malformed acknowledgement: {0}")]
    MalformedAck(String),
}

impl IngestError {
    /// Check if this failure happened below HTTP (nothing answered at all)
    pub fn is_network_error(&self) -> bool {
        matches!(self, IngestError::Network(_))
    }

    /// Create a rejection from status and body text
    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        IngestError::Rejected {
            status,
            body: body.into(),
        }
    }
}

/// Result type for ingest operations
pub type IngestResult<T> = Result<T, IngestError>;
