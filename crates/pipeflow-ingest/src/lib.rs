//! Pipeflow Ingest - Transmitter for flow readings
//!
//! This crate owns everything between a generated reading and the ingest
//! API's answer:
//!
//! - **Client** - one long-lived HTTP client POSTing readings as JSON
//! - **Types** - the ingest acknowledgement (leak verdict, stored count)
//! - **Backoff** - retry-delay policy between failed submissions
//! - **Report** - the per-cycle console status report

pub mod backoff;
pub mod client;
pub mod error;
pub mod report;
pub mod types;

// Re-exports for convenience
pub use backoff::RetryPolicy;
pub use client::IngestClient;
pub use error::{IngestError, IngestResult};
pub use types::{AckData, IngestAck, ProcessedReading};
