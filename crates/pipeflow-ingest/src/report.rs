//! Console status report
//!
//! The per-cycle report is the program's primary output and goes to
//! stdout, not the log. Rendering returns a `String` so callers print it
//! in one write and tests assert on it.

use crate::error::IngestError;
use crate::types::IngestAck;
use pipeflow_core::reading::FlowReading;
use std::fmt::Write;

/// Render the report for an accepted reading
pub fn success_report(reading: &FlowReading, ack: &IngestAck) -> String {
    let processed = &ack.data.processed;

    let mut out = String::new();
    let _ = writeln!(out, "Reading accepted:");
    let _ = writeln!(out, "  Input:   {:.3} L/min", reading.input_flow);
    let _ = writeln!(out, "  Output:  {:.3} L/min", reading.output_flow);
    let _ = writeln!(
        out,
        "  Leak:    {}",
        if processed.leak_detected { "yes" } else { "no" }
    );
    if processed.leak_detected {
        let severity = processed.severity.as_deref().unwrap_or("unknown");
        match processed.severity_score {
            Some(score) => {
                let _ = writeln!(
                    out,
                    "  Severity: {} (score: {})",
                    severity.to_uppercase(),
                    score
                );
            }
            None => {
                let _ = writeln!(out, "  Severity: {}", severity.to_uppercase());
            }
        }
    }
    let _ = writeln!(out, "  Stored readings: {}", ack.data.total_readings);
    out
}

/// Render the report for a failed submission
pub fn failure_report(err: &IngestError) -> String {
    format!("Submission failed: {}\n", err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AckData, ProcessedReading};
    use chrono::Utc;

    fn reading() -> FlowReading {
        FlowReading::new(3.013, 2.486, Utc::now(), "ESP32_SIMULATOR_001")
    }

    fn ack(leak: bool) -> IngestAck {
        IngestAck {
            data: AckData {
                processed: ProcessedReading {
                    leak_detected: leak,
                    severity: leak.then(|| "medium".to_string()),
                    severity_score: leak.then_some(0.53),
                },
                total_readings: 17,
            },
        }
    }

    #[test]
    fn test_success_report_contains_submitted_flows() {
        let report = success_report(&reading(), &ack(false));
        assert!(report.contains("3.013"));
        assert!(report.contains("2.486"));
        assert!(report.contains("Leak:    no"));
        assert!(report.contains("Stored readings: 17"));
        assert!(!report.contains("Severity"));
    }

    #[test]
    fn test_success_report_leak_severity() {
        let report = success_report(&reading(), &ack(true));
        assert!(report.contains("Leak:    yes"));
        assert!(report.contains("Severity: MEDIUM (score: 0.53)"));
    }

    #[test]
    fn test_failure_report_network_vs_status() {
        let rejected = failure_report(&IngestError::rejected(500, "boom"));
        assert!(rejected.contains("Ingest rejected: 500 - boom"));

        let malformed =
            failure_report(&IngestError::MalformedAck("expected value".to_string()));
        assert!(malformed.contains("Malformed acknowledgement"));
    }
}
