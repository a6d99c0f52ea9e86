//! Ingest API response types
//!
//! The ingest service answers a successful POST with 201 Created and a
//! JSON body describing what it made of the reading. Leak detection and
//! severity scoring happen server-side; the simulator only reports them.

use serde::{Deserialize, Serialize};

/// Acknowledgement returned for an accepted reading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestAck {
    /// Payload wrapper used by the ingest API
    pub data: AckData,
}

/// Acknowledgement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AckData {
    /// Server-side analysis of the submitted reading
    pub processed: ProcessedReading,

    /// Running count of readings the service has stored
    pub total_readings: u64,
}

/// Server-side leak analysis for one reading
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedReading {
    /// Whether the service classified the reading as a leak
    pub leak_detected: bool,

    /// Severity class, present only when a leak was detected
    #[serde(default)]
    pub severity: Option<String>,

    /// Numeric severity magnitude, present only when a leak was detected
    #[serde(default)]
    pub severity_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leak_ack() {
        let body = r#"{
            "data": {
                "processed": {
                    "leakDetected": true,
                    "severity": "high",
                    "severityScore": 0.82
                },
                "totalReadings": 42
            }
        }"#;

        let ack: IngestAck = serde_json::from_str(body).unwrap();
        assert!(ack.data.processed.leak_detected);
        assert_eq!(ack.data.processed.severity.as_deref(), Some("high"));
        assert_eq!(ack.data.processed.severity_score, Some(0.82));
        assert_eq!(ack.data.total_readings, 42);
    }

    #[test]
    fn test_parse_normal_ack_without_severity() {
        let body = r#"{
            "data": {
                "processed": { "leakDetected": false },
                "totalReadings": 7
            }
        }"#;

        let ack: IngestAck = serde_json::from_str(body).unwrap();
        assert!(!ack.data.processed.leak_detected);
        assert!(ack.data.processed.severity.is_none());
        assert!(ack.data.processed.severity_score.is_none());
    }

    #[test]
    fn test_parse_tolerates_extra_fields() {
        let body = r#"{
            "data": {
                "processed": { "leakDetected": false, "model": "v2" },
                "totalReadings": 1,
                "requestId": "abc-123"
            }
        }"#;

        let ack: IngestAck = serde_json::from_str(body).unwrap();
        assert_eq!(ack.data.total_readings, 1);
    }
}
