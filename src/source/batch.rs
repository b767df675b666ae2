//! Wire format of poll-cycle output.
//!
//! Producers write either one [`SyncBatch`] or an array of them per document
//! (file) or per line (stream).

use infragraph_transformers::SyncBatch;
use serde::{Deserialize, Serialize};

/// One document as written by a producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchPayload {
    Many(Vec<SyncBatch>),
    One(SyncBatch),
}

impl BatchPayload {
    /// Flatten into a list of batches.
    pub fn into_batches(self) -> Vec<SyncBatch> {
        match self {
            BatchPayload::Many(batches) => batches,
            BatchPayload::One(batch) => vec![batch],
        }
    }
}

/// Parse one document into batches.
pub fn parse_batches(text: &str) -> Result<Vec<SyncBatch>, serde_json::Error> {
    serde_json::from_str::<BatchPayload>(text).map(BatchPayload::into_batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use infragraph_transformers::SyncMode;

    #[test]
    fn test_parse_single_batch() {
        let json = r#"{
            "sync_type": "nagios",
            "sync_mode": "init_snapshot",
            "sample_date": "2024-01-01T10:05:00Z",
            "records": [{"service": "cpu_check"}]
        }"#;

        let batches = parse_batches(json).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].sync_type, "nagios");
        assert_eq!(batches[0].sync_mode, SyncMode::InitSnapshot);
        assert_eq!(batches[0].len(), 1);
    }

    #[test]
    fn test_parse_batch_array() {
        let json = r#"[
            {"sync_type": "nova.zone", "records": []},
            {"sync_type": "nova.host", "records": [{"host_name": "compute-1"}]}
        ]"#;

        let batches = parse_batches(json).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].sync_type, "nova.host");
    }

    #[test]
    fn test_parse_rejects_records_without_sync_type() {
        assert!(parse_batches(r#"{"records": []}"#).is_err());
        assert!(parse_batches("not json").is_err());
    }
}
