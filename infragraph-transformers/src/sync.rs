//! The contract between a source poller and the transformers.
//!
//! A poller queries one source per cycle and hands over a [`SyncBatch`]: the
//! raw records plus the sync type, sync mode and sample time of that cycle.
//! [`SyncBatch::into_events`] stamps those universal fields onto every record,
//! so each [`EntityEvent`] is self-describing once it leaves the poller.

use infragraph_types::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::event::{SAMPLE_DATE, SYNC_MODE, SYNC_TYPE};
use crate::{EntityEvent, SyncMode};

/// Output of one poll cycle of one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncBatch {
    /// Source/resource type every record in the batch belongs to.
    pub sync_type: String,

    #[serde(default)]
    pub sync_mode: SyncMode,

    /// When the cycle observed the source. Assigned at receipt if the
    /// producer did not set it.
    #[serde(rename = "sample_date", default = "Timestamp::now")]
    pub sample_timestamp: Timestamp,

    /// Raw source-native records.
    #[serde(default)]
    pub records: Vec<Map<String, Value>>,
}

impl SyncBatch {
    pub fn new(
        sync_type: impl Into<String>,
        sync_mode: SyncMode,
        sample_timestamp: Timestamp,
        records: Vec<Map<String, Value>>,
    ) -> Self {
        Self {
            sync_type: sync_type.into(),
            sync_mode,
            sample_timestamp,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stamp every record with this cycle's sync type, mode and sample time.
    ///
    /// Universal fields already present on a record are overwritten: the
    /// poller, not the source, owns them.
    pub fn into_events(self) -> Vec<EntityEvent> {
        let Self {
            sync_type,
            sync_mode,
            sample_timestamp,
            records,
        } = self;

        records
            .into_iter()
            .map(|mut record| {
                record.remove(SYNC_TYPE);
                record.remove(SYNC_MODE);
                record.remove(SAMPLE_DATE);
                EntityEvent::new(sync_type.clone(), sync_mode, sample_timestamp, record)
            })
            .collect()
    }
}
