//! Channel-based data source.
//!
//! Receives sync batches over a tokio mpsc channel, for synchronizers
//! running in the same process.

use infragraph_transformers::SyncBatch;
use tokio::sync::mpsc;

use super::DataSource;

/// A data source fed by in-process producers.
///
/// Unlike a watch channel, every batch sent is delivered: a snapshot of one
/// source must not be dropped because another source reported right after.
///
/// # Example
///
/// ```
/// use infragraph::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("nova synchronizer", 16);
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<SyncBatch>,
    description: String,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a new channel source from the receiving end of a channel.
    pub fn new(receiver: mpsc::Receiver<SyncBatch>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            disconnected: false,
        }
    }

    /// Create a channel pair for sending batches to a ChannelSource.
    pub fn create(source_description: &str, capacity: usize) -> (mpsc::Sender<SyncBatch>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Vec<SyncBatch>> {
        let mut batches = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(batch) => batches.push(batch),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }

        if batches.is_empty() {
            None
        } else {
            Some(batches)
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.disconnected
            .then(|| "All producers disconnected".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infragraph_transformers::{SyncMode, Timestamp};

    fn batch(sync_type: &str) -> SyncBatch {
        SyncBatch::new(sync_type, SyncMode::Snapshot, Timestamp::now(), Vec::new())
    }

    #[test]
    fn test_channel_source_drains_pending_batches() {
        let (tx, mut source) = ChannelSource::create("test", 8);

        assert!(source.poll().is_none());

        tx.try_send(batch("nova.zone")).unwrap();
        tx.try_send(batch("nova.host")).unwrap();

        let batches = source.poll().unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].sync_type, "nova.zone");
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_channel_source_reports_disconnect() {
        let (tx, mut source) = ChannelSource::create("test", 8);
        tx.try_send(batch("nagios")).unwrap();
        drop(tx);

        assert_eq!(source.poll().unwrap().len(), 1);
        assert!(source.poll().is_none());
        assert!(source.error().is_some());
        assert_eq!(source.description(), "channel: test");
    }
}
