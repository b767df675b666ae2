//! Stream-based data source.
//!
//! Receives sync batches from an async byte stream such as a TCP
//! connection.

use std::sync::{Arc, Mutex, PoisonError};

use infragraph_transformers::SyncBatch;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{parse_batches, DataSource};

type ErrorSlot = Arc<Mutex<Option<String>>>;

fn set_error(slot: &ErrorSlot, error: Option<String>) {
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = error;
}

/// A data source that receives sync batches from an async stream.
///
/// This source spawns a background task that reads newline-delimited JSON
/// from the provided async reader and makes batches available via `poll()`.
/// A malformed line is logged and skipped; the stream keeps going.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use infragraph::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"sync_type\": \"nova.host\", \"records\": []}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<Vec<SyncBatch>>,
    description: String,
    last_error: ErrorSlot,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Each line holds one batch or an array of batches.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let desc = description.to_string();
        let task_desc = desc.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        debug!(source = %task_desc, "stream closed");
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match parse_batches(trimmed) {
                            Ok(batches) => {
                                set_error(&error_handle, None);
                                if tx.send(batches).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!(source = %task_desc, error = %e, "skipping malformed line");
                                set_error(&error_handle, Some(format!("Parse error: {}", e)));
                            }
                        }
                    }
                    Err(e) => {
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", desc),
            last_error,
        }
    }

    /// Create a StreamSource from a channel of raw JSON documents.
    ///
    /// For pushing payloads from another transport (a message bus
    /// subscription, for instance) without an `AsyncRead`.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, batch_rx) = mpsc::channel(16);
        let last_error: ErrorSlot = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                let parsed = std::str::from_utf8(&bytes)
                    .map_err(|e| e.to_string())
                    .and_then(|text| parse_batches(text).map_err(|e| e.to_string()));
                match parsed {
                    Ok(batches) => {
                        set_error(&error_handle, None);
                        if tx.send(batches).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => set_error(&error_handle, Some(format!("Parse error: {}", e))),
                }
            }
        });

        Self {
            receiver: batch_rx,
            description: format!("stream: {}", description),
            last_error,
        }
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<Vec<SyncBatch>> {
        let mut batches = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(received) => batches.extend(received),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    if batches.is_empty() {
                        set_error(&self.last_error, Some("Stream disconnected".to_string()));
                    }
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
        self.last_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_json() -> &'static str {
        r#"{"sync_type":"nagios","sample_date":"2024-01-01T10:05:00Z","records":[{"service":"cpu_check"}]}"#
    }

    #[tokio::test]
    async fn test_stream_source_spawn() {
        let data = format!("{}\n", sample_json());
        let cursor = Cursor::new(data);

        let mut source = StreamSource::spawn(cursor, "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        let batches = source.poll().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].sync_type, "nagios");
    }

    #[tokio::test]
    async fn test_stream_source_multiple_lines() {
        let data = format!("{}\n\n[{},{}]\n", sample_json(), sample_json(), sample_json());
        let cursor = Cursor::new(data);

        let mut source = StreamSource::spawn(cursor, "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        // All pending lines are drained in one poll
        assert_eq!(source.poll().unwrap().len(), 3);
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_stream_source_description() {
        let cursor = Cursor::new("");
        let source = StreamSource::spawn(cursor, "tcp://localhost:9090");
        assert_eq!(source.description(), "stream: tcp://localhost:9090");
    }

    #[tokio::test]
    async fn test_stream_source_skips_invalid_lines() {
        let data = format!("not valid json\n{}\n", sample_json());
        let cursor = Cursor::new(data);

        let mut source = StreamSource::spawn(cursor, "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(source.poll().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stream_source_from_bytes_channel() {
        let (tx, rx) = mpsc::channel::<Vec<u8>>(16);
        let mut source = StreamSource::from_bytes_channel(rx, "test-channel");

        tx.send(sample_json().as_bytes().to_vec()).await.unwrap();
        tx.send(b"garbage".to_vec()).await.unwrap();

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert_eq!(source.poll().unwrap().len(), 1);
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[tokio::test]
    async fn test_stream_source_empty_stream() {
        let cursor = Cursor::new("");
        let mut source = StreamSource::spawn(cursor, "test");

        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        assert!(source.poll().is_none());
        assert!(source.error().is_some());
    }
}
