//! Data source abstraction for receiving poll-cycle batches.
//!
//! A data source stands in for the synchronizers: whatever queries the
//! monitoring and inventory services hands its output over as
//! [`SyncBatch`]es, through a file, a network stream or an in-process
//! channel.

mod batch;
mod channel;
mod file;
mod stream;

pub use batch::{parse_batches, BatchPayload};
pub use channel::ChannelSource;
pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

use infragraph_transformers::SyncBatch;

/// Trait for receiving poll-cycle output from various sources.
///
/// # Example
///
/// ```
/// use infragraph::{DataSource, FileSource};
///
/// let mut source = FileSource::new("batches.json");
/// if let Some(batches) = source.poll() {
///     println!("Got {} batches", batches.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for batches that arrived since the last call.
    ///
    /// Returns `Some(batches)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<Vec<SyncBatch>>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// The error from the most recent poll, if any.
    fn error(&self) -> Option<String>;
}
