//! # infragraph
//!
//! Normalizes snapshots from independent monitoring and inventory sources
//! into one property graph of infrastructure entities.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            infragraph                           │
//! │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   ┌───────────┐  │
//! │  │ source  │──▶│ pipeline │──▶│ transformers │──▶│   store   │  │
//! │  │ (input) │   │ (cycle)  │   │  (registry)  │   │  (sink)   │  │
//! │  └─────────┘   └──────────┘   └──────────────┘   └───────────┘  │
//! │       ▲                                                         │
//! │  FileSource | StreamSource | ChannelSource                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: which transformer serves which source, and how often
//! - **[`source`]**: [`DataSource`] trait with file, stream and channel
//!   implementations delivering [`SyncBatch`]es
//! - **[`pipeline`]**: runs a cycle's batches through the transformer
//!   registry, isolating failures per event
//! - **[`store`]**: [`GraphSink`] and the reference [`MemoryGraph`]
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Transform a batch file once and write the resulting graph
//! infragraph --file batches.json --once --export graph.json
//!
//! # Consume newline-delimited batches from a TCP producer
//! infragraph --config infragraph.toml --connect localhost:9090
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::sync::Arc;
//! use infragraph::{ChannelSource, DataSource, MemoryGraph, Pipeline, Settings};
//! use infragraph_transformers::{SyncBatch, SyncMode, Timestamp};
//!
//! let settings = Settings::all_sources();
//! let pipeline = Pipeline::new(Arc::new(settings.registry()));
//! let mut graph = MemoryGraph::new();
//!
//! let (tx, mut source) = ChannelSource::create("nova", 16);
//! let record = serde_json::json!({"host_name": "compute-1"});
//! tx.try_send(SyncBatch::new(
//!     "nova.host",
//!     SyncMode::Snapshot,
//!     Timestamp::now(),
//!     vec![record.as_object().unwrap().clone()],
//! ))
//! .unwrap();
//!
//! if let Some(batches) = source.poll() {
//!     pipeline.run_cycle(batches, &mut graph);
//! }
//! assert!(graph.vertex("nova.host:compute-1").is_some());
//! ```

pub mod config;
pub mod pipeline;
pub mod source;
pub mod store;

pub use config::{ConfigError, Settings, SourceConfig, MIN_CHANGES_INTERVAL};
pub use pipeline::{CycleReport, CycleSummary, EventFailure, Pipeline};
pub use source::{parse_batches, BatchPayload, ChannelSource, DataSource, FileSource, StreamSource};
pub use store::{GraphExport, GraphSink, GraphStats, MemoryGraph, Upsert};

// Re-export the batch contract for convenience
pub use infragraph_transformers::SyncBatch;
