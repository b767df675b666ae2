//! # infragraph-types
//!
//! Canonical graph elements for infrastructure observability. This crate
//! defines the shared schema every source transformer emits: vertices for
//! real-world entities (alarms, hosts, instances, switches...), directed
//! labeled edges between them, and the stable keys that let independent
//! sources agree on "the same" entity.
//!
//! ## Design Goals
//!
//! - **Identity is data**: vertex ids are derived from semantic fields with
//!   [`build_key`], never from object identity or insertion order
//! - **Partial knowledge is first-class**: [`Vertex::placeholder`] records an
//!   entity that is referenced before its owning source has reported it
//! - **Validated construction**: builders reject missing required fields with
//!   a [`BuildError`] instead of producing half-formed elements
//! - **Optional serialization**: enable the `serde` feature as needed
//!
//! ## Features
//!
//! - `serde`: JSON/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use infragraph_types::{
//!     build_key, AlarmState, Edge, EdgeLabel, EntityCategory, Timestamp, Vertex,
//! };
//!
//! let sampled: Timestamp = "2024-01-01T10:05:00Z".parse().unwrap();
//!
//! let alarm = Vertex::builder()
//!     .id(build_key(["nagios", "host-1", "cpu_check"]))
//!     .category(EntityCategory::Alarm)
//!     .entity_type("nagios")
//!     .alarm_state(AlarmState::Active)
//!     .sample_timestamp(sampled)
//!     .update_timestamp(sampled)
//!     .metadata("name", "cpu_check")
//!     .build()
//!     .unwrap();
//!
//! let host = Vertex::placeholder(
//!     build_key(["nova.host", "host-1"]),
//!     EntityCategory::Resource,
//!     "nova.host",
//!     sampled,
//! )
//! .unwrap();
//!
//! let edge = Edge::new(&alarm.id, &host.id, EdgeLabel::On).unwrap();
//! assert_eq!(edge.target_id, "nova.host:host-1");
//! assert!(host.is_placeholder);
//! ```

mod edge;
mod error;
mod key;
mod neighbor;
mod timestamp;
mod vertex;

pub use edge::*;
pub use error::*;
pub use key::*;
pub use neighbor::*;
pub use timestamp::*;
pub use vertex::*;
