//! Nova compute inventory: availability zones, hosts and instances.
//!
//! The three types form a containment chain, zone -CONTAINS-> host
//! -CONTAINS-> instance. Each transformer emits the edge to its parent, so a
//! chain reported in any order converges on the same ids.

mod host;
mod instance;
mod zone;

pub use host::{HostTransformer, HOST, HOST_NAME, ZONE_FIELD};
pub use instance::{
    InstanceTransformer, EVENT_TYPE, INSTANCE, INSTANCE_CREATE_END, INSTANCE_DELETE_END,
    NOVA_DATE_FORMAT,
};
pub use zone::{ZoneTransformer, ZONE, ZONE_AVAILABLE, ZONE_NAME, ZONE_UNAVAILABLE};
