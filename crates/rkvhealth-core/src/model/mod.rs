//! Data model for one health inspection cycle.
//!
//! - [`info`]: per-category metrics normalized from `INFO` sections
//! - [`snapshot`]: [`HealthSnapshot`], the aggregate handed to analysis and presenters

mod info;
mod snapshot;

pub use info::{
    ClientsInfo, LinkStatus, MemoryInfo, PersistenceInfo, ReplicationInfo, Role, ServerInfo,
    SlowEntry, StatsInfo,
};
pub use snapshot::HealthSnapshot;
