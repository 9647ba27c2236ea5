pub mod config;
pub mod edges;
pub mod gap;
pub mod geometry;
pub mod id;
pub mod layout;
pub mod model;
pub mod notify;
pub mod occupancy;
pub mod snapshot;
pub mod traverse;

pub use config::LayoutConfig;
pub use edges::EdgeSet;
pub use id::NodeId;
pub use layout::{Deletion, LayoutEngine, compute_max_extents};
pub use model::*;
pub use notify::{GridSignal, Subscription};
pub use occupancy::{OccupancyIndex, Occupant};
pub use snapshot::{DocumentStore, MemoryStore, Snapshot, SnapshotError};
pub use traverse::{Flow, related_all_nodes, related_nodes};
