//! Randomized focus placement and load-bounded space partitioning.
//!
//! Given a snapshot of 2D player positions, this crate explores random
//! placements of a fixed number of server "focuses" (shards), assigns
//! each player to its nearest focus (a discrete Voronoi partition),
//! derives the external interest each focus must track for its own
//! players' neighbors, and scores the result by cross-shard forwarding
//! cost — subject to a per-focus load ceiling. The best partition found
//! across repeated trials is retained.
//!
//! Intended use is capacity planning / simulation for a clustered game
//! server, not an online scheduler: trials run back-to-back,
//! single-threaded, with no network transport or persistence.

pub mod config;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod hull;
pub mod input;
pub mod neighbors;
pub mod partitioner;
pub mod snapshot;
pub mod strategy;

pub use config::PartitionerConfig;
pub use error::PartitionError;
pub use geometry::{BoundingBox, Position};
pub use grid::{GridSpatialIndex, InsertOutcome, QueryMode};
pub use hull::{ConvexHullBuilder, HullBuilder};
pub use neighbors::NeighborTable;
pub use partitioner::{Partitioner, RejectReason, TrialOutcome};
pub use snapshot::Snapshot;
pub use strategy::FocusPlacementStrategy;

/// Initializes `tracing` for the crate's log output. Safe to call more
/// than once; later calls are no-ops.
pub fn setup_logging(level: Option<String>) {
    let filter = level.unwrap_or_else(|| "info".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
