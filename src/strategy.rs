//! Focus placement strategies.
//!
//! Both strategies are pure functions of `(bounding_box, positions, rng)`
//! and sample independently per focus; duplicate placements are allowed
//! and are tolerated downstream via degenerate (empty) focuses.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Position};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusPlacementStrategy {
    /// Pick a uniform-random element of the loaded positions.
    PlayerPositions,
    /// Pick a uniform-random point inside the (normalized) bounding box.
    BoundingBox,
}

impl FocusPlacementStrategy {
    /// Draws one candidate focus position.
    ///
    /// `positions` must be non-empty when the strategy is
    /// `PlayerPositions` — the partitioner guarantees this by refusing
    /// to run a trial on an empty dataset (`PartitionError::EmptyDataset`).
    pub fn place_one(&self, bbox: &BoundingBox, positions: &[Position], rng: &mut impl Rng) -> Position {
        match self {
            FocusPlacementStrategy::PlayerPositions => {
                let idx = rng.gen_range(0..positions.len());
                positions[idx]
            }
            FocusPlacementStrategy::BoundingBox => {
                let x = if bbox.width > 0.0 {
                    rng.gen_range(0.0..bbox.width)
                } else {
                    0.0
                };
                let y = if bbox.height > 0.0 {
                    rng.gen_range(0.0..bbox.height)
                } else {
                    0.0
                };
                Position::new(x, y)
            }
        }
    }
}
