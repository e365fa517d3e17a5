//! Neighborhood precomputation: for every player, the K nearest players.

use crate::geometry::Position;
use crate::grid::GridSpatialIndex;

/// Flat `N * k` table of nearest-neighbor player indices.
///
/// Stored as one contiguous buffer rather than `Vec<Vec<u32>>` for cache
/// density during trial iteration, where every player's neighbor list is
/// walked once per focus assignment.
pub struct NeighborTable {
    k: usize,
    /// `data[i * k .. i * k + counts[i]]` holds player `i`'s neighbors,
    /// nearest first. Rows may be shorter than `k` when fewer than `k`
    /// players exist.
    data: Vec<u32>,
    counts: Vec<u32>,
}

impl NeighborTable {
    /// Builds the table by running a k-NN query from each player's own
    /// position against the supplied index.
    pub fn build(positions: &[Position], index: &GridSpatialIndex<u32>, k: usize) -> Self {
        let mut data = Vec::with_capacity(positions.len() * k);
        let mut counts = Vec::with_capacity(positions.len());
        for p in positions {
            let found = index.query_by_count(p.x, p.y, k);
            counts.push(found.len() as u32);
            data.extend(found.iter().copied());
            // Pad the row so every player's neighbors start at a fixed
            // stride of `k`, regardless of how many were actually found.
            for _ in found.len()..k {
                data.push(u32::MAX);
            }
        }
        NeighborTable { k, data, counts }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Neighbor indices of player `i`, nearest first, possibly shorter
    /// than `k`.
    pub fn neighbors_of(&self, i: usize) -> &[u32] {
        let start = i * self.k;
        let count = self.counts[i] as usize;
        &self.data[start..start + count]
    }
}
