//! A single partitioning trial's result.

use std::collections::HashSet;

use crate::geometry::Position;
use crate::hull::HullBuilder;

/// Per-focus state plus the aggregate outcome of one `randomize()` trial.
///
/// Immutable once [`Partitioner::randomize`](crate::partitioner::Partitioner::randomize)
/// finishes building it — it is either discarded (load cap exceeded) or
/// handed to the caller as the new best snapshot.
pub struct Snapshot {
    pub focuses: Vec<Position>,
    pub own_players: Vec<HashSet<u32>>,
    pub external_interest: Vec<HashSet<u32>>,
    pub inner_hull: Vec<Vec<Position>>,
    pub outer_hull: Vec<Vec<Position>>,
    pub load_factor: Vec<f64>,
    pub number_of_forwards: u64,
    pub is_within_comfortable_lf_threshold: bool,
}

impl Snapshot {
    /// Allocates an empty snapshot sized for `num_focuses` focuses.
    pub fn new(focuses: Vec<Position>) -> Self {
        let f = focuses.len();
        Snapshot {
            focuses,
            own_players: (0..f).map(|_| HashSet::new()).collect(),
            external_interest: (0..f).map(|_| HashSet::new()).collect(),
            inner_hull: vec![Vec::new(); f],
            outer_hull: vec![Vec::new(); f],
            load_factor: vec![0.0; f],
            number_of_forwards: 0,
            is_within_comfortable_lf_threshold: true,
        }
    }

    pub fn num_focuses(&self) -> usize {
        self.focuses.len()
    }

    /// Computes `inner_hull`/`outer_hull` for every focus from
    /// `own_players`/`external_interest` using a fresh hull builder per
    /// focus, as produced by `builder_factory`.
    pub fn finalize_hulls<B: HullBuilder>(&mut self, positions: &[Position], mut builder_factory: impl FnMut() -> B) {
        for i in 0..self.num_focuses() {
            let mut inner = builder_factory();
            for &p in &self.own_players[i] {
                inner.add_point(positions[p as usize]);
            }
            self.inner_hull[i] = inner.hull();

            let mut outer = builder_factory();
            for &p in &self.own_players[i] {
                outer.add_point(positions[p as usize]);
            }
            for &p in &self.external_interest[i] {
                outer.add_point(positions[p as usize]);
            }
            self.outer_hull[i] = outer.hull();
        }
    }
}
