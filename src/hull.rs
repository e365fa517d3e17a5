//! Convex hull accumulation.
//!
//! The hull builder is an external collaborator: any O(n log n)
//! algorithm satisfying `add_point` / `hull` is acceptable.
//! `HullBuilder` is the interface the partitioner depends on;
//! [`ConvexHullBuilder`] is the default implementation (Andrew's
//! monotone chain) so the crate is runnable without pulling in a
//! separate hull crate.

use crate::geometry::{orientation, Position};

/// The hull builder contract: accepts an unbounded stream of points,
/// returns the ordered hull boundary on demand.
pub trait HullBuilder {
    fn add_point(&mut self, p: Position);
    /// Ordered hull vertices (counter-clockwise). Empty when fewer than
    /// three distinct non-collinear points were added.
    fn hull(&self) -> Vec<Position>;
}

/// Default [`HullBuilder`]: buffers every added point and recomputes
/// the hull with Andrew's monotone chain on demand.
#[derive(Debug, Clone, Default)]
pub struct ConvexHullBuilder {
    points: Vec<Position>,
}

impl ConvexHullBuilder {
    pub fn new() -> Self {
        ConvexHullBuilder { points: Vec::new() }
    }
}

impl HullBuilder for ConvexHullBuilder {
    fn add_point(&mut self, p: Position) {
        self.points.push(p);
    }

    fn hull(&self) -> Vec<Position> {
        monotone_chain(&self.points)
    }
}

/// Computes the convex hull of `points` via Andrew's monotone chain,
/// O(n log n). Returns an empty hull for fewer than 3 distinct
/// non-collinear points.
fn monotone_chain(points: &[Position]) -> Vec<Position> {
    let mut sorted: Vec<Position> = points.to_vec();
    sorted.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    sorted.dedup_by(|a, b| a.x == b.x && a.y == b.y);

    if sorted.len() < 3 {
        return Vec::new();
    }

    let build_half = |points: &[Position]| -> Vec<Position> {
        let mut half: Vec<Position> = Vec::with_capacity(points.len());
        for &p in points {
            while half.len() >= 2
                && orientation(half[half.len() - 2], half[half.len() - 1], p) <= 0.0
            {
                half.pop();
            }
            half.push(p);
        }
        half
    };

    let mut lower = build_half(&sorted);
    let rev: Vec<Position> = sorted.iter().rev().copied().collect();
    let mut upper = build_half(&rev);

    lower.pop();
    upper.pop();

    if lower.len() + upper.len() < 3 {
        return Vec::new();
    }

    lower.extend(upper);
    lower
}
