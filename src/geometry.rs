//! Geometry primitives: positions, bounding boxes, and the small set of
//! predicates the grid index and hull builder need.

/// A 2D point in world space. After normalization (see
/// [`crate::partitioner::Partitioner::load_positions`]) both components
/// are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Position { x, y }
    }
}

/// Squared Euclidean distance between two positions. Used everywhere
/// distance is compared, never the square root — sorting and threshold
/// comparisons don't need it and it's one less `sqrt` per candidate.
#[inline]
pub fn squared_distance(a: Position, b: Position) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Cross product of `(b - a)` and `(c - a)`. Positive when `a, b, c` turn
/// counter-clockwise, negative when clockwise, zero when collinear.
#[inline]
pub fn orientation(a: Position, b: Position, c: Position) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Accumulates the extents of a stream of points.
///
/// Empty until the first [`BoundingBox::add`] call: `left = +inf`,
/// `right = -inf`, `top = +inf`, `bottom = -inf`, `width = height = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn empty() -> Self {
        BoundingBox {
            left: f64::INFINITY,
            right: f64::NEG_INFINITY,
            top: f64::INFINITY,
            bottom: f64::NEG_INFINITY,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn add(&mut self, p: Position) {
        self.left = self.left.min(p.x);
        self.right = self.right.max(p.x);
        self.top = self.top.min(p.y);
        self.bottom = self.bottom.max(p.y);
        self.width = (self.right - self.left).max(0.0);
        self.height = (self.bottom - self.top).max(0.0);
    }

    pub fn from_positions(points: &[Position]) -> Self {
        let mut bbox = BoundingBox::empty();
        for &p in points {
            bbox.add(p);
        }
        bbox
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_zero_extent() {
        let bbox = BoundingBox::empty();
        assert_eq!(bbox.width, 0.0);
        assert_eq!(bbox.height, 0.0);
        assert!(bbox.left.is_infinite() && bbox.left > 0.0);
        assert!(bbox.right.is_infinite() && bbox.right < 0.0);
    }

    #[test]
    fn bounding_box_monotonicity() {
        let mut bbox = BoundingBox::empty();
        let points = [
            Position::new(3.0, -2.0),
            Position::new(-1.0, 5.0),
            Position::new(10.0, 10.0),
            Position::new(0.0, 0.0),
        ];
        for &p in &points {
            bbox.add(p);
        }
        for &p in &points {
            assert!(bbox.left <= p.x && p.x <= bbox.right);
            assert!(bbox.top <= p.y && p.y <= bbox.bottom);
        }
        assert_eq!(bbox.width, bbox.right - bbox.left);
        assert_eq!(bbox.height, bbox.bottom - bbox.top);
        assert!(bbox.left <= bbox.right);
        assert!(bbox.top <= bbox.bottom);
    }

    #[test]
    fn squared_distance_matches_pythagoras() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert_eq!(squared_distance(a, b), 25.0);
    }

    #[test]
    fn orientation_sign() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(1.0, 0.0);
        let ccw = Position::new(0.0, 1.0);
        let cw = Position::new(0.0, -1.0);
        let collinear = Position::new(2.0, 0.0);
        assert!(orientation(a, b, ccw) > 0.0);
        assert!(orientation(a, b, cw) < 0.0);
        assert_eq!(orientation(a, b, collinear), 0.0);
    }
}
