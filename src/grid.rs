//! Uniform bucket grid spatial index.
//!
//! Cell size is a power of two (`2^e`) so that cell/row lookup is an
//! arithmetic right shift rather than a division — the reason callers
//! must normalize positions to non-negative coordinates before
//! building the index (see spec note on right-shift-as-divide).
//!
//! The bucket layout follows the same idea as a spatial hash grid
//! (count agents per bucket, then scatter into flat runs) but keeps a
//! `key -> entry` map so individual points can be inserted, moved, and
//! removed one at a time instead of only rebuilt wholesale.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::PartitionError;
use crate::geometry::{squared_distance, Position};

/// Outcome of [`GridSpatialIndex::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new entry was created.
    Inserted,
    /// An existing entry's position (and possibly cell) was updated.
    Updated,
}

/// Filtering applied to the candidate set gathered by [`GridSpatialIndex::query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// No filtering: every entry in a touched cell is returned.
    Raw,
    /// Keep entries within Euclidean distance `r`.
    Circle,
    /// Keep entries within the axis-aligned square `[-r, r] x [-r, r]`.
    Square,
}

struct Entry {
    x: f64,
    y: f64,
    cell_index: usize,
    /// Insertion order, used to break ties in k-NN ranking.
    seq: u64,
}

/// A uniform bucket grid over `[0, width) x [0, height)`.
///
/// `K` is any handle type distinct per point — typically a player
/// index (`usize`) or an opaque id.
pub struct GridSpatialIndex<K: Eq + Hash + Copy> {
    cell_size_exponent: u32,
    width_in_cells: usize,
    height_in_cells: usize,
    board_width: f64,
    board_height: f64,
    cells: Vec<Vec<K>>,
    entries: HashMap<K, Entry>,
    next_seq: u64,
}

impl<K: Eq + Hash + Copy> GridSpatialIndex<K> {
    /// Builds an index over a board of the given size with cell side `2^e`.
    pub fn new(cell_size_exponent: u32, width: f64, height: f64) -> Self {
        let cell_size = (1u64 << cell_size_exponent) as f64;
        let width_in_cells = (width / cell_size).ceil().max(1.0) as usize;
        let height_in_cells = (height / cell_size).ceil().max(1.0) as usize;
        let total_cells = width_in_cells * height_in_cells;
        GridSpatialIndex {
            cell_size_exponent,
            width_in_cells,
            height_in_cells,
            board_width: width,
            board_height: height,
            cells: (0..total_cells).map(|_| Vec::new()).collect(),
            entries: HashMap::new(),
            next_seq: 0,
        }
    }

    pub fn width_in_cells(&self) -> usize {
        self.width_in_cells
    }

    pub fn height_in_cells(&self) -> usize {
        self.height_in_cells
    }

    pub fn total_cells(&self) -> usize {
        self.width_in_cells * self.height_in_cells
    }

    #[inline]
    fn cell_coords(&self, x: f64, y: f64) -> (i64, i64) {
        let col = (x as i64) >> self.cell_size_exponent;
        let row = (y as i64) >> self.cell_size_exponent;
        (col, row)
    }

    #[inline]
    fn cell_index(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col as usize >= self.width_in_cells || row as usize >= self.height_in_cells {
            return None;
        }
        Some(row as usize * self.width_in_cells + col as usize)
    }

    fn locate(&self, x: f64, y: f64) -> Result<usize, PartitionError> {
        if x < 0.0 || y < 0.0 || x >= self.board_width || y >= self.board_height {
            return Err(PartitionError::OutOfBounds { x, y });
        }
        let (col, row) = self.cell_coords(x, y);
        self.cell_index(col, row)
            .ok_or(PartitionError::OutOfBounds { x, y })
    }

    /// Inserts or moves `key` to `(x, y)`. Fails if the target cell falls
    /// outside the board.
    pub fn insert(&mut self, key: K, x: f64, y: f64) -> Result<InsertOutcome, PartitionError> {
        let target_cell = self.locate(x, y)?;

        if let Some(entry) = self.entries.get_mut(&key) {
            if entry.cell_index == target_cell {
                entry.x = x;
                entry.y = y;
                return Ok(InsertOutcome::Updated);
            }
            let old_cell = entry.cell_index;
            entry.x = x;
            entry.y = y;
            entry.cell_index = target_cell;
            if let Some(pos) = self.cells[old_cell].iter().position(|k| *k == key) {
                self.cells[old_cell].swap_remove(pos);
            }
            self.cells[target_cell].push(key);
            return Ok(InsertOutcome::Updated);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            key,
            Entry {
                x,
                y,
                cell_index: target_cell,
                seq,
            },
        );
        self.cells[target_cell].push(key);
        Ok(InsertOutcome::Inserted)
    }

    /// Removes `key` from the index. Returns whether an entry existed.
    pub fn remove(&mut self, key: K) -> bool {
        match self.entries.remove(&key) {
            Some(entry) => {
                if let Some(pos) = self.cells[entry.cell_index].iter().position(|k| *k == key) {
                    self.cells[entry.cell_index].swap_remove(pos);
                }
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position currently stored for `key`, if present.
    pub fn position_of(&self, key: K) -> Option<Position> {
        self.entries.get(&key).map(|e| Position::new(e.x, e.y))
    }

    /// Visits every cell touched by the axis-aligned square
    /// `[x-r, x+r] x [y-r, y+r]`, clipped to the grid extent.
    fn for_each_touched_cell(&self, x: f64, y: f64, r: f64, mut f: impl FnMut(usize)) {
        let (c0, r0) = self.cell_coords((x - r).max(0.0), (y - r).max(0.0));
        let (c1, r1) = self.cell_coords(
            (x + r).min(self.board_width - f64::EPSILON).max(0.0),
            (y + r).min(self.board_height - f64::EPSILON).max(0.0),
        );
        let col_lo = c0.max(0);
        let col_hi = c1.min(self.width_in_cells as i64 - 1);
        let row_lo = r0.max(0);
        let row_hi = r1.min(self.height_in_cells as i64 - 1);
        if col_hi < col_lo || row_hi < row_lo {
            return;
        }
        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                if let Some(idx) = self.cell_index(col, row) {
                    f(idx);
                }
            }
        }
    }

    /// Radius query. Ordering of the returned keys is unspecified.
    pub fn query(&self, x: f64, y: f64, r: f64, mode: QueryMode) -> Vec<K> {
        let mut out = Vec::new();
        self.for_each_touched_cell(x, y, r, |cell_idx| {
            for &key in &self.cells[cell_idx] {
                let entry = &self.entries[&key];
                let keep = match mode {
                    QueryMode::Raw => true,
                    QueryMode::Circle => squared_distance(Position::new(x, y), Position::new(entry.x, entry.y)) <= r * r,
                    QueryMode::Square => (entry.x - x).abs() <= r && (entry.y - y).abs() <= r,
                };
                if keep {
                    out.push(key);
                }
            }
        });
        out
    }

    /// Visits the cells forming ring `level` around `(cx, cy)` (both in
    /// cell coordinates, may be negative or out of range — cells outside
    /// `[0, width_in_cells) x [0, height_in_cells)` are skipped). Level 1
    /// is the single center cell; level L>=2 is the square perimeter at
    /// Chebyshev distance `L-1`.
    fn for_each_cell_at_level(&self, cx: i64, cy: i64, level: i64, mut f: impl FnMut(usize)) {
        let d = level - 1;
        let mut visit = |col: i64, row: i64| {
            if let Some(idx) = self.cell_index(col, row) {
                f(idx);
            }
        };
        if d == 0 {
            visit(cx, cy);
            return;
        }
        // Top and bottom rows of the ring (full width).
        for col in (cx - d)..=(cx + d) {
            visit(col, cy - d);
            visit(col, cy + d);
        }
        // Left and right columns, excluding the corners already visited.
        for row in (cy - d + 1)..=(cy + d - 1) {
            visit(cx - d, row);
            visit(cx + d, row);
        }
    }

    /// Whether ring `level` around `(cx, cy)` could possibly contain any
    /// cell inside the grid — used to detect exhaustion during k-NN
    /// ring expansion. `(cx, cy)` is always a valid in-grid cell, so the
    /// ring's Chebyshev distance `d` only runs out once it passes the
    /// farthest grid corner from `(cx, cy)`.
    fn level_could_intersect_grid(&self, cx: i64, cy: i64, level: i64) -> bool {
        let d = level - 1;
        let max_d = cx
            .max(self.width_in_cells as i64 - 1 - cx)
            .max(cy)
            .max(self.height_in_cells as i64 - 1 - cy);
        d <= max_d
    }

    /// K-nearest-neighbor query by ring expansion. Returns up to `k` keys
    /// ordered by ascending squared distance to `(x, y)`, ties broken by
    /// insertion order. Returns fewer than `k` if the dataset has fewer
    /// than `k` points.
    pub fn query_by_count(&self, x: f64, y: f64, k: usize) -> Vec<K> {
        if k == 0 {
            return Vec::new();
        }
        let (cx, cy) = self.cell_coords(x, y);
        let mut candidates: Vec<K> = Vec::new();
        let mut level: i64 = 1;
        loop {
            if !self.level_could_intersect_grid(cx, cy, level) {
                break;
            }
            self.for_each_cell_at_level(cx, cy, level, |cell_idx| {
                candidates.extend(self.cells[cell_idx].iter().copied());
            });
            if candidates.len() >= k {
                break;
            }
            level += 1;
        }

        let origin = Position::new(x, y);
        candidates.sort_by(|a, b| {
            let ea = &self.entries[a];
            let eb = &self.entries[b];
            let da = squared_distance(origin, Position::new(ea.x, ea.y));
            let db = squared_distance(origin, Position::new(eb.x, eb.y));
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ea.seq.cmp(&eb.seq))
        });
        candidates.truncate(k);
        candidates
    }
}
