//! Explicit configuration for the partitioner.
//!
//! Every tunable knob lives here; the partitioner never reads
//! process-wide state, keeping it as a plain struct with a
//! hand-written `Default`.

use serde::{Deserialize, Serialize};

use crate::strategy::FocusPlacementStrategy;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartitionerConfig {
    /// Number of focuses (shards), F. Must be >= 1.
    pub num_focuses: usize,

    /// How candidate focus positions are drawn each trial.
    pub placement_strategy: FocusPlacementStrategy,

    /// Size of each player's precomputed neighbor list.
    pub neighbor_count: usize,

    /// Processing time per own player per tick, in microseconds.
    pub proc_mine_micros: f64,

    /// Processing time per external-interest player per tick, in
    /// microseconds.
    pub proc_other_micros: f64,

    /// State-send frequency, in Hz.
    pub send_freq_hz: f64,

    /// Load cap, as a percent of one CPU-second. Trials whose worst
    /// focus exceeds this are rejected.
    pub max_comfortable_load_factor: f64,

    /// Grid cell side is `2^cell_size_exponent`.
    pub cell_size_exponent: u32,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        PartitionerConfig {
            num_focuses: 1,
            placement_strategy: FocusPlacementStrategy::PlayerPositions,
            neighbor_count: 100,
            proc_mine_micros: 20.0,
            proc_other_micros: 1.0,
            send_freq_hz: 5.0,
            max_comfortable_load_factor: 50.0,
            cell_size_exponent: 13,
        }
    }
}
