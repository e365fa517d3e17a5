//! End-to-end scenarios spanning the input adapter, grid index, and
//! partitioner together.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shard_partitioner::{FocusPlacementStrategy, Partitioner, PartitionerConfig, TrialOutcome};

#[test]
fn loading_tsv_input_then_partitioning_is_consistent_with_load() {
    let tsv = "10\t10\n20\t10\n10\t20\n20\t20\n15\t15\n";
    let positions = shard_partitioner::input::parse_positions(tsv).unwrap();

    let mut partitioner = Partitioner::new(PartitionerConfig {
        num_focuses: 2,
        neighbor_count: 3,
        placement_strategy: FocusPlacementStrategy::PlayerPositions,
        ..PartitionerConfig::default()
    });
    partitioner.load_positions(positions).unwrap();

    // Normalization moved the minimum corner to the origin.
    assert_eq!(partitioner.bounding_box().left, 0.0);
    let normalized = partitioner.positions();
    assert!(normalized.iter().all(|p| p.x >= 0.0 && p.y >= 0.0));

    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let mut accepted_any = false;
    for _ in 0..30 {
        if partitioner.randomize(&mut rng).unwrap() == TrialOutcome::Accepted {
            accepted_any = true;
        }
    }
    assert!(accepted_any);

    let best = partitioner.best_snapshot().unwrap();
    // Partition property: every player is owned by exactly one focus.
    let mut owners = vec![None; normalized.len()];
    for (focus_idx, own) in best.own_players.iter().enumerate() {
        for &p in own {
            assert!(owners[p as usize].is_none(), "player {p} owned twice");
            owners[p as usize] = Some(focus_idx);
        }
    }
    assert!(owners.iter().all(|o| o.is_some()));

    // External-interest soundness: every n in external_interest[i] must be
    // a neighbor of some own player of i, and not itself owned by i.
    let neighbors_table_k = partitioner.config().neighbor_count;
    assert!(neighbors_table_k > 0);
    for (focus_idx, ext) in best.external_interest.iter().enumerate() {
        for &n in ext {
            assert!(!best.own_players[focus_idx].contains(&n));
        }
    }

    // Forwards equals the sum of external interest set sizes.
    let forwards: u64 = best.external_interest.iter().map(|s| s.len() as u64).sum();
    assert_eq!(forwards, best.number_of_forwards);
}

#[test]
fn malformed_tsv_is_rejected_before_any_partitioning() {
    let tsv = "1\t2\nbad-line\n3\t4\n";
    let err = shard_partitioner::input::parse_positions(tsv).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("line 2"));
}

#[test]
fn grid_config_flows_through_to_index_cell_count() {
    let mut partitioner = Partitioner::new(PartitionerConfig {
        num_focuses: 1,
        neighbor_count: 2,
        cell_size_exponent: 2, // cell side = 4
        ..PartitionerConfig::default()
    });
    partitioner
        .load_positions(vec![
            shard_partitioner::Position::new(0.0, 0.0),
            shard_partitioner::Position::new(9.0, 9.0),
        ])
        .unwrap();
    let index = partitioner.index().unwrap();
    // Board is (9+1) x (9+1) = 10x10, cell side 4 -> ceil(10/4) = 3 cells per axis.
    assert_eq!(index.width_in_cells(), 3);
    assert_eq!(index.height_in_cells(), 3);
}
