//! Integration test: whole-grid behaviour of the gated rule.

use halo_core::{Cell, StreamIndex, WorldSnapshot};
use halo_engine::{SimConfig, Simulation, StreamKeying};
use halo_test_utils::{snapshot_from_rows, CyclingStreams, FixedStreams, Reference};

fn pattern() -> WorldSnapshot {
    snapshot_from_rows(&[
        &[1, 0, 1, 1, 0, 0],
        &[0, 1, 1, 0, 0, 1],
        &[0, 0, 0, 1, 1, 0],
        &[1, 1, 0, 0, 1, 0],
    ])
}

#[test]
fn fully_gated_grid_follows_the_coin_only() {
    for (coin, expected) in [(0.6, Cell::Alive), (0.4, Cell::Dead)] {
        let config = SimConfig::new(2, 6, 4, 1, 100);
        let report = Simulation::builder(config)
            .ranks(2)
            .pattern(pattern())
            .streams(move |_, _| Ok(Box::new(FixedStreams::new(coin))))
            .build()
            .unwrap()
            .run()
            .unwrap();
        assert!(report.snapshot.rows().all(|row| row.iter().all(|&c| c == expected)));
    }
}

#[test]
fn ungated_grid_is_plain_life() {
    let config = SimConfig::new(1, 6, 4, 3, 0);
    let got = Simulation::builder(config)
        .ranks(4)
        .pattern(pattern())
        .streams(|_, _| Ok(Box::new(FixedStreams::new(0.01))))
        .build()
        .unwrap()
        .run()
        .unwrap()
        .snapshot;
    let mut reference = Reference::new(pattern(), 0.0);
    reference.run(3, &FixedStreams::new(0.01), StreamIndex);
    assert_eq!(&got, reference.snapshot());
}

#[test]
fn mixed_gating_follows_draw_order() {
    // Per stream: gate 0.3 opens (then coin 0.7), gate 0.9 stays shut,
    // gate 0.2 opens (then coin 0.1), and so on. Any slip in the
    // two-draws-when-gated order shows up as a different grid.
    let values = vec![0.3, 0.7, 0.9, 0.2, 0.1, 0.55, 0.45, 0.8];
    let mut config = SimConfig::new(2, 6, 4, 4, 50);
    config.stream_keying = StreamKeying::GlobalRow;
    let factory_values = values.clone();
    let got = Simulation::builder(config)
        .ranks(2)
        .pattern(pattern())
        .streams(move |_, _| Ok(Box::new(CyclingStreams::new(factory_values.clone(), 4))))
        .build()
        .unwrap()
        .run()
        .unwrap()
        .snapshot;

    let mut reference = Reference::new(pattern(), 0.5);
    reference.run(4, &CyclingStreams::new(values, 4), StreamIndex);
    assert_eq!(&got, reference.snapshot());
}
