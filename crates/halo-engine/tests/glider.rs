//! Integration test: deterministic glider evolution on a torus.
//!
//! With threshold 0 and every draw at 0.75 the gate never opens, so the
//! automaton is plain life and the expected grids are exact.

use halo_core::WorldSnapshot;
use halo_engine::{SimConfig, Simulation};
use halo_test_utils::{snapshot_from_rows, FixedStreams, Reference};

fn run(pattern: &WorldSnapshot, ranks: usize, threads: usize, ticks: u64) -> WorldSnapshot {
    let config = SimConfig::new(threads, pattern.width(), pattern.height(), ticks, 0);
    Simulation::builder(config)
        .ranks(ranks)
        .pattern(pattern.clone())
        .streams(|_, _| Ok(Box::new(FixedStreams::new(0.75))))
        .build()
        .unwrap()
        .run()
        .unwrap()
        .snapshot
}

#[test]
fn four_by_four_one_tick() {
    let start = snapshot_from_rows(&[
        &[0, 1, 0, 0],
        &[0, 0, 1, 0],
        &[0, 1, 1, 0],
        &[0, 0, 0, 0],
    ]);
    let expected = snapshot_from_rows(&[
        &[0, 0, 0, 0],
        &[0, 0, 1, 0],
        &[0, 1, 1, 0],
        &[0, 1, 1, 0],
    ]);
    assert_eq!(run(&start, 1, 1, 1), expected);
}

#[test]
fn four_by_four_one_tick_any_decomposition() {
    let start = snapshot_from_rows(&[
        &[0, 1, 0, 0],
        &[0, 0, 1, 0],
        &[0, 1, 1, 0],
        &[0, 0, 0, 0],
    ]);
    let expected = run(&start, 1, 1, 1);
    for (ranks, threads) in [(1, 2), (1, 4), (2, 1), (2, 2), (4, 1)] {
        assert_eq!(
            run(&start, ranks, threads, 1),
            expected,
            "{ranks} ranks x {threads} threads"
        );
    }
}

fn glider_8x8() -> WorldSnapshot {
    snapshot_from_rows(&[
        &[0, 1, 0, 0, 0, 0, 0, 0],
        &[0, 0, 1, 0, 0, 0, 0, 0],
        &[1, 1, 1, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
    ])
}

#[test]
fn glider_moves_one_cell_diagonally_every_four_ticks() {
    let expected = snapshot_from_rows(&[
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 1, 0, 0, 0, 0, 0],
        &[0, 0, 0, 1, 0, 0, 0, 0],
        &[0, 1, 1, 1, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
        &[0, 0, 0, 0, 0, 0, 0, 0],
    ]);
    for (ranks, threads) in [(1, 1), (2, 2), (4, 2), (8, 1)] {
        assert_eq!(
            run(&glider_8x8(), ranks, threads, 4),
            expected,
            "{ranks} ranks x {threads} threads"
        );
    }
}

#[test]
fn glider_crosses_every_rank_boundary_and_returns() {
    // 32 ticks carry the glider once around both axes of the torus.
    let start = glider_8x8();
    assert_eq!(run(&start, 4, 2, 32), start);
    assert_eq!(run(&start, 2, 4, 32), start);
}

#[test]
fn matches_the_serial_reference() {
    let start = glider_8x8();
    let mut reference = Reference::new(start.clone(), 0.0);
    reference.run(13, &FixedStreams::new(0.75), halo_core::StreamIndex);
    assert_eq!(&run(&start, 4, 1, 13), reference.snapshot());
}
