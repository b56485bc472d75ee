use toroidal_life::codec::{self, HeaderPolicy, RenderMode};
use toroidal_life::{Board, Grid, RecomputeConfig, RecomputeLife};

const BLOCK: &str = "4,4\n....\n.xx.\n.xx.\n....\n";

fn engine_from_text(text: &str, threads: usize) -> RecomputeLife {
    let board = codec::parse_str(text, HeaderPolicy::Strict).expect("parse board");
    RecomputeLife::with_config(&board, RecomputeConfig::default().thread_count(threads))
        .expect("build engine")
}

fn text_of(engine: &RecomputeLife) -> String {
    codec::render(&engine.to_board(), RenderMode::Plain)
}

#[test]
fn block_is_stable() {
    let mut engine = engine_from_text(BLOCK, 2);
    engine.step();
    assert_eq!(text_of(&engine), BLOCK);
    engine.step_n(99);
    assert_eq!(text_of(&engine), BLOCK);
}

#[test]
fn blinker_oscillates() {
    let horizontal = "7,7\n.......\n.......\n.......\n.xxx...\n.......\n.......\n.......\n";
    let vertical = "7,7\n.......\n.......\n..x....\n..x....\n..x....\n.......\n.......\n";
    let mut engine = engine_from_text(horizontal, 3);

    engine.step();
    assert_eq!(text_of(&engine), vertical);

    engine.step();
    assert_eq!(text_of(&engine), horizontal);
}

#[test]
fn empty_grid_stays_empty() {
    let board = Board::empty(Grid::new(40, 33).unwrap());
    let mut engine =
        RecomputeLife::with_config(&board, RecomputeConfig::default().thread_count(4)).unwrap();
    engine.step_n(10);
    assert_eq!(engine.population(), 0);
}

#[test]
fn counts_after_step_describe_previous_generation() {
    let board = Board::random(Grid::new(19, 11).unwrap(), 0.4, 0xC0FFEE);
    let mut engine = RecomputeLife::new(&board).unwrap();
    engine.step();
    assert_eq!(engine.neighbor_counts(), board.neighbor_counts().as_slice());
}

#[test]
fn deterministic_across_thread_counts() {
    // Large enough that the automatic partition changes with the worker count.
    let board = Board::random(Grid::new(640, 480).unwrap(), 0.33, 0xD37E_A515);

    let run = |config: RecomputeConfig| {
        let mut engine = RecomputeLife::with_config(&board, config).expect("build engine");
        engine.step_n(12);
        (engine.partition(), engine.to_board())
    };

    let (single, reference) = run(RecomputeConfig::default().thread_count(1));
    let mut partitions = vec![single];
    for threads in [2, 8, 64] {
        let (partition, result) = run(RecomputeConfig::default().thread_count(threads));
        assert_eq!(result, reference, "{threads} threads");
        assert!(
            !partitions.contains(&partition),
            "{threads} threads reused partition {partition:?}"
        );
        partitions.push(partition);
    }
}

#[test]
fn deterministic_across_partition_granularity() {
    let board = Board::random(Grid::new(64, 45).unwrap(), 0.4, 0xA11CE);

    let run = |config: RecomputeConfig| {
        let mut engine = RecomputeLife::with_config(&board, config).expect("build engine");
        engine.step_n(9);
        engine.to_board()
    };

    let reference = run(RecomputeConfig::default().thread_count(1).rows_per_task(45));
    for (threads, rows) in [(2, 1), (8, 3), (8, 7), (64, 2), (3, 44)] {
        assert_eq!(
            run(RecomputeConfig::default().thread_count(threads).rows_per_task(rows)),
            reference,
            "{threads} threads, {rows} rows per task"
        );
    }
}

#[test]
fn thin_grids_wrap_correctly() {
    for (w, h) in [(1, 9), (9, 1), (2, 2), (1, 1)] {
        let board = Board::random(Grid::new(w, h).unwrap(), 0.5, 17);
        let mut engine =
            RecomputeLife::with_config(&board, RecomputeConfig::default().thread_count(2)).unwrap();
        let mut reference = toroidal_life::SequentialLife::from_board(&board);
        for _ in 0..5 {
            engine.step();
            reference.step();
            assert_eq!(engine.to_board(), reference.to_board(), "{w}x{h}");
        }
    }
}
