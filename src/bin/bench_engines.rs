//! Times every engine on the same seeded board and checks they agree.
//!
//! Use with `--release` for meaningful numbers.

#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::env;
use std::time::Instant;

use toroidal_life::engine::{EngineKind, EngineOptions, build_engine};
use toroidal_life::{Board, Grid};

#[derive(Clone, Debug)]
struct BenchConfig {
    width: usize,
    height: usize,
    density: f64,
    iters: u64,
    seed: u64,
    threads: Option<usize>,
    modes: Vec<EngineKind>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 2048,
            density: 0.42,
            iters: 100,
            seed: 0x5EED_1234_ABCD_EF01,
            threads: None,
            modes: EngineKind::ALL.to_vec(),
        }
    }
}

fn parse_args() -> BenchConfig {
    let mut cfg = BenchConfig::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--size" => {
                if let Some(v) = args.next() {
                    let n: usize = v.parse().expect("--size expects usize");
                    cfg.width = n;
                    cfg.height = n;
                }
            }
            "--width" => {
                if let Some(v) = args.next() {
                    cfg.width = v.parse().expect("--width expects usize");
                }
            }
            "--height" => {
                if let Some(v) = args.next() {
                    cfg.height = v.parse().expect("--height expects usize");
                }
            }
            "--density" => {
                if let Some(v) = args.next() {
                    cfg.density = v.parse().expect("--density expects f64");
                }
            }
            "--iters" => {
                if let Some(v) = args.next() {
                    cfg.iters = v.parse().expect("--iters expects u64");
                }
            }
            "--threads" => {
                if let Some(v) = args.next() {
                    cfg.threads = Some(v.parse().expect("--threads expects usize"));
                }
            }
            "--seed" => {
                if let Some(v) = args.next() {
                    cfg.seed = if let Some(hex) = v.strip_prefix("0x") {
                        u64::from_str_radix(hex, 16).expect("--seed hex parse failed")
                    } else {
                        v.parse().expect("--seed expects u64")
                    };
                }
            }
            "--modes" => {
                if let Some(v) = args.next() {
                    cfg.modes = v
                        .split(',')
                        .map(|m| m.parse().expect("--modes expects seq,omp,ocl"))
                        .collect();
                }
            }
            other => panic!("unknown arg: {other}"),
        }
    }
    cfg
}

fn main() {
    let cfg = parse_args();
    let grid = Grid::new(cfg.width, cfg.height).expect("invalid grid size");
    let initial = Board::random(grid, cfg.density, cfg.seed);
    let options = EngineOptions {
        threads: cfg.threads,
        ..Default::default()
    };

    println!(
        "{}x{} ({} cells), density {}, {} generations",
        cfg.width,
        cfg.height,
        grid.total(),
        cfg.density,
        cfg.iters
    );
    println!(
        "{:<6} {:>12} {:>12} {:>12} {:>8}",
        "Mode", "Setup(ms)", "Total(ms)", "Avg(ms)", "Match"
    );
    println!("{}", "-".repeat(54));

    let mut reference: Option<Board> = None;
    for &mode in &cfg.modes {
        let start = Instant::now();
        let mut engine = match build_engine(mode, &initial, &options) {
            Ok(engine) => engine,
            Err(err) => {
                println!("{:<6} skipped: {err}", mode.name());
                continue;
            }
        };
        let setup_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        engine.step_n(cfg.iters).expect("generation failed");
        let board = engine.board().expect("readback failed");
        let total_ms = start.elapsed().as_secs_f64() * 1000.0;

        let status = match &reference {
            None => {
                reference = Some(board);
                "ref"
            }
            Some(expected) if *expected == board => "MATCH",
            Some(_) => "MISMATCH",
        };
        println!(
            "{:<6} {:>12.1} {:>12.1} {:>12.4} {:>8}",
            mode.name(),
            setup_ms,
            total_ms,
            total_ms / cfg.iters.max(1) as f64,
            status
        );
    }
}
