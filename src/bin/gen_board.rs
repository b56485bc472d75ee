//! Writes a seeded random board in the text format.
//!
//! usage: gen_board OUT [--size N | --width W --height H] [--density D] [--seed S]

use std::env;

use toroidal_life::codec::{self, RenderMode};
use toroidal_life::{Board, Grid};

fn main() {
    let mut args = env::args().skip(1);
    let out = args.next().expect("output path required");
    let mut width = 1000usize;
    let mut height = 1000usize;
    let mut density = 0.3f64;
    let mut seed = 0x5EED_u64;

    while let Some(arg) = args.next() {
        let value = args.next().unwrap_or_else(|| panic!("{arg} requires a value"));
        match arg.as_str() {
            "--size" => {
                width = value.parse().expect("--size expects usize");
                height = width;
            }
            "--width" => width = value.parse().expect("--width expects usize"),
            "--height" => height = value.parse().expect("--height expects usize"),
            "--density" => density = value.parse().expect("--density expects f64"),
            "--seed" => seed = value.parse().expect("--seed expects u64"),
            other => panic!("unknown arg: {other}"),
        }
    }

    let grid = Grid::new(width, height).expect("invalid grid size");
    let board = Board::random(grid, density, seed);
    codec::save(&out, &board, RenderMode::Plain).expect("failed to write board");
    println!("{out}: {width}x{height}, population {}", board.population());
}
