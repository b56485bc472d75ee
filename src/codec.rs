//! Text board format.
//!
//! ```text
//! 4,4
//! ....
//! .xx.
//! .xx.
//! ....
//! ```
//!
//! The first line holds `<width>,<height>`, each following line one row.
//! `x` marks a live cell, any other character a dead one.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::board::Board;
use crate::error::{LifeError, Result};
use crate::sequential::Cell;
use crate::topology::Grid;

/// Grid size assumed by [`HeaderPolicy::Fallback`] when the header is unusable.
pub const DEFAULT_WIDTH: usize = 1000;
pub const DEFAULT_HEIGHT: usize = 250;

const ALIVE_CHAR: u8 = b'x';
const DEAD_CHAR: u8 = b'.';

/// What to do with a header that is not `<width>,<height>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Fail with [`LifeError::MalformedHeader`].
    #[default]
    Strict,
    /// Log a warning and continue with `DEFAULT_WIDTH` x `DEFAULT_HEIGHT`.
    Fallback,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Plain,
    /// Dead cells show their live-neighbour count instead of `.`.
    Neighbors,
}

/// Parse `"<width>,<height>"`, tolerating whitespace around either field.
pub fn parse_header(line: &str) -> Option<(usize, usize)> {
    let (w, h) = line.split_once(',')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Parse a board. Rows are raw bytes, so any byte other than `x` is a dead
/// cell whether or not it is valid UTF-8. Rows shorter than the width and
/// missing rows leave the remaining cells dead; characters past the width
/// and lines past the height are ignored.
pub fn parse<R: BufRead>(reader: R, policy: HeaderPolicy) -> Result<Board> {
    let mut lines = reader.split(b'\n').map(|line| {
        line.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            bytes
        })
    });
    let header = lines.next().transpose()?.unwrap_or_default();
    let header = String::from_utf8_lossy(&header).into_owned();

    let (width, height) = match (parse_header(&header), policy) {
        (Some(dims), _) => dims,
        (None, HeaderPolicy::Strict) => return Err(LifeError::MalformedHeader { line: header }),
        (None, HeaderPolicy::Fallback) => {
            tracing::warn!(
                header = %header,
                "malformed header, assuming {DEFAULT_WIDTH}x{DEFAULT_HEIGHT}"
            );
            (DEFAULT_WIDTH, DEFAULT_HEIGHT)
        }
    };

    let grid = Grid::new(width, height)?;
    let mut board = Board::empty(grid);
    let mut short_rows = 0usize;
    let mut rows_read = 0usize;
    for (y, line) in lines.take(height).enumerate() {
        let line = line?;
        if line.len() < width {
            short_rows += 1;
        }
        for (x, &byte) in line.iter().take(width).enumerate() {
            if byte == ALIVE_CHAR {
                board.set(x, y, true);
            }
        }
        rows_read += 1;
    }

    if short_rows > 0 || rows_read < height {
        tracing::debug!(
            short_rows,
            missing_rows = height - rows_read,
            "incomplete rows padded with dead cells"
        );
    }
    Ok(board)
}

pub fn parse_str(text: &str, policy: HeaderPolicy) -> Result<Board> {
    parse(text.as_bytes(), policy)
}

pub fn load(path: impl AsRef<Path>, policy: HeaderPolicy) -> Result<Board> {
    let path = path.as_ref();
    tracing::info!("read file: {}", path.display());
    let file = File::open(path).map_err(|source| LifeError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    let board = parse(BufReader::new(file), policy)?;
    tracing::info!(
        width = board.grid().width(),
        height = board.grid().height(),
        total = board.grid().total(),
        "board loaded"
    );
    Ok(board)
}

fn render_row(board: &Board, counts: Option<&[u8]>, y: usize, out: &mut Vec<u8>) {
    let w = board.grid().width();
    let row = &board.cells()[y * w..][..w];
    match counts {
        None => out.extend(
            row.iter()
                .map(|&c| if c != 0 { ALIVE_CHAR } else { DEAD_CHAR }),
        ),
        Some(counts) => {
            let counts = &counts[y * w..][..w];
            out.extend(
                row.iter()
                    .zip(counts)
                    .map(|(&c, &n)| Cell((n << 1) | c).debug_char() as u8),
            );
        }
    }
    out.push(b'\n');
}

pub fn write_board<W: Write>(mut writer: W, board: &Board, mode: RenderMode) -> Result<()> {
    let grid = board.grid();
    writeln!(writer, "{},{}", grid.width(), grid.height())?;

    let counts = match mode {
        RenderMode::Plain => None,
        RenderMode::Neighbors => Some(board.neighbor_counts()),
    };
    let mut line = Vec::with_capacity(grid.width() + 1);
    for y in 0..grid.height() {
        line.clear();
        render_row(board, counts.as_deref(), y, &mut line);
        writer.write_all(&line)?;
    }
    Ok(())
}

pub fn render(board: &Board, mode: RenderMode) -> String {
    let grid = board.grid();
    let mut out = format!("{},{}\n", grid.width(), grid.height()).into_bytes();
    out.reserve(grid.total() + grid.height());
    let counts = match mode {
        RenderMode::Plain => None,
        RenderMode::Neighbors => Some(board.neighbor_counts()),
    };
    for y in 0..grid.height() {
        render_row(board, counts.as_deref(), y, &mut out);
    }
    // Only ASCII bytes are ever pushed.
    String::from_utf8_lossy(&out).into_owned()
}

pub fn save(path: impl AsRef<Path>, board: &Board, mode: RenderMode) -> Result<()> {
    let path = path.as_ref();
    tracing::info!("write file: {}", path.display());
    let file = File::create(path).map_err(|source| LifeError::OutputNotWritable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_board(&mut writer, board, mode)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{HeaderPolicy, RenderMode, parse, parse_header, parse_str, render};
    use crate::error::LifeError;

    #[test]
    fn header_accepts_spaces_around_fields() {
        assert_eq!(parse_header("4,4"), Some((4, 4)));
        assert_eq!(parse_header("10, 7"), Some((10, 7)));
        assert_eq!(parse_header(" 3 ,2 "), Some((3, 2)));
        assert_eq!(parse_header("4x4"), None);
        assert_eq!(parse_header("a,4"), None);
        assert_eq!(parse_header(""), None);
    }

    #[test]
    fn strict_policy_rejects_bad_header() {
        let err = parse_str("four by four\n....\n", HeaderPolicy::Strict).unwrap_err();
        assert!(matches!(err, LifeError::MalformedHeader { .. }));
    }

    #[test]
    fn fallback_policy_uses_default_size() {
        let board = parse_str("garbage\nx\n", HeaderPolicy::Fallback).unwrap();
        assert_eq!(board.grid().width(), super::DEFAULT_WIDTH);
        assert_eq!(board.grid().height(), super::DEFAULT_HEIGHT);
        assert!(board.get(0, 0));
        assert_eq!(board.population(), 1);
    }

    #[test]
    fn zero_sized_header_is_an_error_under_any_policy() {
        for policy in [HeaderPolicy::Strict, HeaderPolicy::Fallback] {
            let err = parse_str("0,3\n", policy).unwrap_err();
            assert!(matches!(err, LifeError::InvalidDimensions { .. }));
        }
    }

    #[test]
    fn short_and_missing_rows_are_dead() {
        let board = parse_str("4,3\nx\n.x.xEXTRA\n", HeaderPolicy::Strict).unwrap();
        assert!(board.get(0, 0));
        assert!(!board.get(1, 0));
        assert!(board.get(1, 1));
        assert!(board.get(3, 1));
        assert_eq!(board.population(), 3);
        assert!((0..4).all(|x| !board.get(x, 2)));
    }

    #[test]
    fn non_x_characters_are_dead() {
        let board = parse_str("3,1\nXo#\n", HeaderPolicy::Strict).unwrap();
        assert!(board.is_empty());
    }

    #[test]
    fn non_utf8_bytes_are_dead() {
        let board = parse(&b"3,1\nx\xB7x\n"[..], HeaderPolicy::Strict).unwrap();
        assert_eq!(board.grid().width(), 3);
        assert_eq!(board.population(), 2);
        assert!(!board.get(1, 0));

        let board = parse(&b"2,2\r\n\xFFx\r\nx\xFE\r\n"[..], HeaderPolicy::Strict).unwrap();
        assert_eq!(board.alive_indices().collect::<Vec<_>>(), [1, 2]);
    }

    #[test]
    fn rows_past_height_are_ignored() {
        let board = parse_str("2,1\nx.\nxx\n", HeaderPolicy::Strict).unwrap();
        assert_eq!(board.population(), 1);
    }

    #[test]
    fn neighbor_rendering_shows_counts_for_dead_cells() {
        let board = parse_str("4,4\n....\n.xx.\n.xx.\n....\n", HeaderPolicy::Strict).unwrap();
        let text = render(&board, RenderMode::Neighbors);
        assert_eq!(text, "4,4\n1221\n2xx2\n2xx2\n1221\n");
    }
}
