//! Reading stationary-point logs.
//!
//! A log is a sequence of record blocks separated by blank lines. The first
//! block is the file header and carries no point; every following block is
//! parsed with [`parse_block`].

use std::io::{BufRead, Read};

use tracing::{debug, trace};

use crate::model::point::{PointKind, StationaryPoint};

pub mod error;
mod record;

pub use error::Error;
pub use record::parse_block;

/// Splits log text into record blocks, discarding the leading header block.
///
/// Blocks are runs of non-blank lines; any number of blank (or
/// whitespace-only) lines separates two blocks.
pub fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    if !blocks.is_empty() {
        blocks.remove(0);
    }
    blocks
}

/// Parses every record block of an in-memory log.
///
/// # Errors
///
/// The first malformed block aborts the batch; the returned
/// [`Error::Parse`] carries its 1-based position among the record blocks.
pub fn parse_log(text: &str, kind: PointKind) -> Result<Vec<StationaryPoint>, Error> {
    let blocks = split_blocks(text);
    let mut points = Vec::with_capacity(blocks.len());

    for (i, block) in blocks.iter().enumerate() {
        let point = parse_block(block, kind).map_err(|e| e.at_block(i + 1))?;
        trace!(point = %point.id, atoms = point.n_atoms(), "parsed record block");
        points.push(point);
    }

    debug!(%kind, count = points.len(), "parsed stationary-point log");
    Ok(points)
}

/// Reads a whole log from `reader` and parses it like [`parse_log`].
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise the errors of
/// [`parse_log`].
pub fn read_points<R: BufRead>(
    mut reader: R,
    kind: PointKind,
) -> Result<Vec<StationaryPoint>, Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_log(&text, kind)
}
