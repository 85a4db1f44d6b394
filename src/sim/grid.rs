//! Static tile grid built once per level from a textual map
//!
//! Grid cells never hold actors; actor spawns are parsed separately by the
//! level and their cells read as empty floor space here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of one static grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Wall,
    Hazard,
}

impl TileKind {
    /// Fixed map symbol table. Unrecognized symbols (including the actor
    /// spawn markers `@`, `o`, `v`) read as empty space.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            'x' => TileKind::Wall,
            '!' => TileKind::Hazard,
            _ => TileKind::Empty,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == TileKind::Empty
    }
}

/// Malformed map description
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map has no tiles")]
    Empty,
    #[error("map row {row} has {len} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// Immutable 2D array of tile kinds, row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl Grid {
    /// Build a grid from rows of map symbols.
    ///
    /// Fails fast on a ragged or empty map rather than silently truncating.
    pub fn from_rows(rows: &[&str]) -> Result<Self, MapError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        if height == 0 || width == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * height);
        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(MapError::RaggedRow {
                    row,
                    len,
                    expected: width,
                });
            }
            tiles.extend(line.chars().map(TileKind::from_symbol));
        }

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile kind at (col, row). Defined only for in-bounds coordinates;
    /// callers guard (see `Level::obstacle_at`, which treats out-of-bounds
    /// coverage as an implicit wall).
    #[inline]
    pub fn tile(&self, col: usize, row: usize) -> TileKind {
        self.tiles[row * self.width + col]
    }
}
