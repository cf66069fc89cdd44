use bomb_maze_core::{CellCoord, Tile};
use thiserror::Error;

use crate::grid::Grid;

const A: Tile = Tile::Air;
const U: Tile = Tile::Unbreakable;
const S: Tile = Tile::Stone;
const M: Tile = Tile::MonsterRight;

/// Reference 9×9 layout: open corner for the player, a stone field with
/// pillars, and a clearing in the south-east patrolled by one monster.
const REFERENCE_LAYOUT: [[Tile; 9]; 9] = [
    [U, U, U, U, U, U, U, U, U],
    [U, A, A, S, S, S, S, S, U],
    [U, A, U, S, U, S, U, S, U],
    [U, S, S, S, S, S, S, S, U],
    [U, S, U, S, U, S, U, S, U],
    [U, S, S, S, S, A, A, A, U],
    [U, S, U, S, U, A, U, A, U],
    [U, S, S, S, S, A, A, M, U],
    [U, U, U, U, U, U, U, U, U],
];

/// Errors raised while loading a level layout.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The layout contained no rows or an empty first row.
    #[error("level layout is empty")]
    Empty,
    /// A row's width differs from the first row.
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A layout entry could not be parsed as a tile code.
    #[error("line {line}: '{token}' is not a tile code")]
    InvalidToken {
        /// One-based line number in the source text.
        line: usize,
        /// Text that failed to parse.
        token: String,
    },
    /// A tile code outside the closed tile set.
    #[error("unknown tile code {code} at column {column}, row {row}")]
    UnknownTileCode {
        /// Column of the offending entry.
        column: usize,
        /// Row of the offending entry.
        row: usize,
        /// Code that failed to decode.
        code: u8,
    },
    /// The outer ring contains a tile other than an unbreakable wall.
    #[error("border cell at column {column}, row {row} is {tile:?}, expected Unbreakable")]
    OpenBorder {
        /// Column of the offending border cell.
        column: u32,
        /// Row of the offending border cell.
        row: u32,
        /// Tile found on the border.
        tile: Tile,
    },
    /// The spawn cell lies outside the grid.
    #[error("spawn at column {column}, row {row} lies outside the grid")]
    SpawnOutOfBounds {
        /// Column of the spawn cell.
        column: u32,
        /// Row of the spawn cell.
        row: u32,
    },
    /// The spawn cell holds a tile the player cannot stand on.
    #[error("spawn cell holds {tile:?}")]
    SpawnBlocked {
        /// Tile occupying the spawn cell.
        tile: Tile,
    },
}

/// Validated initial grid together with the player's spawn cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    grid: Grid,
    spawn: CellCoord,
}

impl Level {
    /// Spawn cell used by every layout that does not name its own.
    pub const DEFAULT_SPAWN: CellCoord = CellCoord::new(1, 1);

    /// The built-in 9×9 layout.
    #[must_use]
    pub fn reference() -> Self {
        let tiles = REFERENCE_LAYOUT.iter().flatten().copied().collect();
        Self {
            grid: Grid::from_tiles(9, 9, tiles),
            spawn: Self::DEFAULT_SPAWN,
        }
    }

    /// Builds a level from rows of tile codes.
    ///
    /// Every code must name a tile, rows must share one width, the outer ring
    /// must be unbreakable and the spawn cell must be enterable.
    pub fn from_codes<R>(rows: &[R], spawn: CellCoord) -> Result<Self, LevelError>
    where
        R: AsRef<[u8]>,
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if width == 0 {
            return Err(LevelError::Empty);
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(LevelError::RaggedRow {
                    row: row_index,
                    expected: width,
                    found: row.len(),
                });
            }
            for (column_index, code) in row.iter().copied().enumerate() {
                let tile = Tile::from_code(code).ok_or(LevelError::UnknownTileCode {
                    column: column_index,
                    row: row_index,
                    code,
                })?;
                tiles.push(tile);
            }
        }

        let columns = u32::try_from(width).map_err(|_| LevelError::Empty)?;
        let row_count = u32::try_from(rows.len()).map_err(|_| LevelError::Empty)?;
        let grid = Grid::from_tiles(columns, row_count, tiles);
        validate(&grid, spawn)?;
        Ok(Self { grid, spawn })
    }

    /// Parses a layout written one row per line.
    ///
    /// Codes are separated by whitespace or commas, blank lines are skipped
    /// and lines starting with `#` are comments. The level spawns the player
    /// at [`Level::DEFAULT_SPAWN`].
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for (line_index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let row = trimmed
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<u8>().map_err(|_| LevelError::InvalidToken {
                        line: line_index + 1,
                        token: token.to_owned(),
                    })
                })
                .collect::<Result<Vec<u8>, _>>()?;
            rows.push(row);
        }

        Self::from_codes(&rows, Self::DEFAULT_SPAWN)
    }

    /// Initial tile grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell the player starts on.
    #[must_use]
    pub const fn spawn(&self) -> CellCoord {
        self.spawn
    }

    pub(crate) fn into_parts(self) -> (Grid, CellCoord) {
        (self.grid, self.spawn)
    }
}

fn validate(grid: &Grid, spawn: CellCoord) -> Result<(), LevelError> {
    if let Some((cell, tile)) = grid
        .iter()
        .find(|(cell, tile)| grid.is_border(*cell) && !tile.is_unbreakable())
    {
        return Err(LevelError::OpenBorder {
            column: cell.column(),
            row: cell.row(),
            tile,
        });
    }

    let tile = grid.tile(spawn).ok_or(LevelError::SpawnOutOfBounds {
        column: spawn.column(),
        row: spawn.row(),
    })?;
    if tile.is_unbreakable() || tile.is_stone() {
        return Err(LevelError::SpawnBlocked { tile });
    }

    Ok(())
}
