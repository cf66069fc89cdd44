use bomb_maze_core::{CellCoord, Tile};

/// Dense row-major tile storage for the play field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Wraps row-major tiles; callers guarantee `tiles.len() == columns * rows`.
    pub(crate) fn from_tiles(columns: u32, rows: u32, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(
            u64::try_from(tiles.len()).ok(),
            Some(u64::from(columns) * u64::from(rows))
        );
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile stored at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Row-major view of every tile.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Iterates every cell with its tile, rows top-to-bottom and columns
    /// left-to-right.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    /// Reports whether `cell` lies on the outer ring.
    #[must_use]
    pub fn is_border(&self, cell: CellCoord) -> bool {
        cell.row() == 0
            || cell.column() == 0
            || cell.row().saturating_add(1) == self.rows
            || cell.column().saturating_add(1) == self.columns
    }

    pub(crate) fn set(&mut self, cell: CellCoord, tile: Tile) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.tiles.get_mut(index) {
                *slot = tile;
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_by_two() -> Grid {
        Grid::from_tiles(
            3,
            2,
            vec![
                Tile::Unbreakable,
                Tile::Air,
                Tile::Stone,
                Tile::Fire,
                Tile::ExtraBomb,
                Tile::Bomb,
            ],
        )
    }

    #[test]
    fn tile_lookup_is_row_major() {
        let grid = three_by_two();
        assert_eq!(grid.tile(CellCoord::new(2, 0)), Some(Tile::Stone));
        assert_eq!(grid.tile(CellCoord::new(0, 1)), Some(Tile::Fire));
        assert_eq!(grid.tile(CellCoord::new(3, 0)), None);
        assert_eq!(grid.tile(CellCoord::new(0, 2)), None);
    }

    #[test]
    fn iter_yields_coordinates_in_scan_order() {
        let grid = three_by_two();
        let cells: Vec<CellCoord> = grid.iter().map(|(cell, _)| cell).collect();
        assert_eq!(cells.first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(cells.get(3), Some(&CellCoord::new(0, 1)));
        assert_eq!(cells.last(), Some(&CellCoord::new(2, 1)));
    }

    #[test]
    fn set_ignores_cells_outside_the_grid() {
        let mut grid = three_by_two();
        let before = grid.clone();
        grid.set(CellCoord::new(9, 9), Tile::Fire);
        assert_eq!(grid, before);

        grid.set(CellCoord::new(1, 0), Tile::Bomb);
        assert_eq!(grid.tile(CellCoord::new(1, 0)), Some(Tile::Bomb));
    }
}
