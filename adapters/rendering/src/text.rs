//! Plain-text rendering of a [`Scene`] for terminals and headless runs.

use bomb_maze_core::{CellCoord, Tile};

use crate::Scene;

/// Glyph marking the player.
pub const PLAYER_GLYPH: char = '@';

/// Single-character glyph drawn for `tile`.
#[must_use]
pub const fn glyph(tile: Tile) -> char {
    match tile {
        Tile::Air => '.',
        Tile::Unbreakable => '#',
        Tile::Stone => '%',
        Tile::Bomb => '3',
        Tile::BombClose => '2',
        Tile::BombReallyClose => '1',
        Tile::PendingFire | Tile::Fire => '*',
        Tile::ExtraBomb => '+',
        Tile::MonsterUp => '^',
        Tile::MonsterRight | Tile::PendingMonsterRight => '>',
        Tile::MonsterDown | Tile::PendingMonsterDown => 'v',
        Tile::MonsterLeft => '<',
    }
}

/// Renders the board one line per row, with the player drawn over its tile.
#[must_use]
pub fn render(scene: &Scene) -> String {
    let columns = scene.board.columns;
    let rows = scene.board.rows;
    let mut out = String::with_capacity((columns as usize + 1) * rows as usize);

    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let symbol = if scene.player == Some(cell) {
                PLAYER_GLYPH
            } else {
                scene.tile(cell).map_or(' ', glyph)
            };
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}
