#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bomb Maze adapters.

pub mod text;

use anyhow::Result as AnyResult;
use bomb_maze_core::{CellCoord, Key, Tile};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Fill used for the player marker.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(0x00, 0xff, 0x00);

/// Solid color each frame is cleared to.
pub const BACKGROUND_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);

/// Fill color for `tile`, or `None` when the tile is not drawn.
#[must_use]
pub const fn tile_color(tile: Tile) -> Option<Color> {
    match tile {
        Tile::Air => None,
        Tile::Unbreakable => Some(Color::from_rgb_u8(0x99, 0x99, 0x99)),
        Tile::Stone => Some(Color::from_rgb_u8(0x00, 0x00, 0xcc)),
        Tile::Bomb => Some(Color::from_rgb_u8(0x77, 0x00, 0x00)),
        Tile::BombClose => Some(Color::from_rgb_u8(0xcc, 0x00, 0x00)),
        Tile::BombReallyClose => Some(Color::from_rgb_u8(0xff, 0x00, 0x00)),
        Tile::PendingFire | Tile::Fire => Some(Color::from_rgb_u8(0xff, 0xcc, 0x00)),
        Tile::ExtraBomb => Some(Color::from_rgb_u8(0x00, 0xcc, 0x00)),
        Tile::MonsterUp
        | Tile::MonsterRight
        | Tile::PendingMonsterRight
        | Tile::MonsterDown
        | Tile::PendingMonsterDown
        | Tile::MonsterLeft => Some(Color::from_rgb_u8(0xcc, 0x00, 0xcc)),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Keys pressed since the previous frame, in the order they were observed.
    pub keys: Vec<Key>,
    /// Whether the adapter detected a quit request on this frame.
    pub quit: bool,
}

/// Dimensions of the tile board in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Number of columns in the board.
    pub columns: u32,
    /// Number of rows in the board.
    pub rows: u32,
    /// Side length of a single square tile.
    pub tile_length: f32,
}

impl BoardPresentation {
    /// Creates a board descriptor, rejecting non-positive tile lengths.
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Result<Self, RenderingError> {
        if !(tile_length > 0.0) || !tile_length.is_finite() {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
        })
    }

    /// Total width of the board.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the board.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Top-left corner of `cell` in world units.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.tile_length,
            cell.row() as f32 * self.tile_length,
        )
    }
}

/// Snapshot of the board handed to backends each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board dimensions.
    pub board: BoardPresentation,
    /// Row-major tiles covering the board.
    pub tiles: Vec<Tile>,
    /// Player cell; hidden once the game is over.
    pub player: Option<CellCoord>,
    /// Bombs the player can still place.
    pub bombs: u32,
    /// Whether the game has ended.
    pub game_over: bool,
}

impl Scene {
    /// Creates an empty scene covering `board`.
    #[must_use]
    pub fn new(board: BoardPresentation) -> Self {
        let len = board.columns as usize * board.rows as usize;
        Self {
            board,
            tiles: vec![Tile::Air; len],
            player: None,
            bombs: 0,
            game_over: false,
        }
    }

    /// Replaces the scene contents with a fresh world snapshot.
    ///
    /// Tiles outside the board are skipped.
    pub fn update<I>(&mut self, tiles: I, player: CellCoord, bombs: u32, game_over: bool)
    where
        I: IntoIterator<Item = (CellCoord, Tile)>,
    {
        self.tiles.fill(Tile::Air);
        for (cell, tile) in tiles {
            if let Some(index) = self.index(cell) {
                self.tiles[index] = tile;
            }
        }
        self.player = (!game_over).then_some(player);
        self.bombs = bombs;
        self.game_over = game_over;
    }

    /// Tile drawn at `cell`, or `None` outside the board.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> Option<Tile> {
        self.index(cell).map(|index| self.tiles[index])
    }

    /// Colored rectangles to draw, tiles first and the player last.
    pub fn fills(&self) -> impl Iterator<Item = (CellCoord, Color)> + '_ {
        let columns = self.board.columns.max(1);
        self.tiles
            .iter()
            .enumerate()
            .filter_map(move |(index, tile)| {
                let index = index as u32;
                let cell = CellCoord::new(index % columns, index / columns);
                tile_color(*tile).map(|color| (cell, color))
            })
            .chain(self.player.map(|cell| (cell, PLAYER_COLOR)))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.board.columns || cell.row() >= self.board.rows {
            return None;
        }
        Some(cell.row() as usize * self.board.columns as usize + cell.column() as usize)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Bomb Maze scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the wall-clock frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive, finite side length.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> BoardPresentation {
        BoardPresentation::new(3, 2, 30.0).expect("valid board")
    }

    #[test]
    fn board_rejects_degenerate_tile_lengths() {
        for tile_length in [0.0, -4.0, f32::NAN, f32::INFINITY] {
            assert!(BoardPresentation::new(3, 3, tile_length).is_err());
        }
    }

    #[test]
    fn board_maps_cells_to_world_units() {
        let board = board();
        assert_eq!(board.width(), 90.0);
        assert_eq!(board.height(), 60.0);
        assert_eq!(board.cell_origin(CellCoord::new(2, 1)), Vec2::new(60.0, 30.0));
    }

    #[test]
    fn palette_skips_air_and_shares_fire_and_monster_colors() {
        assert_eq!(tile_color(Tile::Air), None);
        assert_eq!(tile_color(Tile::PendingFire), tile_color(Tile::Fire));
        assert_eq!(
            tile_color(Tile::MonsterUp),
            tile_color(Tile::PendingMonsterDown)
        );
        assert_eq!(
            tile_color(Tile::Unbreakable),
            Some(Color::from_rgb_u8(153, 153, 153))
        );
    }

    #[test]
    fn fills_draw_tiles_then_player() {
        let mut scene = Scene::new(board());
        scene.update(
            [
                (CellCoord::new(0, 0), Tile::Unbreakable),
                (CellCoord::new(1, 0), Tile::Air),
                (CellCoord::new(2, 1), Tile::Bomb),
                (CellCoord::new(9, 9), Tile::Stone),
            ],
            CellCoord::new(1, 1),
            1,
            false,
        );

        let fills: Vec<_> = scene.fills().collect();

        assert_eq!(
            fills,
            vec![
                (CellCoord::new(0, 0), tile_color(Tile::Unbreakable).expect("drawn")),
                (CellCoord::new(2, 1), tile_color(Tile::Bomb).expect("drawn")),
                (CellCoord::new(1, 1), PLAYER_COLOR),
            ]
        );
    }

    #[test]
    fn player_is_hidden_after_game_over() {
        let mut scene = Scene::new(board());
        scene.update(Vec::<(CellCoord, Tile)>::new(), CellCoord::new(1, 1), 0, true);

        assert!(scene.player.is_none());
        assert!(scene.game_over);
        assert_eq!(scene.fills().count(), 0);
    }
}
