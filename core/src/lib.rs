#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bomb Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate raw key presses
//! into [`Intent`] values, systems turn buffered intents into [`Command`]
//! values, the world executes those commands via its `apply` entry point and
//! then reports what happened through [`Event`] values.

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Bomb Maze.";

/// Rendered frames per second driven by the loop scheduler.
pub const FPS: u32 = 30;

/// Automaton ticks per second.
pub const TPS: u32 = 2;

/// Side length of a rendered tile in pixels.
pub const TILE_SIZE: u32 = 30;

/// Bombs the player holds when a session starts.
pub const STARTING_BOMBS: u32 = 1;

/// Probability that a blasted stone leaves an extra-bomb pickup behind.
pub const PICKUP_DROP_CHANCE: f64 = 0.1;

/// Cardinal directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Next direction in the monster patrol rotation (east, south, west, north).
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
            Self::North => Self::East,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Neighbouring cell one step in `direction`, or `None` when the step
    /// would leave the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::North => Some(Self::new(self.column, self.row.checked_sub(1)?)),
            Direction::East => Some(Self::new(self.column.checked_add(1)?, self.row)),
            Direction::South => Some(Self::new(self.column, self.row.checked_add(1)?)),
            Direction::West => Some(Self::new(self.column.checked_sub(1)?, self.row)),
        }
    }
}

/// Countdown stage of a placed bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fuse {
    /// Freshly placed.
    Fresh,
    /// One tick from critical.
    Close,
    /// Explodes on the next tick.
    ReallyClose,
}

/// Whether a tile was written ahead of the automaton cursor during the
/// current pass and must settle on the next one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Written this pass; settles into its stable form on the next tick.
    Pending,
    /// Stable form.
    Settled,
}

/// State of a single grid cell.
///
/// The set is closed: every transition in the automaton matches on all
/// fifteen variants without a wildcard arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Walkable empty floor.
    Air,
    /// Indestructible wall.
    Unbreakable,
    /// Breakable block.
    Stone,
    /// Freshly placed bomb.
    Bomb,
    /// Bomb one stage into its fuse.
    BombClose,
    /// Bomb about to explode.
    BombReallyClose,
    /// Fire written ahead of the automaton cursor.
    PendingFire,
    /// Burning fire.
    Fire,
    /// Pickup granting one extra bomb.
    ExtraBomb,
    /// Monster facing north.
    MonsterUp,
    /// Monster facing east.
    MonsterRight,
    /// Monster that stepped east ahead of the automaton cursor.
    PendingMonsterRight,
    /// Monster facing south.
    MonsterDown,
    /// Monster that stepped south ahead of the automaton cursor.
    PendingMonsterDown,
    /// Monster facing west.
    MonsterLeft,
}

impl Tile {
    /// Every tile variant ordered by its layout code.
    pub const ALL: [Tile; 15] = [
        Self::Air,
        Self::Unbreakable,
        Self::Stone,
        Self::Bomb,
        Self::BombClose,
        Self::BombReallyClose,
        Self::PendingFire,
        Self::Fire,
        Self::ExtraBomb,
        Self::MonsterUp,
        Self::MonsterRight,
        Self::PendingMonsterRight,
        Self::MonsterDown,
        Self::PendingMonsterDown,
        Self::MonsterLeft,
    ];

    /// Decodes a level-layout tile code.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// Level-layout code of the tile.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Air => 0,
            Self::Unbreakable => 1,
            Self::Stone => 2,
            Self::Bomb => 3,
            Self::BombClose => 4,
            Self::BombReallyClose => 5,
            Self::PendingFire => 6,
            Self::Fire => 7,
            Self::ExtraBomb => 8,
            Self::MonsterUp => 9,
            Self::MonsterRight => 10,
            Self::PendingMonsterRight => 11,
            Self::MonsterDown => 12,
            Self::PendingMonsterDown => 13,
            Self::MonsterLeft => 14,
        }
    }

    /// Reports whether the tile is empty floor.
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Reports whether the tile is an indestructible wall.
    #[must_use]
    pub const fn is_unbreakable(self) -> bool {
        matches!(self, Self::Unbreakable)
    }

    /// Reports whether the tile is a breakable block.
    #[must_use]
    pub const fn is_stone(self) -> bool {
        matches!(self, Self::Stone)
    }

    /// Fuse stage when the tile holds a bomb.
    #[must_use]
    pub const fn fuse(self) -> Option<Fuse> {
        match self {
            Self::Bomb => Some(Fuse::Fresh),
            Self::BombClose => Some(Fuse::Close),
            Self::BombReallyClose => Some(Fuse::ReallyClose),
            _ => None,
        }
    }

    /// Reports whether the tile holds a bomb at any fuse stage.
    #[must_use]
    pub const fn is_bomb(self) -> bool {
        self.fuse().is_some()
    }

    /// Phase of the fire occupying the tile, if any.
    #[must_use]
    pub const fn fire_phase(self) -> Option<Phase> {
        match self {
            Self::PendingFire => Some(Phase::Pending),
            Self::Fire => Some(Phase::Settled),
            _ => None,
        }
    }

    /// Facing and phase of the monster occupying the tile, if any.
    #[must_use]
    pub const fn monster(self) -> Option<(Direction, Phase)> {
        match self {
            Self::MonsterUp => Some((Direction::North, Phase::Settled)),
            Self::MonsterRight => Some((Direction::East, Phase::Settled)),
            Self::PendingMonsterRight => Some((Direction::East, Phase::Pending)),
            Self::MonsterDown => Some((Direction::South, Phase::Settled)),
            Self::PendingMonsterDown => Some((Direction::South, Phase::Pending)),
            Self::MonsterLeft => Some((Direction::West, Phase::Settled)),
            _ => None,
        }
    }

    /// Reports whether the tile is an extra-bomb pickup.
    #[must_use]
    pub const fn is_extra_bomb(self) -> bool {
        matches!(self, Self::ExtraBomb)
    }

    /// Reports whether standing on the tile ends the game.
    ///
    /// Only settled fire and settled monsters are lethal; pending variants
    /// only ever appear on cells the player could not have entered.
    #[must_use]
    pub const fn is_lethal(self) -> bool {
        matches!(self.fire_phase(), Some(Phase::Settled))
            || matches!(self.monster(), Some((_, Phase::Settled)))
    }
}

/// Discrete player action buffered by the input system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Step north.
    Up,
    /// Step south.
    Down,
    /// Step west.
    Left,
    /// Step east.
    Right,
    /// Drop a bomb on the current cell.
    PlaceBomb,
}

impl Intent {
    /// Direction of travel for movement intents.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::North),
            Self::Down => Some(Direction::South),
            Self::Left => Some(Direction::West),
            Self::Right => Some(Direction::East),
            Self::PlaceBomb => None,
        }
    }

    /// Command that carries out the intent.
    #[must_use]
    pub const fn command(self) -> Command {
        match self.direction() {
            Some(direction) => Command::Move { direction },
            None => Command::PlaceBomb,
        }
    }
}

/// Raw key identifier delivered by an input adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Arrow key pointing in the given direction.
    Arrow(Direction),
    /// Printable character, with space reported as `' '`.
    Char(char),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player step one cell in the given direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a bomb be dropped on the player's cell.
    PlaceBomb,
    /// Checks whether the player's cell has become lethal.
    EvaluateGameOver,
    /// Advances the tile automaton by one step.
    Tick,
}

/// What ended the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOverCause {
    /// The player stood in settled fire.
    Fire,
    /// The player shared a cell with a monster.
    Monster,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell occupied before the step.
        from: CellCoord,
        /// Cell occupied after the step.
        to: CellCoord,
    },
    /// Reports that a step was discarded because the destination is blocked.
    MoveBlocked {
        /// Direction of the discarded step.
        direction: Direction,
        /// Tile that blocked the step.
        blocker: Tile,
    },
    /// Confirms that the player picked up an extra bomb.
    PickupCollected {
        /// Cell the pickup was collected from.
        cell: CellCoord,
        /// Inventory after the pickup.
        bombs: u32,
    },
    /// Confirms that a bomb was placed.
    BombPlaced {
        /// Cell now holding the bomb.
        cell: CellCoord,
        /// Inventory after placement.
        bombs: u32,
    },
    /// Reports that a placement was ignored because the inventory is empty.
    BombPlacementRefused {
        /// Cell the player attempted to place on.
        cell: CellCoord,
    },
    /// Confirms that a bomb exploded during a tick.
    BombDetonated {
        /// Cell of the exploding bomb.
        cell: CellCoord,
        /// Bombs returned to the inventory by this explosion, including
        /// chained bombs destroyed by the blast.
        refunded: u32,
    },
    /// Reports that a blasted stone dropped an extra-bomb pickup.
    PickupDropped {
        /// Cell now holding the pickup.
        cell: CellCoord,
    },
    /// Confirms that the automaton completed one pass.
    TickCompleted {
        /// Number of ticks completed since the world was created.
        tick: u64,
    },
    /// Announces that the game has ended.
    GameOver {
        /// Cell the player occupied.
        cell: CellCoord,
        /// Hazard that ended the game.
        cause: GameOverCause,
    },
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Direction, Fuse, Intent, Phase, Tile};

    #[test]
    fn tile_codes_cover_the_closed_set() {
        for (code, tile) in Tile::ALL.iter().enumerate() {
            let code = u8::try_from(code).expect("fifteen codes fit in u8");
            assert_eq!(tile.code(), code);
            assert_eq!(Tile::from_code(code), Some(*tile));
        }
        assert_eq!(Tile::from_code(15), None);
        assert_eq!(Tile::from_code(u8::MAX), None);
    }

    #[test]
    fn reference_layout_codes_decode_as_expected() {
        assert_eq!(Tile::from_code(0), Some(Tile::Air));
        assert_eq!(Tile::from_code(1), Some(Tile::Unbreakable));
        assert_eq!(Tile::from_code(2), Some(Tile::Stone));
        assert_eq!(Tile::from_code(8), Some(Tile::ExtraBomb));
        assert_eq!(Tile::from_code(10), Some(Tile::MonsterRight));
    }

    #[test]
    fn predicates_partition_bombs_fire_and_monsters() {
        assert_eq!(Tile::Bomb.fuse(), Some(Fuse::Fresh));
        assert_eq!(Tile::BombReallyClose.fuse(), Some(Fuse::ReallyClose));
        assert!(!Tile::Fire.is_bomb());
        assert_eq!(Tile::PendingFire.fire_phase(), Some(Phase::Pending));
        assert_eq!(Tile::Fire.fire_phase(), Some(Phase::Settled));
        assert_eq!(
            Tile::PendingMonsterDown.monster(),
            Some((Direction::South, Phase::Pending))
        );
        assert_eq!(Tile::MonsterLeft.monster(), Some((Direction::West, Phase::Settled)));
        assert_eq!(Tile::Stone.monster(), None);
    }

    #[test]
    fn only_settled_hazards_are_lethal() {
        let lethal: Vec<Tile> = Tile::ALL.iter().copied().filter(|t| t.is_lethal()).collect();
        assert_eq!(
            lethal,
            vec![
                Tile::Fire,
                Tile::MonsterUp,
                Tile::MonsterRight,
                Tile::MonsterDown,
                Tile::MonsterLeft,
            ]
        );
    }

    #[test]
    fn patrol_rotation_is_clockwise_from_east() {
        let mut facing = Direction::East;
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(facing);
            facing = facing.clockwise();
        }
        assert_eq!(
            seen,
            vec![Direction::East, Direction::South, Direction::West, Direction::North]
        );
        assert_eq!(facing, Direction::East);
    }

    #[test]
    fn step_refuses_to_leave_the_grid_origin() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.step(Direction::North), None);
        assert_eq!(origin.step(Direction::West), None);
        assert_eq!(origin.step(Direction::East), Some(CellCoord::new(1, 0)));
        assert_eq!(origin.step(Direction::South), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn intents_map_to_directions() {
        assert_eq!(Intent::Up.direction(), Some(Direction::North));
        assert_eq!(Intent::Left.direction(), Some(Direction::West));
        assert_eq!(Intent::PlaceBomb.direction(), None);
    }

    #[test]
    fn board_snapshot_round_trips_through_bincode() {
        let board = Tile::ALL.to_vec();
        let bytes = bincode::serialize(&board).expect("serialize");
        let restored: Vec<Tile> = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, board);
    }
}
