#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Bomb Maze.

mod automaton;
mod grid;
mod level;

use bomb_maze_core::{
    CellCoord, Command, Direction, Event, GameOverCause, Phase, Tile, PICKUP_DROP_CHANCE,
    STARTING_BOMBS,
};
use rand::{distributions::Bernoulli, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use grid::Grid;
pub use level::{Level, LevelError};

/// Tunables applied when a world is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Bombs the player holds at spawn.
    pub starting_bombs: u32,
    /// Probability that a blasted stone drops an extra-bomb pickup.
    pub pickup_chance: f64,
    /// Seed for the pickup-drop random stream.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            starting_bombs: STARTING_BOMBS,
            pickup_chance: PICKUP_DROP_CHANCE,
            seed: 0x5eed_b0b0_0000_0001,
        }
    }
}

/// Errors raised when a world configuration cannot be honoured.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum WorldError {
    /// The pickup probability lies outside `0.0..=1.0`.
    #[error("pickup chance {0} must lie within 0.0..=1.0")]
    InvalidPickupChance(f64),
}

/// Represents the authoritative Bomb Maze world state.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    player: CellCoord,
    bombs: u32,
    game_over: bool,
    tick: u64,
    rng: ChaCha8Rng,
    pickup_drop: Bernoulli,
}

impl World {
    /// Creates a world from a validated level.
    pub fn new(level: Level, config: WorldConfig) -> Result<Self, WorldError> {
        let pickup_drop = Bernoulli::new(config.pickup_chance)
            .map_err(|_| WorldError::InvalidPickupChance(config.pickup_chance))?;
        let (grid, player) = level.into_parts();
        Ok(Self {
            grid,
            player,
            bombs: config.starting_bombs,
            game_over: false,
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            pickup_drop,
        })
    }

    fn step_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if self.game_over {
            return;
        }

        let from = self.player;
        let Some((to, destination)) = from
            .step(direction)
            .and_then(|to| self.grid.tile(to).map(|tile| (to, tile)))
        else {
            return;
        };

        if destination.is_extra_bomb() {
            self.player = to;
            self.bombs = self.bombs.saturating_add(1);
            self.grid.set(to, Tile::Air);
            out_events.push(Event::PlayerMoved { from, to });
            out_events.push(Event::PickupCollected {
                cell: to,
                bombs: self.bombs,
            });
        } else if destination.is_air() || destination.fire_phase() == Some(Phase::Settled) {
            self.player = to;
            out_events.push(Event::PlayerMoved { from, to });
        } else {
            out_events.push(Event::MoveBlocked {
                direction,
                blocker: destination,
            });
        }
    }

    fn place_bomb(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over {
            return;
        }

        let cell = self.player;
        if self.bombs == 0 {
            out_events.push(Event::BombPlacementRefused { cell });
            return;
        }

        self.grid.set(cell, Tile::Bomb);
        self.bombs -= 1;
        out_events.push(Event::BombPlaced {
            cell,
            bombs: self.bombs,
        });
        tracing::debug!(
            target: "bomb_maze::world",
            column = cell.column(),
            row = cell.row(),
            bombs = self.bombs,
            "bomb.placed"
        );
    }

    fn evaluate_game_over(&mut self, out_events: &mut Vec<Event>) {
        if self.game_over {
            return;
        }

        let cell = self.player;
        let Some(tile) = self.grid.tile(cell) else {
            return;
        };
        if !tile.is_lethal() {
            return;
        }

        let cause = if tile.monster().is_some() {
            GameOverCause::Monster
        } else {
            GameOverCause::Fire
        };
        self.game_over = true;
        out_events.push(Event::GameOver { cell, cause });
        tracing::info!(
            target: "bomb_maze::world",
            column = cell.column(),
            row = cell.row(),
            cause = ?cause,
            tick = self.tick,
            "player.game_over"
        );
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Movement and placement are ignored once the game is over; the automaton
/// keeps running.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Move { direction } => world.step_player(direction, out_events),
        Command::PlaceBomb => world.place_bomb(out_events),
        Command::EvaluateGameOver => world.evaluate_game_over(out_events),
        Command::Tick => automaton::advance(world, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bomb_maze_core::{CellCoord, Tile};

    use super::{Grid, World};

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Tile at `cell`, or `None` outside the grid.
    #[must_use]
    pub fn tile_at(world: &World, cell: CellCoord) -> Option<Tile> {
        world.grid.tile(cell)
    }

    /// Cell the player currently occupies.
    #[must_use]
    pub fn player(world: &World) -> CellCoord {
        world.player
    }

    /// Bombs available for placement.
    #[must_use]
    pub fn bombs(world: &World) -> u32 {
        world.bombs
    }

    /// Reports whether the game has ended.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Number of automaton ticks completed.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room(bombs: u32) -> World {
        let rows: [[u8; 5]; 5] = [
            [1, 1, 1, 1, 1],
            [1, 0, 8, 2, 1],
            [1, 7, 0, 6, 1],
            [1, 12, 3, 0, 1],
            [1, 1, 1, 1, 1],
        ];
        let level = Level::from_codes(&rows, CellCoord::new(1, 1)).expect("valid layout");
        World::new(
            level,
            WorldConfig {
                starting_bombs: bombs,
                ..WorldConfig::default()
            },
        )
        .expect("valid config")
    }

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    #[test]
    fn rejects_pickup_chance_outside_unit_interval() {
        let error = World::new(
            Level::reference(),
            WorldConfig {
                pickup_chance: 1.5,
                ..WorldConfig::default()
            },
        )
        .expect_err("probability above one");
        assert_eq!(error, WorldError::InvalidPickupChance(1.5));
    }

    #[test]
    fn walking_onto_extra_bomb_collects_it() {
        let mut world = open_room(0);

        let events = run(&mut world, Command::Move { direction: Direction::East });

        assert_eq!(query::player(&world), CellCoord::new(2, 1));
        assert_eq!(query::bombs(&world), 1);
        assert_eq!(query::tile_at(&world, CellCoord::new(2, 1)), Some(Tile::Air));
        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: CellCoord::new(1, 1),
                    to: CellCoord::new(2, 1)
                },
                Event::PickupCollected {
                    cell: CellCoord::new(2, 1),
                    bombs: 1
                },
            ]
        );
    }

    #[test]
    fn walls_stone_and_bombs_block_movement() {
        let mut world = open_room(0);

        let events = run(&mut world, Command::Move { direction: Direction::North });
        assert_eq!(query::player(&world), CellCoord::new(1, 1));
        assert_eq!(
            events,
            vec![Event::MoveBlocked {
                direction: Direction::North,
                blocker: Tile::Unbreakable
            }]
        );

        let _ = run(&mut world, Command::Move { direction: Direction::East });
        let events = run(&mut world, Command::Move { direction: Direction::East });
        assert_eq!(query::player(&world), CellCoord::new(2, 1));
        assert!(matches!(
            events.as_slice(),
            [Event::MoveBlocked {
                blocker: Tile::Stone,
                ..
            }]
        ));

        let _ = run(&mut world, Command::Move { direction: Direction::South });
        let events = run(&mut world, Command::Move { direction: Direction::South });
        assert_eq!(query::player(&world), CellCoord::new(2, 2));
        assert!(matches!(
            events.as_slice(),
            [Event::MoveBlocked {
                blocker: Tile::Bomb,
                ..
            }]
        ));
    }

    #[test]
    fn player_may_walk_into_settled_fire_but_not_pending_fire() {
        let mut world = open_room(0);

        let _ = run(&mut world, Command::Move { direction: Direction::South });
        assert_eq!(query::player(&world), CellCoord::new(1, 2));

        let _ = run(&mut world, Command::Move { direction: Direction::East });
        let events = run(&mut world, Command::Move { direction: Direction::East });
        assert_eq!(query::player(&world), CellCoord::new(2, 2));
        assert!(matches!(
            events.as_slice(),
            [Event::MoveBlocked {
                blocker: Tile::PendingFire,
                ..
            }]
        ));
    }

    #[test]
    fn placing_without_inventory_is_a_no_op() {
        let mut world = open_room(0);
        let before = query::grid(&world).clone();

        let events = run(&mut world, Command::PlaceBomb);

        assert_eq!(query::grid(&world), &before);
        assert_eq!(query::bombs(&world), 0);
        assert_eq!(
            events,
            vec![Event::BombPlacementRefused {
                cell: CellCoord::new(1, 1)
            }]
        );
    }

    #[test]
    fn placing_a_bomb_spends_inventory() {
        let mut world = open_room(2);

        let _ = run(&mut world, Command::PlaceBomb);

        assert_eq!(query::bombs(&world), 1);
        assert_eq!(query::tile_at(&world, CellCoord::new(1, 1)), Some(Tile::Bomb));
    }

    #[test]
    fn standing_in_fire_ends_the_game_for_good() {
        let mut world = open_room(1);
        let _ = run(&mut world, Command::Move { direction: Direction::South });

        let events = run(&mut world, Command::EvaluateGameOver);
        assert!(query::is_game_over(&world));
        assert_eq!(
            events,
            vec![Event::GameOver {
                cell: CellCoord::new(1, 2),
                cause: GameOverCause::Fire
            }]
        );

        let _ = run(&mut world, Command::Tick);
        let _ = run(&mut world, Command::Tick);
        let events = run(&mut world, Command::EvaluateGameOver);
        assert!(events.is_empty());
        assert!(query::is_game_over(&world));

        let _ = run(&mut world, Command::Move { direction: Direction::North });
        let _ = run(&mut world, Command::PlaceBomb);
        assert_eq!(query::player(&world), CellCoord::new(1, 2));
        assert_eq!(query::bombs(&world), 1);
    }

    #[test]
    fn safe_cells_do_not_end_the_game() {
        let mut world = open_room(1);
        let events = run(&mut world, Command::EvaluateGameOver);
        assert!(events.is_empty());
        assert!(!query::is_game_over(&world));
    }
}
