#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session system that sequences one Bomb Maze frame.
//!
//! Every frame drains buffered input, checks whether the player is standing on
//! something lethal and, when the cadence allows, advances the tile automaton.

use bomb_maze_core::{CellCoord, Command, Event, Intent, Key, WELCOME_BANNER};
use bomb_maze_system_input::InputQueue;
use bomb_maze_system_pacing::{Pacing, TickCadence};
use bomb_maze_world::{self as world, query, Grid, Level, World, WorldConfig, WorldError};

/// Summary of a processed frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether the automaton advanced during the frame.
    pub ticked: bool,
    /// Whether the game had ended by the close of the frame.
    pub game_over: bool,
}

/// Owns the world together with the input buffer and tick cadence driving it.
#[derive(Debug)]
pub struct Session {
    world: World,
    inputs: InputQueue,
    cadence: TickCadence,
    commands: Vec<Command>,
    frames: u64,
}

impl Session {
    /// Starts a session on `level`.
    pub fn new(level: Level, config: WorldConfig, pacing: Pacing) -> Result<Self, WorldError> {
        let world = World::new(level, config)?;
        tracing::info!(
            target: "bomb_maze::session",
            columns = query::grid(&world).columns(),
            rows = query::grid(&world).rows(),
            bombs = query::bombs(&world),
            fps = pacing.fps(),
            tps = pacing.tps(),
            "session.started"
        );
        Ok(Self {
            world,
            inputs: InputQueue::new(),
            cadence: TickCadence::new(&pacing),
            commands: Vec::new(),
            frames: 0,
        })
    }

    /// Banner greeting the player.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        WELCOME_BANNER
    }

    /// Buffers an intent for the next frame.
    pub fn push_intent(&mut self, intent: Intent) {
        self.inputs.push(intent);
    }

    /// Buffers the intent bound to `key`, returning whether it was recognised.
    pub fn push_key(&mut self, key: Key) -> bool {
        self.inputs.push_key(key)
    }

    /// Runs one frame, appending every world event it produces to `out_events`.
    pub fn run_frame(&mut self, out_events: &mut Vec<Event>) -> FrameReport {
        self.frames += 1;

        self.commands.clear();
        self.inputs
            .drain(query::is_game_over(&self.world), &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }

        world::apply(&mut self.world, Command::EvaluateGameOver, out_events);

        let ticked = self.cadence.frame();
        if ticked {
            world::apply(&mut self.world, Command::Tick, out_events);
            tracing::trace!(
                target: "bomb_maze::session",
                frame = self.frames,
                tick = query::tick(&self.world),
                "session.tick"
            );
        }

        FrameReport {
            ticked,
            game_over: query::is_game_over(&self.world),
        }
    }

    /// Read-only view of the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Tile grid for presentation.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        query::grid(&self.world)
    }

    /// Cell the player occupies.
    #[must_use]
    pub fn player(&self) -> CellCoord {
        query::player(&self.world)
    }

    /// Bombs the player can still place.
    #[must_use]
    pub fn bombs(&self) -> u32 {
        query::bombs(&self.world)
    }

    /// Reports whether the game has ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::is_game_over(&self.world)
    }

    /// Frames processed so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
