#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input system that buffers player intents and replays them as commands.
//!
//! Intents are replayed most-recent-first: the buffer is a stack, so the last
//! key pressed within a frame resolves before the ones pressed earlier.

use bomb_maze_core::{Command, Direction, Intent, Key};

/// Maps a raw key to the intent it triggers.
///
/// Arrow keys and lowercase `w`, `a`, `s`, `d` move, space places a bomb,
/// everything else is ignored.
#[must_use]
pub fn intent_for_key(key: Key) -> Option<Intent> {
    match key {
        Key::Arrow(Direction::North) | Key::Char('w') => Some(Intent::Up),
        Key::Arrow(Direction::South) | Key::Char('s') => Some(Intent::Down),
        Key::Arrow(Direction::West) | Key::Char('a') => Some(Intent::Left),
        Key::Arrow(Direction::East) | Key::Char('d') => Some(Intent::Right),
        Key::Char(' ') => Some(Intent::PlaceBomb),
        Key::Char(_) => None,
    }
}

/// Stack of intents awaiting dispatch.
#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    pending: Vec<Intent>,
}

impl InputQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers one intent.
    pub fn push(&mut self, intent: Intent) {
        self.pending.push(intent);
    }

    /// Buffers the intent bound to `key`, returning whether the key was
    /// recognised.
    pub fn push_key(&mut self, key: Key) -> bool {
        match intent_for_key(key) {
            Some(intent) => {
                self.push(intent);
                true
            }
            None => false,
        }
    }

    /// Number of buffered intents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether no intents are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Emits one command per buffered intent, most recent first.
    ///
    /// Once the game is over buffered intents are discarded without emitting
    /// anything.
    pub fn drain(&mut self, game_over: bool, out: &mut Vec<Command>) {
        if game_over {
            self.pending.clear();
            return;
        }

        while let Some(intent) = self.pending.pop() {
            out.push(intent.command());
        }
    }
}
