//! Key scripts replayed by headless runs.
//!
//! Each symbol is one frame: `w` `a` `s` `d` and the arrows `^` `<` `v` `>`
//! move, `_` places a bomb and `.` idles. Square brackets press several keys
//! during the same frame, e.g. `[_d]`. Whitespace is ignored.

use bomb_maze_core::{Direction, Key};
use thiserror::Error;

/// Problems found while reading a key script.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    #[error("unknown script symbol {symbol:?} at position {position}")]
    UnknownSymbol { position: usize, symbol: char },
    #[error("group opened at position {position} is never closed")]
    UnclosedGroup { position: usize },
    #[error("groups cannot nest (position {position})")]
    NestedGroup { position: usize },
    #[error("unexpected ']' at position {position}")]
    UnexpectedClose { position: usize },
}

/// Parses `script` into the keys pressed on each frame.
pub(crate) fn parse(script: &str) -> Result<Vec<Vec<Key>>, ScriptError> {
    let mut frames = Vec::new();
    let mut group: Option<(usize, Vec<Key>)> = None;

    for (position, symbol) in script.chars().enumerate() {
        if symbol.is_whitespace() {
            continue;
        }
        match symbol {
            '[' => {
                if group.is_some() {
                    return Err(ScriptError::NestedGroup { position });
                }
                group = Some((position, Vec::new()));
            }
            ']' => {
                let (_, keys) = group
                    .take()
                    .ok_or(ScriptError::UnexpectedClose { position })?;
                frames.push(keys);
            }
            '.' => {
                if group.is_none() {
                    frames.push(Vec::new());
                }
            }
            symbol => {
                let key = key_for(symbol).ok_or(ScriptError::UnknownSymbol { position, symbol })?;
                match group.as_mut() {
                    Some((_, keys)) => keys.push(key),
                    None => frames.push(vec![key]),
                }
            }
        }
    }

    if let Some((position, _)) = group {
        return Err(ScriptError::UnclosedGroup { position });
    }
    Ok(frames)
}

fn key_for(symbol: char) -> Option<Key> {
    match symbol {
        'w' | 'a' | 's' | 'd' => Some(Key::Char(symbol)),
        '_' => Some(Key::Char(' ')),
        '^' => Some(Key::Arrow(Direction::North)),
        'v' => Some(Key::Arrow(Direction::South)),
        '<' => Some(Key::Arrow(Direction::West)),
        '>' => Some(Key::Arrow(Direction::East)),
        _ => None,
    }
}
