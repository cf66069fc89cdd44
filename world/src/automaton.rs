//! Single-pass, in-place tile automaton.
//!
//! Cells are visited row by row, left to right, and every write is visible
//! to cells visited later in the same pass. Tiles written ahead of the
//! cursor (south and east of the visited cell) use their pending variant so
//! the cursor settles them instead of advancing them a second time.

use bomb_maze_core::{CellCoord, Direction, Event, Phase, Tile};
use rand::distributions::Distribution;

use crate::World;

/// Neighbours hit by an explosion, in the order their blasts are resolved.
const BLAST_PATTERN: [(Direction, Phase); 4] = [
    (Direction::North, Phase::Settled),
    (Direction::South, Phase::Pending),
    (Direction::West, Phase::Settled),
    (Direction::East, Phase::Pending),
];

/// Advances every cell except row 0 and column 0 by one step.
pub(crate) fn advance(world: &mut World, out_events: &mut Vec<Event>) {
    for row in 1..world.grid.rows() {
        for column in 1..world.grid.columns() {
            update_tile(world, CellCoord::new(column, row), out_events);
        }
    }

    world.tick = world.tick.saturating_add(1);
    out_events.push(Event::TickCompleted { tick: world.tick });
    tracing::trace!(target: "bomb_maze::world", tick = world.tick, bombs = world.bombs, "world.tick");
}

fn update_tile(world: &mut World, cell: CellCoord, out_events: &mut Vec<Event>) {
    let Some(tile) = world.grid.tile(cell) else {
        return;
    };

    match tile {
        Tile::Bomb => world.grid.set(cell, Tile::BombClose),
        Tile::BombClose => world.grid.set(cell, Tile::BombReallyClose),
        Tile::BombReallyClose => detonate(world, cell, out_events),
        Tile::PendingFire => world.grid.set(cell, Tile::Fire),
        Tile::Fire => world.grid.set(cell, Tile::Air),
        Tile::PendingMonsterDown => world.grid.set(cell, Tile::MonsterDown),
        Tile::PendingMonsterRight => world.grid.set(cell, Tile::MonsterRight),
        Tile::MonsterRight => patrol(world, cell, Direction::East),
        Tile::MonsterDown => patrol(world, cell, Direction::South),
        Tile::MonsterLeft => patrol(world, cell, Direction::West),
        Tile::MonsterUp => patrol(world, cell, Direction::North),
        Tile::Air | Tile::Unbreakable | Tile::Stone | Tile::ExtraBomb => {}
    }
}

fn detonate(world: &mut World, cell: CellCoord, out_events: &mut Vec<Event>) {
    let mut refunded = 1;
    for (direction, phase) in BLAST_PATTERN {
        if let Some(target) = cell.step(direction) {
            refunded += blast(world, target, phase, out_events);
        }
    }
    world.grid.set(cell, Tile::Fire);
    world.bombs = world.bombs.saturating_add(refunded);

    out_events.push(Event::BombDetonated { cell, refunded });
    tracing::debug!(
        target: "bomb_maze::world",
        column = cell.column(),
        row = cell.row(),
        refunded,
        bombs = world.bombs,
        "bomb.detonated"
    );
}

/// Applies one explosion to `target` and returns the bombs it refunds.
fn blast(world: &mut World, target: CellCoord, phase: Phase, out_events: &mut Vec<Event>) -> u32 {
    let Some(tile) = world.grid.tile(target) else {
        return 0;
    };
    let fire = match phase {
        Phase::Pending => Tile::PendingFire,
        Phase::Settled => Tile::Fire,
    };

    if tile.is_stone() {
        if world.pickup_drop.sample(&mut world.rng) {
            world.grid.set(target, Tile::ExtraBomb);
            out_events.push(Event::PickupDropped { cell: target });
        } else {
            world.grid.set(target, fire);
        }
        0
    } else if !tile.is_unbreakable() {
        world.grid.set(target, fire);
        u32::from(tile.is_bomb())
    } else {
        0
    }
}

/// Steps a settled monster forward or turns it clockwise when blocked.
fn patrol(world: &mut World, cell: CellCoord, facing: Direction) {
    let ahead = cell
        .step(facing)
        .filter(|ahead| world.grid.tile(*ahead).is_some_and(Tile::is_air));

    match ahead {
        Some(ahead) => {
            world.grid.set(cell, Tile::Air);
            world.grid.set(ahead, arriving_monster(facing));
        }
        None => world.grid.set(cell, settled_monster(facing.clockwise())),
    }
}

/// Tile written into the cell a monster steps into.
const fn arriving_monster(facing: Direction) -> Tile {
    match facing {
        Direction::East => Tile::PendingMonsterRight,
        Direction::South => Tile::PendingMonsterDown,
        Direction::West => Tile::MonsterLeft,
        Direction::North => Tile::MonsterUp,
    }
}

const fn settled_monster(facing: Direction) -> Tile {
    match facing {
        Direction::North => Tile::MonsterUp,
        Direction::East => Tile::MonsterRight,
        Direction::South => Tile::MonsterDown,
        Direction::West => Tile::MonsterLeft,
    }
}
