use bomb_maze_core::{CellCoord, Command, Event, Intent, Key, Tile};
use bomb_maze_system_input::InputQueue;
use bomb_maze_world::{self as world, query, Level, World, WorldConfig};

fn dispatch(world: &mut World, queue: &mut InputQueue) -> Vec<Event> {
    let mut commands = Vec::new();
    queue.drain(query::is_game_over(world), &mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn reference_world() -> World {
    World::new(Level::reference(), WorldConfig::default()).expect("valid config")
}

#[test]
fn later_intent_resolves_before_earlier_one() {
    let mut world = reference_world();
    let mut queue = InputQueue::new();
    queue.push(Intent::PlaceBomb);
    queue.push(Intent::Right);

    let _ = dispatch(&mut world, &mut queue);

    assert_eq!(query::player(&world), CellCoord::new(2, 1));
    assert_eq!(query::tile_at(&world, CellCoord::new(2, 1)), Some(Tile::Bomb));
    assert_eq!(query::tile_at(&world, CellCoord::new(1, 1)), Some(Tile::Air));
}

#[test]
fn up_then_down_applies_down_first() {
    let mut world = reference_world();
    let mut queue = InputQueue::new();
    assert!(queue.push_key(Key::Char('w')));
    assert!(queue.push_key(Key::Char('s')));

    let events = dispatch(&mut world, &mut queue);

    assert_eq!(
        events,
        vec![
            Event::PlayerMoved {
                from: CellCoord::new(1, 1),
                to: CellCoord::new(1, 2)
            },
            Event::PlayerMoved {
                from: CellCoord::new(1, 2),
                to: CellCoord::new(1, 1)
            },
        ]
    );
}

#[test]
fn queued_input_is_ignored_once_the_game_is_over() {
    let mut world = reference_world();
    let mut events = Vec::new();
    world::apply(&mut world, Command::PlaceBomb, &mut events);
    for _ in 0..3 {
        world::apply(&mut world, Command::Tick, &mut events);
    }
    world::apply(&mut world, Command::EvaluateGameOver, &mut events);
    assert!(query::is_game_over(&world));

    let mut queue = InputQueue::new();
    queue.push(Intent::Right);
    queue.push(Intent::Down);
    let events = dispatch(&mut world, &mut queue);

    assert!(events.is_empty());
    assert_eq!(query::player(&world), CellCoord::new(1, 1));
    assert!(query::is_game_over(&world));
}
