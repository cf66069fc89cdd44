#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Bomb Maze.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::Result;
use bomb_maze_core::{Direction, Key};
use bomb_maze_rendering::{BoardPresentation, FrameInput, Presentation, RenderingBackend, Scene};
use glam::Vec2;
use macroquad::input::{is_key_pressed, KeyCode};
use std::time::Duration;

/// Height reserved below the board for the inventory line.
const HUD_HEIGHT: f32 = 24.0;

/// Keys polled every frame, paired with the game key they report.
const GAME_KEYS: [(KeyCode, Key); 9] = [
    (KeyCode::Up, Key::Arrow(Direction::North)),
    (KeyCode::Down, Key::Arrow(Direction::South)),
    (KeyCode::Left, Key::Arrow(Direction::West)),
    (KeyCode::Right, Key::Arrow(Direction::East)),
    (KeyCode::W, Key::Char('w')),
    (KeyCode::A, Key::Char('a')),
    (KeyCode::S, Key::Char('s')),
    (KeyCode::D, Key::Char('d')),
    (KeyCode::Space, Key::Char(' ')),
];

/// Snapshot of edge-triggered keys observed during a single frame.
#[derive(Clone, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// Movement and placement keys pressed this frame.
    keys: Vec<Key>,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let keys = GAME_KEYS
            .iter()
            .filter(|(code, _)| is_key_pressed(*code))
            .map(|(_, key)| *key)
            .collect();

        Self {
            quit_requested,
            keys,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.board.width().ceil() as i32,
            window_height: (scene.board.height() + HUD_HEIGHT).ceil() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                let KeyboardShortcuts {
                    quit_requested,
                    keys,
                } = KeyboardShortcuts::poll();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(
                    frame_dt,
                    FrameInput {
                        keys,
                        quit: quit_requested,
                    },
                    &mut scene,
                );
                if quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);
                let metrics = ViewportMetrics::fit(
                    &scene.board,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height() - HUD_HEIGHT,
                );
                draw_board(&scene, &metrics);
                draw_hud(&scene, &metrics);

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Mapping from board world units to screen pixels.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMetrics {
    /// Screen pixels per world unit.
    pub scale: f32,
    /// Screen position of the board's top-left corner.
    pub offset: Vec2,
    /// Side length of one tile on screen.
    pub tile_step: f32,
}

impl ViewportMetrics {
    /// Fits `board` inside a `screen_width` by `screen_height` area, centred and
    /// preserving the square tile aspect.
    #[must_use]
    pub fn fit(board: &BoardPresentation, screen_width: f32, screen_height: f32) -> Self {
        let width = board.width();
        let height = board.height();
        let scale = if width <= f32::EPSILON || height <= f32::EPSILON {
            1.0
        } else {
            (screen_width.max(0.0) / width).min(screen_height.max(0.0) / height)
        };

        let offset = Vec2::new(
            ((screen_width - width * scale) * 0.5).max(0.0),
            ((screen_height - height * scale) * 0.5).max(0.0),
        );

        Self {
            scale,
            offset,
            tile_step: board.tile_length * scale,
        }
    }

    /// Screen position of a world-space point.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        self.offset + world * self.scale
    }
}

fn draw_board(scene: &Scene, metrics: &ViewportMetrics) {
    for (cell, color) in scene.fills() {
        let origin = metrics.to_screen(scene.board.cell_origin(cell));
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            metrics.tile_step,
            metrics.tile_step,
            to_macroquad_color(color),
        );
    }
}

fn draw_hud(scene: &Scene, metrics: &ViewportMetrics) {
    let status = if scene.game_over {
        format!("bombs: {}  GAME OVER", scene.bombs)
    } else {
        format!("bombs: {}", scene.bombs)
    };
    let baseline = metrics.offset.y + scene.board.height() * metrics.scale + HUD_HEIGHT - 6.0;
    let _ = macroquad::text::draw_text(
        &status,
        metrics.offset.x + 4.0,
        baseline,
        HUD_HEIGHT,
        macroquad::color::WHITE,
    );
}

fn to_macroquad_color(color: bomb_maze_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_game_key_is_bound_once() {
        for (index, (code, _)) in GAME_KEYS.iter().enumerate() {
            assert!(GAME_KEYS[index + 1..]
                .iter()
                .all(|(other, _)| other != code));
        }
        assert!(GAME_KEYS
            .iter()
            .any(|(_, key)| *key == Key::Char(' ')));
    }

    #[test]
    fn color_channels_are_forwarded() {
        let converted = to_macroquad_color(bomb_maze_rendering::PLAYER_COLOR);
        assert_eq!(converted.r, 0.0);
        assert_eq!(converted.g, 1.0);
        assert_eq!(converted.b, 0.0);
        assert_eq!(converted.a, 1.0);
    }
}
