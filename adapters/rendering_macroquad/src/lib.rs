#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Bastion.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment, so
//! the dependency is declared without its default `audio` feature.
//!
//! The arena is drawn top-down with flat shapes; all per-frame keyboard and
//! mouse polling is funnelled through [`InputObservations`] so the mapping to
//! [`FrameInput`] stays testable without a window.

use anyhow::Result;
use bastion_core::{Difficulty, ARENA_HALF_EXTENT};
use bastion_rendering::{
    palette, FrameInput, Presentation, RenderingBackend, Scene, TopDownCamera, BASE_SIZE,
    UNIT_SIZE,
};
use glam::Vec2;
use macroquad::{
    input::{
        is_key_down, is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton,
    },
    math::Vec2 as MacroquadVec2,
};
use std::time::Duration;
use tracing::info;

const HUD_FONT_SIZE: f32 = 24.0;
const HUD_LINE_HEIGHT: f32 = 30.0;
const HUD_MARGIN: f32 = 10.0;

/// Raw per-frame observations of the keyboard and mouse.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputObservations {
    /// `W` held.
    pub w_down: bool,
    /// `A` held.
    pub a_down: bool,
    /// `S` held.
    pub s_down: bool,
    /// `D` held.
    pub d_down: bool,
    /// `B` pressed this frame.
    pub b_pressed: bool,
    /// `M` pressed this frame.
    pub m_pressed: bool,
    /// `R` pressed this frame.
    pub r_pressed: bool,
    /// `Enter` pressed this frame.
    pub enter_pressed: bool,
    /// `Backspace` pressed this frame.
    pub backspace_pressed: bool,
    /// Digit key `1`..=`3` pressed this frame, if any.
    pub digit_pressed: Option<u8>,
    /// Left mouse button pressed this frame.
    pub left_click: bool,
    /// Cursor position in screen pixels.
    pub cursor: Vec2,
}

impl InputObservations {
    fn poll() -> Self {
        let digit_pressed = [(KeyCode::Key1, 1), (KeyCode::Key2, 2), (KeyCode::Key3, 3)]
            .into_iter()
            .find(|(key, _)| is_key_pressed(*key))
            .map(|(_, digit)| digit);
        let (cursor_x, cursor_y) = mouse_position();

        Self {
            w_down: is_key_down(KeyCode::W),
            a_down: is_key_down(KeyCode::A),
            s_down: is_key_down(KeyCode::S),
            d_down: is_key_down(KeyCode::D),
            b_pressed: is_key_pressed(KeyCode::B),
            m_pressed: is_key_pressed(KeyCode::M),
            r_pressed: is_key_pressed(KeyCode::R),
            enter_pressed: is_key_pressed(KeyCode::Enter),
            backspace_pressed: is_key_pressed(KeyCode::Backspace),
            digit_pressed,
            left_click: is_mouse_button_pressed(MouseButton::Left),
            cursor: Vec2::new(cursor_x, cursor_y),
        }
    }

    /// Maps the observations onto adapter-neutral frame input.
    ///
    /// The cursor is unprojected through `camera`; without a camera or outside
    /// the arena the frame carries no ground point.
    #[must_use]
    pub fn into_frame_input(self, camera: Option<&TopDownCamera>) -> FrameInput {
        FrameInput {
            move_north: self.w_down,
            move_east: self.d_down,
            move_south: self.s_down,
            move_west: self.a_down,
            toggle_wood: self.b_pressed,
            toggle_metal: self.m_pressed,
            rotate: self.r_pressed,
            start: self.enter_pressed,
            restart: self.backspace_pressed,
            select_difficulty: self.digit_pressed.and_then(difficulty_for_digit),
            clicked: self.left_click,
            cursor_world: camera.and_then(|camera| camera.screen_to_world(self.cursor)),
        }
    }
}

/// Difficulty bound to a number key.
#[must_use]
pub fn difficulty_for_digit(digit: u8) -> Option<Difficulty> {
    Difficulty::ALL.get(usize::from(digit.checked_sub(1)?)).copied()
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
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

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Counts rendered frames and reports the rate once per second.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(per_second)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 900,
            window_height: 900,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                if is_key_pressed(KeyCode::Escape) {
                    break;
                }

                macroquad::window::clear_background(background);

                let camera = TopDownCamera::new(
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                )
                .ok();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = InputObservations::poll().into_frame_input(camera.as_ref());

                update_scene(frame_dt, frame_input, &mut scene);

                if let Some(camera) = &camera {
                    draw_scene(&scene, camera);
                }
                draw_hud(&scene);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn draw_scene(scene: &Scene, camera: &TopDownCamera) {
    draw_square(camera, Vec2::ZERO, ARENA_HALF_EXTENT * 2.0, palette::GROUND);
    draw_square(camera, Vec2::ZERO, BASE_SIZE, scene.base_color);

    for wall in &scene.walls {
        let [a, b, c, d] = wall
            .corners()
            .map(|corner| to_macroquad_vec(camera.world_to_screen(corner)));
        let color = to_macroquad_color(wall.color);
        macroquad::shapes::draw_triangle(a, b, c, color);
        macroquad::shapes::draw_triangle(a, c, d, color);
    }

    for hostile in &scene.hostiles {
        draw_square(camera, hostile.center, UNIT_SIZE, hostile.color);
    }

    draw_square(camera, scene.player, UNIT_SIZE, palette::PLAYER);
}

fn draw_square(camera: &TopDownCamera, center: Vec2, size: f32, color: bastion_rendering::Color) {
    let top_left = camera.world_to_screen(center - Vec2::splat(size / 2.0));
    let side = size * camera.pixels_per_unit();
    macroquad::shapes::draw_rectangle(
        top_left.x,
        top_left.y,
        side,
        side,
        to_macroquad_color(color),
    );
}

fn draw_hud(scene: &Scene) {
    let color = to_macroquad_color(palette::TEXT);
    for (index, line) in scene.hud_lines.iter().enumerate() {
        let baseline = HUD_MARGIN + HUD_FONT_SIZE + index as f32 * HUD_LINE_HEIGHT;
        macroquad::text::draw_text(line, HUD_MARGIN, baseline, HUD_FONT_SIZE, color);
    }
}

fn to_macroquad_vec(vector: Vec2) -> MacroquadVec2 {
    MacroquadVec2::new(vector.x, vector.y)
}

fn to_macroquad_color(color: bastion_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
