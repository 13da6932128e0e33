#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bastion adapters.

use anyhow::Result as AnyResult;
use bastion_core::{
    Difficulty, Event, HighScores, HostileId, HostileKind, HostileSnapshot, Material,
    PlacementError, Resources, Rotation, SessionPhase, WallId, WallSnapshot, WorldPoint,
    ARENA_HALF_EXTENT, BASE_MAX_HEALTH,
};
use glam::Vec2;
use std::{error::Error, fmt, time::Duration};

/// How long the base stays highlighted after a hostile reaches it.
pub const BASE_FLASH_DURATION: Duration = Duration::from_millis(200);

/// Side length of the square base footprint in world units.
pub const BASE_SIZE: f32 = 5.0;

/// Side length of hostile and player footprints in world units.
pub const UNIT_SIZE: f32 = 1.0;

/// Length and thickness of a wall in world units.
pub const WALL_EXTENTS: Vec2 = Vec2::new(3.0, 0.5);

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

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_hex(rgb: u32) -> Self {
        Self::from_rgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Scales the color channels by `ratio`, darkening toward black.
    #[must_use]
    pub fn darken(self, ratio: f32) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        Self {
            red: self.red * ratio,
            green: self.green * ratio,
            blue: self.blue * ratio,
            alpha: self.alpha,
        }
    }
}

/// Fixed colors used by every backend.
pub mod palette {
    use super::Color;
    use bastion_core::{HostileKind, Material};

    /// Arena floor.
    pub const GROUND: Color = Color::from_hex(0x22_8B_22);
    /// Base at rest.
    pub const BASE: Color = Color::from_hex(0x80_80_80);
    /// Base while flashing after a hit.
    pub const BASE_FLASH: Color = Color::from_hex(0xFF_00_00);
    /// Player avatar.
    pub const PLAYER: Color = Color::from_hex(0x00_00_FF);
    /// Sky behind the arena.
    pub const BACKGROUND: Color = Color::from_hex(0x87_CE_EB);
    /// HUD text.
    pub const TEXT: Color = Color::from_hex(0xFF_FF_FF);

    /// Undamaged color of a hostile kind.
    #[must_use]
    pub const fn hostile(kind: HostileKind) -> Color {
        match kind {
            HostileKind::Normal => Color::from_hex(0xFF_00_00),
            HostileKind::Strong => Color::from_hex(0x80_00_00),
            HostileKind::Fast => Color::from_hex(0x80_00_80),
            HostileKind::Tank => Color::from_hex(0x00_FF_00),
        }
    }

    /// Color of a wall material.
    #[must_use]
    pub const fn wall(material: Material) -> Color {
        match material {
            Material::Wood => Color::from_hex(0x8B_45_13),
            Material::Metal => Color::from_hex(0xA9_A9_A9),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the move-north key is held.
    pub move_north: bool,
    /// Whether the move-east key is held.
    pub move_east: bool,
    /// Whether the move-south key is held.
    pub move_south: bool,
    /// Whether the move-west key is held.
    pub move_west: bool,
    /// Whether the wood build toggle was pressed on this frame.
    pub toggle_wood: bool,
    /// Whether the metal build toggle was pressed on this frame.
    pub toggle_metal: bool,
    /// Whether the rotate key was pressed on this frame.
    pub rotate: bool,
    /// Whether the start control was activated on this frame.
    pub start: bool,
    /// Whether the restart control was activated on this frame.
    pub restart: bool,
    /// Difficulty picked on this frame.
    pub select_difficulty: Option<Difficulty>,
    /// Whether the primary pointer button was pressed on this frame.
    pub clicked: bool,
    /// Ground point under the cursor, when it lies inside the arena.
    pub cursor_world: Option<WorldPoint>,
}

/// Orthographic top-down camera mapping the arena onto a viewport.
///
/// World `x` grows to the right and world `z` grows down the screen, with the
/// base centred in the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopDownCamera {
    origin: Vec2,
    pixels_per_unit: f32,
}

impl TopDownCamera {
    /// Creates a camera fitting the whole arena into a `width` by `height` viewport.
    pub fn new(width: f32, height: f32) -> Result<Self, RenderingError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::InvalidViewport { width, height });
        }

        Ok(Self {
            origin: Vec2::new(width, height) / 2.0,
            pixels_per_unit: width.min(height) / (ARENA_HALF_EXTENT * 2.0),
        })
    }

    /// Screen pixels covered by one world unit.
    #[must_use]
    pub fn pixels_per_unit(&self) -> f32 {
        self.pixels_per_unit
    }

    /// Projects a ground point into screen space.
    #[must_use]
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        self.origin + point * self.pixels_per_unit
    }

    /// Unprojects a screen position, returning `None` outside the arena.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Option<WorldPoint> {
        let world = (screen - self.origin) / self.pixels_per_unit;
        if world.x.abs() > ARENA_HALF_EXTENT || world.y.abs() > ARENA_HALF_EXTENT {
            return None;
        }
        Some(WorldPoint::new(world.x, world.y))
    }
}

/// Converts a ground point into the renderer's planar vector type.
#[must_use]
pub fn to_vec2(point: WorldPoint) -> Vec2 {
    Vec2::new(point.x, point.z)
}

/// Hostile drawn within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostilePresentation {
    /// Identifier allocated by the world.
    pub id: HostileId,
    /// Centre of the footprint in world units.
    pub center: Vec2,
    /// Fill color darkened by the remaining health.
    pub color: Color,
}

impl HostilePresentation {
    /// Builds the presentation of a hostile snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &HostileSnapshot) -> Self {
        Self {
            id: snapshot.id,
            center: to_vec2(snapshot.position),
            color: hostile_color(snapshot.kind, snapshot.health_ratio()),
        }
    }
}

/// Color of a hostile of `kind` with the given remaining health fraction.
#[must_use]
pub fn hostile_color(kind: HostileKind, health_ratio: f32) -> Color {
    palette::hostile(kind).darken(health_ratio)
}

/// Wall drawn within the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallPresentation {
    /// Identifier allocated by the world.
    pub id: WallId,
    /// Centre of the wall in world units.
    pub center: Vec2,
    /// Facing captured when the wall was placed.
    pub rotation: Rotation,
    /// Fill color of the wall material.
    pub color: Color,
}

impl WallPresentation {
    /// Builds the presentation of a wall snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &WallSnapshot) -> Self {
        Self {
            id: snapshot.id,
            center: to_vec2(snapshot.position),
            rotation: snapshot.rotation,
            color: palette::wall(snapshot.material),
        }
    }

    /// Corners of the rotated wall footprint in world units.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let half = WALL_EXTENTS / 2.0;
        let facing = Vec2::from_angle(self.rotation.radians());
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|corner| self.center + facing.rotate(corner))
    }
}

/// Short-lived highlight of the base after it took damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BaseFlash {
    remaining: Duration,
}

impl BaseFlash {
    /// Restarts the highlight whenever a hostile reached the base.
    pub fn observe(&mut self, events: &[Event]) {
        if events
            .iter()
            .any(|event| matches!(event, Event::HostileReachedBase { .. }))
        {
            self.remaining = BASE_FLASH_DURATION;
        }
    }

    /// Consumes `dt` of the highlight.
    pub fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    /// Current fill color of the base.
    #[must_use]
    pub fn color(&self) -> Color {
        if self.remaining.is_zero() {
            palette::BASE
        } else {
            palette::BASE_FLASH
        }
    }
}

/// Text overlay mirroring the session state announced by world events.
#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    phase: SessionPhase,
    difficulty: Difficulty,
    base_health: f32,
    resources: Resources,
    score: u32,
    build_mode: Option<Material>,
    rotation: Rotation,
    high_scores: HighScores,
    notice: Option<String>,
}

impl Hud {
    /// Creates an overlay for an idle session seeded with stored high scores.
    #[must_use]
    pub fn new(difficulty: Difficulty, high_scores: HighScores) -> Self {
        Self {
            phase: SessionPhase::Idle,
            difficulty,
            base_health: BASE_MAX_HEALTH,
            resources: Resources::starting(),
            score: 0,
            build_mode: None,
            rotation: Rotation::Deg0,
            high_scores,
            notice: None,
        }
    }

    /// Folds world and scoreboard events into the overlay.
    pub fn observe(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::PhaseChanged { phase } => {
                    self.phase = *phase;
                    self.notice = None;
                }
                Event::DifficultySelected { difficulty } => self.difficulty = *difficulty,
                Event::DifficultyChangeRejected { .. } => {
                    self.notice = Some("Difficulty is locked while a game runs".to_owned());
                }
                Event::BaseHealthChanged { health } => self.base_health = *health,
                Event::ResourcesChanged { resources } => self.resources = *resources,
                Event::ScoreChanged { score } => self.score = *score,
                Event::BuildModeChanged { material } => self.build_mode = *material,
                Event::BuildRotationChanged { rotation } => self.rotation = *rotation,
                Event::HighScoresUpdated { scores } => self.high_scores = scores.clone(),
                Event::WallPlaced { .. } => self.notice = None,
                Event::WallPlacementRejected { material, reason } => {
                    self.notice = Some(match reason {
                        PlacementError::InsufficientResources => {
                            format!("Not enough {}", material.name())
                        }
                        PlacementError::NotRunning => "No game in progress".to_owned(),
                    });
                }
                _ => {}
            }
        }
    }

    /// Current session phase as last announced.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Lines of text to draw in the top-left corner.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self.phase {
            SessionPhase::Over => {
                lines.push("Game Over! Base Destroyed. High Scores:".to_owned());
                lines.extend(
                    self.high_scores
                        .scores()
                        .iter()
                        .enumerate()
                        .map(|(index, score)| format!("{}. {score}", index + 1)),
                );
            }
            _ => lines.push(format!("Base Health: {}", self.base_health)),
        }
        lines.push(format!("Wood: {}", self.resources.wood));
        lines.push(format!("Metal: {}", self.resources.metal));
        lines.push(self.build_line());
        lines.push(format!("Score: {}", self.score));

        match self.phase {
            SessionPhase::Idle => lines.push(format!(
                "Difficulty: {} (1/2/3 to change). Press Enter to start",
                self.difficulty.name()
            )),
            SessionPhase::Running => {}
            SessionPhase::Over => lines.push("Press Backspace to restart".to_owned()),
        }
        if let Some(notice) = &self.notice {
            lines.push(notice.clone());
        }
        lines
    }

    fn build_line(&self) -> String {
        let Some(material) = self.build_mode else {
            return "Press B to Build Wood, M to Build Metal".to_owned();
        };
        let label = match material {
            Material::Wood => "wooden",
            Material::Metal => "metal",
        };
        format!(
            "Build Mode: Click to place {label} wall (Cost: {} {}), R to rotate, Angle: {}°",
            material.wall_cost(),
            material.name(),
            self.rotation.degrees()
        )
    }
}

/// Scene description combining the arena and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Hostiles in registration order.
    pub hostiles: Vec<HostilePresentation>,
    /// Walls in placement order.
    pub walls: Vec<WallPresentation>,
    /// Centre of the player avatar in world units.
    pub player: Vec2,
    /// Fill color of the base.
    pub base_color: Color,
    /// Session phase shown by the scene.
    pub phase: SessionPhase,
    /// Overlay text lines.
    pub hud_lines: Vec<String>,
}

impl Scene {
    /// Creates an empty idle scene with the player at `player`.
    #[must_use]
    pub fn new(player: WorldPoint) -> Self {
        Self {
            hostiles: Vec::new(),
            walls: Vec::new(),
            player: to_vec2(player),
            base_color: palette::BASE,
            phase: SessionPhase::Idle,
            hud_lines: Vec::new(),
        }
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

/// Rendering backend capable of presenting Bastion scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// input captured by the adapter, and refreshes the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The viewport must have a positive area.
    InvalidViewport {
        /// Provided width in pixels.
        width: f32,
        /// Provided height in pixels.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport must have a positive area (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
