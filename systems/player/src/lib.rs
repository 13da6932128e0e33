#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure player-control system translating frame input into session commands.

use bastion_core::{
    Command, Difficulty, Direction, Event, Material, PointerTarget, SessionPhase,
};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Movement keys held during this frame.
    pub movement: Movement,
    /// Indicates whether the wood build toggle was pressed on this frame.
    pub toggle_wood: bool,
    /// Indicates whether the metal build toggle was pressed on this frame.
    pub toggle_metal: bool,
    /// Indicates whether the rotate key was pressed on this frame.
    pub rotate: bool,
    /// Resolved pointer target when the player clicked on this frame.
    pub click: Option<PointerTarget>,
    /// Indicates whether the start control was activated.
    pub start: bool,
    /// Indicates whether the restart control was activated.
    pub restart: bool,
    /// Difficulty picked from the selector on this frame.
    pub select_difficulty: Option<Difficulty>,
}

/// Movement keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Movement {
    /// Toward decreasing z.
    pub north: bool,
    /// Toward increasing x.
    pub east: bool,
    /// Toward increasing z.
    pub south: bool,
    /// Toward decreasing x.
    pub west: bool,
}

impl Movement {
    fn directions(self) -> impl Iterator<Item = Direction> {
        [
            (self.north, Direction::North),
            (self.east, Direction::East),
            (self.south, Direction::South),
            (self.west, Direction::West),
        ]
        .into_iter()
        .filter_map(|(held, direction)| held.then_some(direction))
    }
}

/// Player-control system that mirrors the session phase and build mode from
/// world events.
#[derive(Debug, Clone, Default)]
pub struct PlayerControl {
    phase: SessionPhase,
    build_mode: Option<Material>,
}

impl PlayerControl {
    /// Creates a new player-control system observing an idle session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            build_mode: None,
        }
    }

    /// Material the player is currently building with, if any.
    #[must_use]
    pub const fn build_mode(&self) -> Option<Material> {
        self.build_mode
    }

    /// Consumes world events and frame input to emit player commands.
    ///
    /// Session controls are always forwarded. Movement, build controls and
    /// clicks only produce commands while a session is running. A click in
    /// build mode places a wall at the ground point; otherwise it fires at the
    /// hostile under the pointer.
    pub fn handle(&mut self, events: &[Event], input: PlayerInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::PhaseChanged { phase } => self.phase = *phase,
                Event::BuildModeChanged { material } => self.build_mode = *material,
                _ => {}
            }
        }

        if let Some(difficulty) = input.select_difficulty {
            out.push(Command::SelectDifficulty { difficulty });
        }
        if input.restart {
            out.push(Command::RestartSession);
        }
        if input.start && self.phase == SessionPhase::Idle {
            out.push(Command::StartSession);
        }

        if self.phase != SessionPhase::Running {
            return;
        }

        out.extend(
            input
                .movement
                .directions()
                .map(|direction| Command::MovePlayer { direction }),
        );

        if input.toggle_wood {
            out.push(Command::ToggleBuildMode {
                material: Material::Wood,
            });
        }
        if input.toggle_metal {
            out.push(Command::ToggleBuildMode {
                material: Material::Metal,
            });
        }
        if input.rotate && self.build_mode.is_some() {
            out.push(Command::RotateBuild);
        }

        let Some(click) = input.click else {
            return;
        };
        match (self.build_mode, click.ground, click.hostile) {
            (Some(material), Some(position), _) => {
                out.push(Command::PlaceWall { position, material });
            }
            (None, _, Some(hostile)) => out.push(Command::FireAt { hostile }),
            _ => {}
        }
    }
}
