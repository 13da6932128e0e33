#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Bastion.

mod combat;
mod hostiles;
mod ledger;
mod walls;

use std::time::Duration;

use bastion_core::{
    Command, Difficulty, DifficultyProfile, Direction, Event, HostileId, Material, PlacementError,
    Rotation, SessionPhase, WorldPoint, BASE_MAX_HEALTH, KILL_SCORE, PLAYER_START,
    RANGED_DAMAGE, WELCOME_BANNER,
};
use tracing::{debug, info};

use self::{
    combat::{Advance, RangedHit},
    hostiles::HostileRegistry,
    ledger::Ledger,
    walls::WallRegistry,
};

/// Represents the authoritative Bastion session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    selected: Difficulty,
    profile: DifficultyProfile,
    phase: SessionPhase,
    base_health: f32,
    score: u32,
    ledger: Ledger,
    hostiles: HostileRegistry,
    walls: WallRegistry,
    build_mode: Option<Material>,
    rotation: Rotation,
    player: WorldPoint,
    clock: Duration,
}

impl World {
    /// Creates an idle world on the default difficulty.
    #[must_use]
    pub fn new() -> Self {
        let selected = Difficulty::default();
        Self {
            banner: WELCOME_BANNER,
            selected,
            profile: selected.profile(),
            phase: SessionPhase::Idle,
            base_health: BASE_MAX_HEALTH,
            score: 0,
            ledger: Ledger::new(),
            hostiles: HostileRegistry::new(),
            walls: WallRegistry::new(),
            build_mode: None,
            rotation: Rotation::Deg0,
            player: PLAYER_START,
            clock: Duration::ZERO,
        }
    }

    fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    fn enter_phase(&mut self, phase: SessionPhase, out_events: &mut Vec<Event>) {
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    /// Clears every per-session value and announces the fresh state.
    fn reset_session(&mut self, out_events: &mut Vec<Event>) {
        self.hostiles.clear();
        self.walls.clear();
        self.base_health = BASE_MAX_HEALTH;
        self.score = 0;
        self.ledger = Ledger::new();
        self.build_mode = None;
        self.rotation = Rotation::Deg0;
        self.player = PLAYER_START;
        self.clock = Duration::ZERO;

        out_events.push(Event::BaseHealthChanged {
            health: self.base_health,
        });
        out_events.push(Event::ResourcesChanged {
            resources: self.ledger.balance(),
        });
        out_events.push(Event::ScoreChanged { score: self.score });
        out_events.push(Event::BuildModeChanged { material: None });
        out_events.push(Event::BuildRotationChanged {
            rotation: self.rotation,
        });
        out_events.push(Event::PlayerMoved {
            position: self.player,
        });
    }

    fn start_session(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != SessionPhase::Idle {
            debug!(phase = ?self.phase, "start ignored outside the idle phase");
            return;
        }

        self.profile = self.selected.profile();
        self.reset_session(out_events);
        self.enter_phase(SessionPhase::Running, out_events);
        info!(difficulty = self.selected.name(), "session started");
        out_events.push(Event::SessionStarted {
            profile: self.profile,
        });
    }

    fn restart_session(&mut self, out_events: &mut Vec<Event>) {
        self.reset_session(out_events);
        self.enter_phase(SessionPhase::Idle, out_events);
        info!("session reset");
    }

    fn end_session(&mut self, out_events: &mut Vec<Event>) {
        info!(
            score = self.score,
            hostiles = self.hostiles.len(),
            walls = self.walls.len(),
            "base destroyed, session over"
        );
        self.hostiles.clear();
        self.walls.clear();
        self.enter_phase(SessionPhase::Over, out_events);
        out_events.push(Event::GameOver {
            final_score: self.score,
        });
    }

    fn select_difficulty(&mut self, difficulty: Difficulty, out_events: &mut Vec<Event>) {
        if self.is_running() {
            debug!(requested = difficulty.name(), "difficulty locked while running");
            out_events.push(Event::DifficultyChangeRejected {
                requested: difficulty,
            });
            return;
        }
        self.selected = difficulty;
        out_events.push(Event::DifficultySelected { difficulty });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        out_events.push(Event::TimeAdvanced { dt });
        if !self.is_running() {
            return;
        }

        self.clock = self.clock.saturating_add(dt);
        let advance = combat::advance_hostiles(
            &mut self.hostiles,
            &mut self.walls,
            &mut self.base_health,
            self.clock,
            out_events,
        );
        if advance == Advance::BaseDestroyed {
            self.end_session(out_events);
        }
    }

    fn fire_at(&mut self, hostile: HostileId, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }

        match combat::ranged_hit(&mut self.hostiles, hostile, RANGED_DAMAGE) {
            None => {}
            Some(RangedHit::Wounded {
                health,
                health_ratio,
            }) => {
                out_events.push(Event::HostileDamaged {
                    hostile,
                    health,
                    health_ratio,
                });
            }
            Some(RangedHit::Killed(dead)) => {
                self.ledger.credit(dead.drops);
                self.score = self.score.saturating_add(KILL_SCORE);
                debug!(
                    hostile = hostile.get(),
                    kind = dead.kind.name(),
                    score = self.score,
                    "hostile killed"
                );
                out_events.push(Event::HostileKilled {
                    hostile,
                    kind: dead.kind,
                    drops: dead.drops,
                });
                out_events.push(Event::ResourcesChanged {
                    resources: self.ledger.balance(),
                });
                out_events.push(Event::ScoreChanged { score: self.score });
            }
        }
    }

    fn place_wall(
        &mut self,
        position: WorldPoint,
        material: Material,
        out_events: &mut Vec<Event>,
    ) {
        let rejection = if !self.is_running() {
            Some(PlacementError::NotRunning)
        } else if !self.ledger.try_spend(material) {
            Some(PlacementError::InsufficientResources)
        } else {
            None
        };

        if let Some(reason) = rejection {
            debug!(material = material.name(), ?reason, "wall placement refused");
            out_events.push(Event::WallPlacementRejected { material, reason });
            return;
        }

        let health = self.profile.wall_health() * material.durability_multiplier();
        let wall = self.walls.place(material, position, self.rotation, health);
        debug!(
            wall = wall.get(),
            material = material.name(),
            health,
            rotation = self.rotation.degrees(),
            "wall placed"
        );
        out_events.push(Event::WallPlaced {
            wall,
            material,
            position,
            rotation: self.rotation,
            health,
        });
        out_events.push(Event::ResourcesChanged {
            resources: self.ledger.balance(),
        });
    }

    fn move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        if !self.is_running() {
            return;
        }

        let step = self.profile.player_speed();
        let (dx, dz) = match direction {
            Direction::North => (0.0, -step),
            Direction::East => (step, 0.0),
            Direction::South => (0.0, step),
            Direction::West => (-step, 0.0),
        };
        self.player =
            WorldPoint::new(self.player.x + dx, self.player.z + dz).clamp_to_arena();
        out_events.push(Event::PlayerMoved {
            position: self.player,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SelectDifficulty { difficulty } => {
            world.select_difficulty(difficulty, out_events);
        }
        Command::StartSession => world.start_session(out_events),
        Command::RestartSession => world.restart_session(out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SpawnHostile { kind, position } => {
            if !world.is_running() {
                debug!(kind = kind.name(), "spawn ignored while not running");
                return;
            }
            let hostile = world.hostiles.spawn(kind, position, &world.profile);
            debug!(
                hostile = hostile.id.get(),
                kind = kind.name(),
                x = position.x,
                z = position.z,
                health = hostile.health,
                damage = hostile.damage,
                "hostile spawned"
            );
            out_events.push(Event::HostileSpawned {
                hostile: hostile.id,
                kind,
                position,
            });
        }
        Command::FireAt { hostile } => world.fire_at(hostile, out_events),
        Command::ToggleBuildMode { material } => {
            world.build_mode = if world.build_mode == Some(material) {
                None
            } else {
                Some(material)
            };
            out_events.push(Event::BuildModeChanged {
                material: world.build_mode,
            });
        }
        Command::RotateBuild => {
            if world.build_mode.is_some() {
                world.rotation = world.rotation.next();
                out_events.push(Event::BuildRotationChanged {
                    rotation: world.rotation,
                });
            }
        }
        Command::PlaceWall { position, material } => {
            world.place_wall(position, material, out_events);
        }
        Command::MovePlayer { direction } => world.move_player(direction, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use bastion_core::{
        Difficulty, DifficultyProfile, HostileView, Material, Resources, Rotation,
        SessionPhase, WallView, WorldPoint,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Current session phase.
    #[must_use]
    pub fn phase(world: &World) -> SessionPhase {
        world.phase
    }

    /// Difficulty the next session will use.
    #[must_use]
    pub fn selected_difficulty(world: &World) -> Difficulty {
        world.selected
    }

    /// Profile captured by the current (or most recent) session.
    #[must_use]
    pub fn profile(world: &World) -> DifficultyProfile {
        world.profile
    }

    /// Current base integrity.
    #[must_use]
    pub fn base_health(world: &World) -> f32 {
        world.base_health
    }

    /// Score accumulated in the current session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Current ledger balance.
    #[must_use]
    pub fn resources(world: &World) -> Resources {
        world.ledger.balance()
    }

    /// Material being placed, if build mode is active.
    #[must_use]
    pub fn build_mode(world: &World) -> Option<Material> {
        world.build_mode
    }

    /// Facing applied to the next placed wall.
    #[must_use]
    pub fn rotation(world: &World) -> Rotation {
        world.rotation
    }

    /// Ground position of the player avatar.
    #[must_use]
    pub fn player_position(world: &World) -> WorldPoint {
        world.player
    }

    /// Captures a read-only view of the hostiles in registration order.
    #[must_use]
    pub fn hostile_view(world: &World) -> HostileView {
        HostileView::from_snapshots(
            world
                .hostiles
                .iter()
                .map(|hostile| hostile.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the walls in placement order.
    #[must_use]
    pub fn wall_view(world: &World) -> WallView {
        WallView::from_snapshots(world.walls.iter().map(|wall| wall.snapshot()).collect())
    }
}
