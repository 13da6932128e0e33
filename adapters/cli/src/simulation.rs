//! Frame driver wiring the world to its systems.

use std::time::Duration;

use bastion_core::{Command, Difficulty, Event, HighScores};
use bastion_rendering::{
    to_vec2, BaseFlash, FrameInput, HostilePresentation, Hud, Scene, WallPresentation,
};
use bastion_system_player::{Movement, PlayerControl, PlayerInput};
use bastion_system_scoreboard::{ScoreStore, Scoreboard};
use bastion_system_spawning::{Config as SpawningConfig, Spawning};
use bastion_system_targeting::Targeting;
use bastion_world::{self as world, query, World};

/// Owns the world, every system and the score store.
///
/// Each frame applies player commands, then advances time, then lets the
/// spawner and the scoreboard react to everything the frame produced.
pub(crate) struct Simulation {
    world: World,
    spawning: Spawning,
    targeting: Targeting,
    player: PlayerControl,
    scoreboard: Scoreboard,
    store: Box<dyn ScoreStore>,
    hud: Hud,
    flash: BaseFlash,
    events: Vec<Event>,
    scratch_events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    pub(crate) fn new(difficulty: Difficulty, seed: u64, store: Box<dyn ScoreStore>) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SelectDifficulty { difficulty },
            &mut events,
        );
        let scoreboard = Scoreboard::load(store.as_ref());
        let mut hud = Hud::new(difficulty, scoreboard.scores().clone());
        hud.observe(&events);

        Self {
            world,
            spawning: Spawning::new(SpawningConfig::default().with_seed(seed)),
            targeting: Targeting::new(),
            player: PlayerControl::new(),
            scoreboard,
            store,
            hud,
            flash: BaseFlash::default(),
            events,
            scratch_events: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn high_scores(&self) -> &HighScores {
        self.scoreboard.scores()
    }

    /// Advances one frame from raw adapter input.
    pub(crate) fn frame(&mut self, dt: Duration, input: FrameInput) {
        let click = input.clicked.then(|| {
            self.targeting
                .resolve(input.cursor_world, &query::hostile_view(&self.world))
        });
        let input = PlayerInput {
            movement: Movement {
                north: input.move_north,
                east: input.move_east,
                south: input.move_south,
                west: input.move_west,
            },
            toggle_wood: input.toggle_wood,
            toggle_metal: input.toggle_metal,
            rotate: input.rotate,
            click,
            start: input.start,
            restart: input.restart,
            select_difficulty: input.select_difficulty,
        };
        self.step(dt, input);
    }

    /// Advances one frame from already distilled player input.
    pub(crate) fn step(&mut self, dt: Duration, input: PlayerInput) {
        self.commands.clear();
        self.player.handle(&self.events, input, &mut self.commands);

        let mut frame_events = std::mem::take(&mut self.scratch_events);
        frame_events.clear();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut frame_events);
        }
        world::apply(&mut self.world, Command::Tick { dt }, &mut frame_events);

        self.spawning.handle(&frame_events, &mut self.commands);
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut frame_events);
        }

        let mut score_events = Vec::new();
        self.scoreboard
            .handle(&frame_events, self.store.as_mut(), &mut score_events);
        frame_events.extend(score_events);

        self.hud.observe(&frame_events);
        self.flash.observe(&frame_events);
        self.flash.advance(dt);

        self.scratch_events = std::mem::replace(&mut self.events, frame_events);
    }

    /// Events produced by the most recent frame.
    #[cfg(test)]
    pub(crate) fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Rebuilds `scene` from the current world state.
    pub(crate) fn populate_scene(&self, scene: &mut Scene) {
        scene.hostiles.clear();
        scene.hostiles.extend(
            query::hostile_view(&self.world)
                .iter()
                .map(HostilePresentation::from_snapshot),
        );
        scene.walls.clear();
        scene.walls.extend(
            query::wall_view(&self.world)
                .iter()
                .map(WallPresentation::from_snapshot),
        );
        scene.player = to_vec2(query::player_position(&self.world));
        scene.base_color = self.flash.color();
        scene.phase = query::phase(&self.world);
        scene.hud_lines = self.hud.lines();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::{
        HostileId, HostileKind, Material, PointerTarget, Resources, SessionPhase, WorldPoint,
    };
    use bastion_system_scoreboard::MemoryStore;

    const FRAME: Duration = Duration::from_millis(16);

    struct SharedStore(std::rc::Rc<std::cell::RefCell<MemoryStore>>);

    impl ScoreStore for SharedStore {
        fn load(&self) -> Result<HighScores, bastion_system_scoreboard::StoreError> {
            self.0.borrow().load()
        }

        fn save(
            &mut self,
            scores: &HighScores,
        ) -> Result<(), bastion_system_scoreboard::StoreError> {
            self.0.borrow_mut().save(scores)
        }
    }

    fn simulation(difficulty: Difficulty) -> Simulation {
        Simulation::new(difficulty, 42, Box::new(MemoryStore::new()))
    }

    fn start(simulation: &mut Simulation) {
        simulation.step(
            FRAME,
            PlayerInput {
                start: true,
                ..PlayerInput::default()
            },
        );
    }

    fn idle(simulation: &mut Simulation, frames: usize) {
        for _ in 0..frames {
            simulation.step(FRAME, PlayerInput::default());
        }
    }

    fn spawn(simulation: &mut Simulation, kind: HostileKind, position: WorldPoint) -> HostileId {
        let mut events = Vec::new();
        world::apply(
            &mut simulation.world,
            Command::SpawnHostile { kind, position },
            &mut events,
        );
        match events.as_slice() {
            [Event::HostileSpawned { hostile, .. }] => *hostile,
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    fn shoot(simulation: &mut Simulation, hostile: HostileId) {
        simulation.step(
            FRAME,
            PlayerInput {
                click: Some(PointerTarget {
                    ground: None,
                    hostile: Some(hostile),
                }),
                ..PlayerInput::default()
            },
        );
    }

    #[test]
    fn medium_start_spawns_three_hostiles_with_default_state() {
        let mut simulation = simulation(Difficulty::Medium);
        start(&mut simulation);

        let world = simulation.world();
        assert_eq!(query::phase(world), SessionPhase::Running);
        assert_eq!(query::base_health(world), 100.0);
        assert_eq!(query::resources(world), Resources::new(50, 20));
        assert_eq!(query::score(world), 0);
        assert_eq!(query::hostile_view(world).len(), 3);
    }

    fn spawned_while_idle(simulation: &mut Simulation, frames: usize) -> usize {
        let mut spawned = 0;
        for _ in 0..frames {
            simulation.step(FRAME, PlayerInput::default());
            spawned += simulation
                .last_events()
                .iter()
                .filter(|event| matches!(event, Event::HostileSpawned { .. }))
                .count();
        }
        spawned
    }

    #[test]
    fn a_batch_arrives_every_spawn_interval() {
        let mut simulation = simulation(Difficulty::Hard);
        start(&mut simulation);
        // The start frame already advanced 16 ms of the 7 s interval.
        assert_eq!(spawned_while_idle(&mut simulation, 436), 0);
        assert_eq!(spawned_while_idle(&mut simulation, 1), 3);
        assert_eq!(spawned_while_idle(&mut simulation, 437), 3);
    }

    #[test]
    fn restart_cancels_the_running_timer() {
        let mut simulation = simulation(Difficulty::Hard);
        start(&mut simulation);
        simulation.step(
            FRAME,
            PlayerInput {
                restart: true,
                ..PlayerInput::default()
            },
        );
        idle(&mut simulation, 500);
        assert!(query::hostile_view(simulation.world()).is_empty());

        start(&mut simulation);
        idle(&mut simulation, 100);
        assert_eq!(query::hostile_view(simulation.world()).len(), 3);
    }

    #[test]
    fn clicking_on_a_hostile_footprint_shoots_it() {
        let mut simulation = simulation(Difficulty::Medium);
        start(&mut simulation);
        let target = spawn(&mut simulation, HostileKind::Fast, WorldPoint::new(-12.0, 12.0));

        simulation.frame(
            FRAME,
            FrameInput {
                clicked: true,
                cursor_world: Some(WorldPoint::new(-11.7, 12.2)),
                ..FrameInput::default()
            },
        );

        assert!(simulation.last_events().contains(&Event::HostileKilled {
            hostile: target,
            kind: HostileKind::Fast,
            drops: Resources::new(5, 1),
        }));
        assert_eq!(query::score(simulation.world()), 10);
    }

    #[test]
    fn killing_a_normal_hostile_takes_two_hits_and_pays_once() {
        let mut simulation = simulation(Difficulty::Medium);
        start(&mut simulation);
        let target = spawn(&mut simulation, HostileKind::Normal, WorldPoint::new(0.0, -20.0));

        shoot(&mut simulation, target);
        assert_eq!(query::score(simulation.world()), 0);
        shoot(&mut simulation, target);
        shoot(&mut simulation, target);

        assert_eq!(
            query::resources(simulation.world()),
            Resources::new(57, 22)
        );
        assert_eq!(query::score(simulation.world()), 10);
    }

    #[test]
    fn build_mode_click_places_a_wall_with_rotation() {
        let mut simulation = simulation(Difficulty::Easy);
        start(&mut simulation);
        simulation.step(
            FRAME,
            PlayerInput {
                toggle_metal: true,
                ..PlayerInput::default()
            },
        );
        simulation.step(
            FRAME,
            PlayerInput {
                rotate: true,
                ..PlayerInput::default()
            },
        );
        simulation.frame(
            FRAME,
            FrameInput {
                clicked: true,
                cursor_world: Some(WorldPoint::new(6.0, 6.0)),
                ..FrameInput::default()
            },
        );

        let walls = query::wall_view(simulation.world()).into_vec();
        assert_eq!(walls.len(), 1);
        assert_eq!(walls[0].material, Material::Metal);
        assert_eq!(walls[0].health, 80.0);
        assert_eq!(walls[0].rotation.degrees(), 90);
        assert_eq!(query::resources(simulation.world()).metal, 17);
    }

    #[test]
    fn losing_records_the_score_and_offers_restart() {
        let shared = std::rc::Rc::new(std::cell::RefCell::new(MemoryStore::new()));
        let mut simulation =
            Simulation::new(Difficulty::Medium, 3, Box::new(SharedStore(shared.clone())));
        start(&mut simulation);
        let fast = spawn(&mut simulation, HostileKind::Fast, WorldPoint::new(20.0, 20.0));
        shoot(&mut simulation, fast);
        for _ in 0..4 {
            let _ = spawn(&mut simulation, HostileKind::Tank, WorldPoint::new(0.2, 0.0));
        }
        idle(&mut simulation, 1);

        let world = simulation.world();
        assert_eq!(query::phase(world), SessionPhase::Over);
        assert!(query::hostile_view(world).is_empty());
        assert!(query::wall_view(world).is_empty());
        assert_eq!(simulation.high_scores().scores(), &[10]);
        assert_eq!(shared.borrow().stored().scores(), &[10]);

        let mut scene = Scene::new(WorldPoint::default());
        simulation.populate_scene(&mut scene);
        assert_eq!(scene.phase, SessionPhase::Over);
        assert_eq!(scene.hud_lines[1], "1. 10");

        idle(&mut simulation, 700);
        assert!(
            query::hostile_view(simulation.world()).is_empty(),
            "the spawn timer stops with the session"
        );
    }

    #[test]
    fn scene_mirrors_world_and_flashes_the_base() {
        let mut simulation = simulation(Difficulty::Medium);
        start(&mut simulation);
        let _ = spawn(&mut simulation, HostileKind::Normal, WorldPoint::new(0.1, 0.0));
        idle(&mut simulation, 1);

        let mut scene = Scene::new(WorldPoint::default());
        simulation.populate_scene(&mut scene);
        assert_eq!(scene.hostiles.len(), 3);
        assert_eq!(scene.base_color, bastion_rendering::palette::BASE_FLASH);
        assert_eq!(scene.hud_lines[0], "Base Health: 90");

        idle(&mut simulation, 13);
        simulation.populate_scene(&mut scene);
        assert_eq!(scene.base_color, bastion_rendering::palette::BASE);
    }
}
