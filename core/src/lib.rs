#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bastion engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume event streams, query
//! immutable views, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Bastion. Hold the base.";

/// Half of the square arena's side length measured in world units.
pub const ARENA_HALF_EXTENT: f32 = 25.0;

/// Centre of the base that hostiles converge on.
pub const BASE_POSITION: WorldPoint = WorldPoint::new(0.0, 0.0);

/// Base integrity at the start of every session.
pub const BASE_MAX_HEALTH: f32 = 100.0;

/// Damage applied by a single ranged hit.
pub const RANGED_DAMAGE: f32 = 10.0;

/// Score awarded for every hostile killed by the player.
pub const KILL_SCORE: u32 = 10;

/// Distance below which a wall blocks a hostile and can be attacked.
pub const MELEE_RANGE: f32 = 2.0;

/// Distance at which a hostile is considered to have reached the base.
pub const BASE_REACH: f32 = 0.5;

/// Minimum simulated time between two wall attacks of the same hostile.
pub const WALL_ATTACK_COOLDOWN: Duration = Duration::from_millis(1_000);

/// Number of hostiles spawned when a session starts and on every timer firing.
pub const SPAWN_BATCH_SIZE: usize = 3;

/// Player starting position at the beginning of every session.
pub const PLAYER_START: WorldPoint = WorldPoint::new(0.0, 5.0);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Selects the difficulty used by the next session.
    SelectDifficulty {
        /// Difficulty requested by the player.
        difficulty: Difficulty,
    },
    /// Starts a new session using the selected difficulty.
    StartSession,
    /// Abandons the current session, if any, and returns to the idle phase.
    RestartSession,
    /// Advances the simulation by one frame.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that a hostile of the given kind enters the arena.
    SpawnHostile {
        /// Kind of hostile to create.
        kind: HostileKind,
        /// Ground position the hostile appears at.
        position: WorldPoint,
    },
    /// Fires a single ranged shot at the provided hostile.
    FireAt {
        /// Hostile targeted by the shot.
        hostile: HostileId,
    },
    /// Toggles build mode for the provided material.
    ToggleBuildMode {
        /// Material the player wants to build with.
        material: Material,
    },
    /// Rotates the facing applied to subsequently placed walls by 90 degrees.
    RotateBuild,
    /// Requests construction of a wall at the provided ground position.
    PlaceWall {
        /// Ground position at the centre of the wall.
        position: WorldPoint,
        /// Material the wall is built from.
        material: Material,
    },
    /// Moves the player avatar one step in the provided direction.
    MovePlayer {
        /// Direction of travel.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the difficulty for the next session changed.
    DifficultySelected {
        /// Difficulty that is now selected.
        difficulty: Difficulty,
    },
    /// Reports that a difficulty change was refused because a session is running.
    DifficultyChangeRejected {
        /// Difficulty that was requested.
        requested: Difficulty,
    },
    /// Announces that the session entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: SessionPhase,
    },
    /// Announces that a session started with the captured profile.
    SessionStarted {
        /// Profile that stays in force until the session ends.
        profile: DifficultyProfile,
    },
    /// Announces that the base was destroyed and the session is over.
    GameOver {
        /// Score accumulated during the finished session.
        final_score: u32,
    },
    /// Confirms that a hostile entered the arena.
    HostileSpawned {
        /// Identifier assigned to the hostile.
        hostile: HostileId,
        /// Kind of the hostile.
        kind: HostileKind,
        /// Ground position the hostile appeared at.
        position: WorldPoint,
    },
    /// Reports that a ranged hit wounded a hostile without killing it.
    HostileDamaged {
        /// Identifier of the wounded hostile.
        hostile: HostileId,
        /// Health remaining after the hit.
        health: f32,
        /// Remaining health as a fraction of maximum health.
        health_ratio: f32,
    },
    /// Reports that a hostile was killed by the player.
    HostileKilled {
        /// Identifier of the killed hostile.
        hostile: HostileId,
        /// Kind of the killed hostile.
        kind: HostileKind,
        /// Resources credited for the kill.
        drops: Resources,
    },
    /// Reports that a hostile reached the base and was consumed.
    HostileReachedBase {
        /// Identifier of the hostile that reached the base.
        hostile: HostileId,
        /// Damage dealt to the base.
        damage: f32,
    },
    /// Reports the base integrity after it changed.
    BaseHealthChanged {
        /// Current base health.
        health: f32,
    },
    /// Reports the ledger balance after it changed.
    ResourcesChanged {
        /// Current ledger balance.
        resources: Resources,
    },
    /// Reports the score after it changed.
    ScoreChanged {
        /// Current score.
        score: u32,
    },
    /// Confirms that a wall was constructed.
    WallPlaced {
        /// Identifier assigned to the wall.
        wall: WallId,
        /// Material of the wall.
        material: Material,
        /// Ground position of the wall's centre.
        position: WorldPoint,
        /// Facing captured at placement time.
        rotation: Rotation,
        /// Starting durability of the wall.
        health: f32,
    },
    /// Reports that a hostile damaged a wall that is still standing.
    WallDamaged {
        /// Identifier of the wall.
        wall: WallId,
        /// Durability left after the attack.
        health: f32,
    },
    /// Reports that a wall was destroyed by hostile attacks.
    WallDestroyed {
        /// Identifier of the destroyed wall.
        wall: WallId,
    },
    /// Reports that a wall placement request was refused.
    WallPlacementRejected {
        /// Material requested for the wall.
        material: Material,
        /// Reason the placement failed.
        reason: PlacementError,
    },
    /// Announces the active build mode after it changed.
    BuildModeChanged {
        /// Material being placed, or `None` when build mode is off.
        material: Option<Material>,
    },
    /// Announces the facing applied to future walls after it changed.
    BuildRotationChanged {
        /// Facing applied to the next placed wall.
        rotation: Rotation,
    },
    /// Reports the player avatar's position after a move.
    PlayerMoved {
        /// Current ground position of the player.
        position: WorldPoint,
    },
    /// Publishes the persisted high-score table after it changed.
    HighScoresUpdated {
        /// Scores sorted in descending order.
        scores: HighScores,
    },
}

/// Overall phase of the play session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No session is running; the start control is offered.
    #[default]
    Idle,
    /// A session is in progress.
    Running,
    /// The base was destroyed; the restart control is offered.
    Over,
}

/// Named difficulty levels selectable before a session starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Slow spawns, weak hostiles, sturdy walls.
    Easy,
    /// Balanced settings.
    #[default]
    Medium,
    /// Fast spawns, strong hostiles, fragile walls.
    Hard,
}

impl Difficulty {
    /// Every difficulty in ascending order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Lower-case name of the difficulty.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Returns the static profile associated with the difficulty.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                difficulty: self,
                spawn_interval: Duration::from_millis(15_000),
                hostile_damage: 5.0,
                wall_health: 40.0,
                player_speed: 0.15,
            },
            Self::Medium => DifficultyProfile {
                difficulty: self,
                spawn_interval: Duration::from_millis(10_000),
                hostile_damage: 10.0,
                wall_health: 30.0,
                player_speed: 0.1,
            },
            Self::Hard => DifficultyProfile {
                difficulty: self,
                spawn_interval: Duration::from_millis(7_000),
                hostile_damage: 15.0,
                wall_health: 20.0,
                player_speed: 0.05,
            },
        }
    }

    /// Parses a difficulty from its lower-case name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name().eq_ignore_ascii_case(name))
    }
}

/// Immutable tuning selected once before a session starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyProfile {
    difficulty: Difficulty,
    spawn_interval: Duration,
    hostile_damage: f32,
    wall_health: f32,
    player_speed: f32,
}

impl DifficultyProfile {
    /// Difficulty the profile was derived from.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Cadence at which hostile batches spawn.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Damage dealt to the base by a hostile with a multiplier of one.
    #[must_use]
    pub const fn hostile_damage(&self) -> f32 {
        self.hostile_damage
    }

    /// Durability of a wood wall; metal walls receive twice this value.
    #[must_use]
    pub const fn wall_health(&self) -> f32 {
        self.wall_health
    }

    /// Distance the player travels per frame for each held movement key.
    #[must_use]
    pub const fn player_speed(&self) -> f32 {
        self.player_speed
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::default().profile()
    }
}

/// Kinds of hostiles that assault the base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostileKind {
    /// Baseline hostile.
    Normal,
    /// Slower, sturdier hostile hitting twice as hard.
    Strong,
    /// Quick, fragile hostile hitting half as hard.
    Fast,
    /// Very slow, very durable hostile that also wrecks walls faster.
    Tank,
}

impl HostileKind {
    /// Spawn weights used by the weighted draw; the weights sum to one.
    pub const SPAWN_TABLE: [(HostileKind, f32); 4] = [
        (Self::Normal, 0.4),
        (Self::Strong, 0.2),
        (Self::Fast, 0.3),
        (Self::Tank, 0.1),
    ];

    /// Returns the fixed stat block for the kind.
    #[must_use]
    pub const fn stats(self) -> HostileStats {
        match self {
            Self::Normal => HostileStats {
                speed: 0.03,
                health: 20.0,
                damage_multiplier: 1.0,
                wall_damage: 10.0,
                drops: Resources::new(7, 2),
            },
            Self::Strong => HostileStats {
                speed: 0.02,
                health: 40.0,
                damage_multiplier: 2.0,
                wall_damage: 10.0,
                drops: Resources::new(10, 5),
            },
            Self::Fast => HostileStats {
                speed: 0.08,
                health: 10.0,
                damage_multiplier: 0.5,
                wall_damage: 10.0,
                drops: Resources::new(5, 1),
            },
            Self::Tank => HostileStats {
                speed: 0.01,
                health: 100.0,
                damage_multiplier: 3.0,
                wall_damage: 20.0,
                drops: Resources::new(20, 10),
            },
        }
    }

    /// Lower-case name of the kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Strong => "strong",
            Self::Fast => "fast",
            Self::Tank => "tank",
        }
    }
}

/// Per-kind stat block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostileStats {
    /// Distance travelled toward the base per tick.
    pub speed: f32,
    /// Starting and maximum health.
    pub health: f32,
    /// Multiplier applied to the profile's base damage.
    pub damage_multiplier: f32,
    /// Damage dealt to a wall per attack.
    pub wall_damage: f32,
    /// Resources credited when the hostile is killed.
    pub drops: Resources,
}

/// Construction materials tracked by the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    /// Primary material: cheap walls.
    Wood,
    /// Secondary material: walls with doubled durability.
    Metal,
}

impl Material {
    /// Amount of the material consumed by a single wall.
    #[must_use]
    pub const fn wall_cost(self) -> u32 {
        match self {
            Self::Wood => 5,
            Self::Metal => 3,
        }
    }

    /// Multiplier applied to the profile's wall health.
    #[must_use]
    pub const fn durability_multiplier(self) -> f32 {
        match self {
            Self::Wood => 1.0,
            Self::Metal => 2.0,
        }
    }

    /// Upper bound of the ledger counter for this material.
    #[must_use]
    pub const fn cap(self) -> u32 {
        match self {
            Self::Wood => 100,
            Self::Metal => 50,
        }
    }

    /// Lower-case name of the material.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "wood",
            Self::Metal => "metal",
        }
    }
}

/// Amounts of both materials, used for balances and rewards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Resources {
    /// Primary material amount.
    pub wood: u32,
    /// Secondary material amount.
    pub metal: u32,
}

impl Resources {
    /// Creates a new resource pair.
    #[must_use]
    pub const fn new(wood: u32, metal: u32) -> Self {
        Self { wood, metal }
    }

    /// Balance every session starts with.
    #[must_use]
    pub const fn starting() -> Self {
        Self::new(50, 20)
    }

    /// Returns the amount held for the provided material.
    #[must_use]
    pub const fn get(&self, material: Material) -> u32 {
        match material {
            Material::Wood => self.wood,
            Material::Metal => self.metal,
        }
    }
}

/// Facing applied to a wall, cycling in 90 degree steps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// No rotation.
    #[default]
    Deg0,
    /// Quarter turn.
    Deg90,
    /// Half turn.
    Deg180,
    /// Three quarter turn.
    Deg270,
}

impl Rotation {
    /// Returns the facing after another quarter turn.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Deg0 => Self::Deg90,
            Self::Deg90 => Self::Deg180,
            Self::Deg180 => Self::Deg270,
            Self::Deg270 => Self::Deg0,
        }
    }

    /// Rotation expressed in whole degrees.
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Rotation expressed in radians.
    #[must_use]
    pub fn radians(self) -> f32 {
        f32::from(self.degrees()).to_radians()
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing z.
    North,
    /// Movement toward increasing x.
    East,
    /// Movement toward increasing z.
    South,
    /// Movement toward decreasing x.
    West,
}

/// Point on the ground plane expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Depth coordinate.
    pub z: f32,
}

impl WorldPoint {
    /// Creates a new ground point.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Euclidean distance between two ground points.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.z - other.z)
    }

    /// Moves `step` units toward `target` along the straight line between the points.
    #[must_use]
    pub fn step_towards(self, target: WorldPoint, step: f32) -> WorldPoint {
        let distance = self.distance(target);
        if distance <= f32::EPSILON {
            return self;
        }
        let scale = step / distance;
        WorldPoint::new(
            self.x + (target.x - self.x) * scale,
            self.z + (target.z - self.z) * scale,
        )
    }

    /// Clamps both coordinates into the arena.
    #[must_use]
    pub fn clamp_to_arena(self) -> WorldPoint {
        WorldPoint::new(
            self.x.clamp(-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT),
            self.z.clamp(-ARENA_HALF_EXTENT, ARENA_HALF_EXTENT),
        )
    }
}

/// Unique identifier assigned to a hostile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostileId(u32);

impl HostileId {
    /// Creates a new hostile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WallId(u32);

impl WallId {
    /// Creates a new wall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reasons a wall placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlacementError {
    /// No session is running.
    NotRunning,
    /// The ledger holds less of the material than the wall costs.
    InsufficientResources,
}

/// Descending table of the best session-end scores.
///
/// Decoding always goes through [`HighScores::from_scores`], so a persisted
/// table that is unsorted or too long is normalised on load.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct HighScores {
    scores: Vec<u32>,
}

impl From<Vec<u32>> for HighScores {
    fn from(scores: Vec<u32>) -> Self {
        Self::from_scores(scores)
    }
}

impl From<HighScores> for Vec<u32> {
    fn from(table: HighScores) -> Self {
        table.scores
    }
}

impl HighScores {
    /// Maximum number of scores retained.
    pub const CAPACITY: usize = 5;

    /// Builds a table from arbitrary scores, sorting and truncating them.
    #[must_use]
    pub fn from_scores(mut scores: Vec<u32>) -> Self {
        scores.sort_unstable_by(|left, right| right.cmp(left));
        scores.truncate(Self::CAPACITY);
        Self { scores }
    }

    /// Inserts `score` when it qualifies, returning whether the table changed.
    ///
    /// A score qualifies while the table holds fewer than [`Self::CAPACITY`]
    /// entries or when it beats the lowest retained score.
    pub fn record(&mut self, score: u32) -> bool {
        let qualifies = self.scores.len() < Self::CAPACITY
            || self.scores.last().map_or(true, |lowest| score > *lowest);
        if !qualifies {
            return false;
        }
        self.scores.push(score);
        self.scores.sort_unstable_by(|left, right| right.cmp(left));
        self.scores.truncate(Self::CAPACITY);
        true
    }

    /// Scores in descending order.
    #[must_use]
    pub fn scores(&self) -> &[u32] {
        &self.scores
    }

    /// Highest recorded score, if any.
    #[must_use]
    pub fn best(&self) -> Option<u32> {
        self.scores.first().copied()
    }
}

/// Immutable representation of a single hostile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostileSnapshot {
    /// Unique identifier assigned to the hostile.
    pub id: HostileId,
    /// Kind of the hostile.
    pub kind: HostileKind,
    /// Current ground position.
    pub position: WorldPoint,
    /// Current health.
    pub health: f32,
    /// Health the hostile spawned with.
    pub max_health: f32,
    /// Damage dealt to the base on arrival.
    pub damage: f32,
}

impl HostileSnapshot {
    /// Remaining health as a fraction of maximum health, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        health_ratio(self.health, self.max_health)
    }
}

/// Computes `health / max_health` clamped to `0.0..=1.0`.
#[must_use]
pub fn health_ratio(health: f32, max_health: f32) -> f32 {
    if max_health <= 0.0 {
        return 0.0;
    }
    (health / max_health).clamp(0.0, 1.0)
}

/// Read-only snapshot describing all hostiles in registration order.
#[derive(Clone, Debug, Default)]
pub struct HostileView {
    snapshots: Vec<HostileSnapshot>,
}

impl HostileView {
    /// Creates a new hostile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HostileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &HostileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured hostiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no hostiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up a hostile by identifier.
    #[must_use]
    pub fn get(&self, id: HostileId) -> Option<&HostileSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HostileSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single wall used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSnapshot {
    /// Identifier allocated to the wall by the world.
    pub id: WallId,
    /// Material of the wall.
    pub material: Material,
    /// Ground position of the wall's centre.
    pub position: WorldPoint,
    /// Remaining durability.
    pub health: f32,
    /// Facing captured at placement time.
    pub rotation: Rotation,
}

/// Read-only snapshot describing all walls in placement order.
#[derive(Clone, Debug, Default)]
pub struct WallView {
    snapshots: Vec<WallSnapshot>,
}

impl WallView {
    /// Creates a new wall view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<WallSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &WallSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured walls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no walls.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<WallSnapshot> {
        self.snapshots
    }
}

/// What lies under the pointer when the player clicks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerTarget {
    /// Ground point under the pointer, if it falls inside the arena.
    pub ground: Option<WorldPoint>,
    /// Hostile whose footprint contains the ground point, if any.
    pub hostile: Option<HostileId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_table_weights_sum_to_one() {
        let total: f32 = HostileKind::SPAWN_TABLE
            .iter()
            .map(|(_, weight)| weight)
            .sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tank_is_the_only_kind_with_heavy_wall_damage() {
        for (kind, _) in HostileKind::SPAWN_TABLE {
            let expected = if kind == HostileKind::Tank { 20.0 } else { 10.0 };
            assert_eq!(kind.stats().wall_damage, expected, "{}", kind.name());
        }
    }

    #[test]
    fn medium_profile_matches_published_values() {
        let profile = Difficulty::Medium.profile();
        assert_eq!(profile.spawn_interval(), Duration::from_millis(10_000));
        assert_eq!(profile.hostile_damage(), 10.0);
        assert_eq!(profile.wall_health(), 30.0);
        assert_eq!(DifficultyProfile::default(), profile);
    }

    #[test]
    fn difficulty_names_parse_case_insensitively() {
        assert_eq!(Difficulty::from_name("HARD"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_name("nightmare"), None);
    }

    #[test]
    fn rotation_cycles_through_four_facings() {
        let mut rotation = Rotation::default();
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(rotation.degrees());
            rotation = rotation.next();
        }
        assert_eq!(seen, vec![0, 90, 180, 270, 0]);
    }

    #[test]
    fn step_towards_moves_exact_distance() {
        let start = WorldPoint::new(3.0, 4.0);
        let moved = start.step_towards(BASE_POSITION, 1.0);
        assert!((moved.distance(BASE_POSITION) - 4.0).abs() < 1e-5);
        assert!((moved.x - 2.4).abs() < 1e-5);
        assert!((moved.z - 3.2).abs() < 1e-5);
    }

    #[test]
    fn step_towards_is_stationary_at_target() {
        assert_eq!(BASE_POSITION.step_towards(BASE_POSITION, 1.0), BASE_POSITION);
    }

    #[test]
    fn high_scores_stay_sorted_and_capped() {
        let mut table = HighScores::default();
        for score in [30, 10, 50, 20, 40, 60] {
            let _ = table.record(score);
        }
        assert_eq!(table.scores(), &[60, 50, 40, 30, 20]);
        assert!(!table.record(20), "ties with the minimum do not qualify");
        assert!(!table.record(5));
        assert!(table.record(25));
        assert_eq!(table.scores(), &[60, 50, 40, 30, 25]);
        assert_eq!(table.best(), Some(60));
    }

    #[test]
    fn high_scores_accept_anything_while_not_full() {
        let mut table = HighScores::from_scores(vec![90, 80]);
        assert!(table.record(0));
        assert_eq!(table.scores(), &[90, 80, 0]);
    }

    #[test]
    fn high_scores_round_trip_through_bincode() {
        let table = HighScores::from_scores(vec![10, 70, 40]);
        let bytes = bincode::serialize(&table).expect("serialize");
        let restored: HighScores = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, table);
        assert_eq!(restored.scores(), &[70, 40, 10]);
    }

    #[test]
    fn decoded_high_scores_are_sorted_and_capped() {
        let bytes = bincode::serialize(&vec![1_u32, 7, 3, 9, 5, 8]).expect("serialize");
        let restored: HighScores = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored.scores(), &[9, 8, 7, 5, 3]);
    }

    #[test]
    fn health_ratio_clamps_and_guards_zero() {
        assert_eq!(health_ratio(-5.0, 20.0), 0.0);
        assert_eq!(health_ratio(10.0, 20.0), 0.5);
        assert_eq!(health_ratio(10.0, 0.0), 0.0);
    }
}
