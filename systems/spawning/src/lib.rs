#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting hostile spawn commands.

use std::time::Duration;

use bastion_core::{
    Command, Event, HostileKind, SessionPhase, WorldPoint, ARENA_HALF_EXTENT, SPAWN_BATCH_SIZE,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

const DEFAULT_SEED: u64 = 0x4d59_5df4_d0f3_3173;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    batch_size: usize,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided batch size and seed.
    #[must_use]
    pub const fn new(batch_size: usize, rng_seed: u64) -> Self {
        Self {
            batch_size,
            rng_seed,
        }
    }

    /// Replaces the seed while keeping the batch size.
    #[must_use]
    pub const fn with_seed(self, rng_seed: u64) -> Self {
        Self { rng_seed, ..self }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(SPAWN_BATCH_SIZE, DEFAULT_SEED)
    }
}

/// Cancellable handle for the periodic batch timer of one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SpawnTimer {
    interval: Duration,
    elapsed: Duration,
}

impl SpawnTimer {
    fn armed(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Accumulates `dt` and returns how many full intervals elapsed.
    fn advance(&mut self, dt: Duration) -> usize {
        if self.interval.is_zero() {
            return 0;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        let mut fired = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            fired += 1;
        }
        fired
    }
}

/// Pure system that emits hostile batches while a session runs.
///
/// A session start arms a fresh timer at the profile's spawn interval after
/// dropping whatever timer was armed before, so restarts never stack timers.
/// Leaving the running phase cancels the timer.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    batch_size: usize,
    timer: Option<SpawnTimer>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            batch_size: config.batch_size,
            timer: None,
        }
    }

    /// Reports whether a spawn timer is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Consumes world events and emits spawn commands for due batches.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::SessionStarted { profile } => {
                    let interval = profile.spawn_interval();
                    if self.timer.replace(SpawnTimer::armed(interval)).is_some() {
                        debug!("replaced a spawn timer left over from a previous session");
                    }
                    info!(
                        interval_ms = interval.as_millis() as u64,
                        batch = self.batch_size,
                        "spawn timer armed"
                    );
                    self.spawn_batch(self.batch_size, out);
                }
                Event::PhaseChanged { phase } if *phase != SessionPhase::Running => {
                    if self.timer.take().is_some() {
                        debug!(?phase, "spawn timer cancelled");
                    }
                }
                Event::TimeAdvanced { dt } => {
                    let due = self.timer.as_mut().map_or(0, |timer| timer.advance(*dt));
                    for _ in 0..due {
                        self.spawn_batch(self.batch_size, out);
                    }
                }
                _ => {}
            }
        }
    }

    /// Emits `count` spawn commands with randomly drawn kinds and edge positions.
    pub fn spawn_batch(&mut self, count: usize, out: &mut Vec<Command>) {
        for _ in 0..count {
            let roll: f32 = self.rng.gen();
            let kind = weighted_choice(&HostileKind::SPAWN_TABLE, roll)
                .unwrap_or(HostileKind::Normal);
            let position = self.edge_position();
            out.push(Command::SpawnHostile { kind, position });
        }
    }

    /// Samples a point on the arena boundary.
    ///
    /// One axis is pinned to a random edge at plus or minus the half extent and
    /// the other axis is uniform across the arena.
    fn edge_position(&mut self) -> WorldPoint {
        let edge = if self.rng.gen_bool(0.5) {
            ARENA_HALF_EXTENT
        } else {
            -ARENA_HALF_EXTENT
        };
        let along = self.rng.gen_range(-ARENA_HALF_EXTENT..=ARENA_HALF_EXTENT);
        if self.rng.gen_bool(0.5) {
            WorldPoint::new(edge, along)
        } else {
            WorldPoint::new(along, edge)
        }
    }
}

/// Picks an entry from a weight table using a single roll in `[0, 1)`.
///
/// Entries are scanned in table order against the running sum of weights; the
/// first entry whose cumulative threshold exceeds `roll` wins. Rolls past the
/// total weight fall back to the last entry. Returns `None` for an empty table.
#[must_use]
pub fn weighted_choice<T: Copy>(table: &[(T, f32)], roll: f32) -> Option<T> {
    let mut threshold = 0.0;
    for (entry, weight) in table {
        threshold += weight;
        if roll < threshold {
            return Some(*entry);
        }
    }
    table.last().map(|(entry, _)| *entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_never_fires() {
        let mut timer = SpawnTimer::armed(Duration::ZERO);
        assert_eq!(timer.advance(Duration::from_secs(10)), 0);
    }

    #[test]
    fn timer_keeps_remainder_between_advances() {
        let mut timer = SpawnTimer::armed(Duration::from_millis(1_000));
        assert_eq!(timer.advance(Duration::from_millis(2_500)), 2);
        assert_eq!(timer.advance(Duration::from_millis(400)), 0);
        assert_eq!(timer.advance(Duration::from_millis(100)), 1);
    }

    #[test]
    fn weighted_choice_uses_cumulative_thresholds() {
        let table = HostileKind::SPAWN_TABLE;
        assert_eq!(weighted_choice(&table, 0.0), Some(HostileKind::Normal));
        assert_eq!(weighted_choice(&table, 0.39), Some(HostileKind::Normal));
        assert_eq!(weighted_choice(&table, 0.41), Some(HostileKind::Strong));
        assert_eq!(weighted_choice(&table, 0.61), Some(HostileKind::Fast));
        assert_eq!(weighted_choice(&table, 0.95), Some(HostileKind::Tank));
        assert_eq!(weighted_choice(&table, 1.5), Some(HostileKind::Tank));
    }

    #[test]
    fn weighted_choice_on_empty_table_is_none() {
        let table: [(HostileKind, f32); 0] = [];
        assert_eq!(weighted_choice(&table, 0.5), None);
    }
}
