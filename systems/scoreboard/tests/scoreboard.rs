use std::time::Duration;

use bastion_core::{Command, Event, HighScores, HostileKind, WorldPoint};
use bastion_system_scoreboard::{MemoryStore, ScoreStore, Scoreboard, StoreError};
use bastion_world::{self as world, World};

fn game_over(final_score: u32) -> Event {
    Event::GameOver { final_score }
}

#[test]
fn first_scores_fill_the_table_in_descending_order() {
    let mut store = MemoryStore::new();
    let mut scoreboard = Scoreboard::load(&store);
    let mut out = Vec::new();

    scoreboard.handle(&[game_over(20), game_over(50), game_over(0)], &mut store, &mut out);

    assert_eq!(scoreboard.scores().scores(), &[50, 20, 0]);
    assert_eq!(store.stored(), scoreboard.scores());
    assert_eq!(out.len(), 3);
}

#[test]
fn full_table_only_accepts_scores_beating_the_minimum() {
    let mut store = MemoryStore::with_scores(HighScores::from_scores(vec![90, 80, 70, 60, 50]));
    let mut scoreboard = Scoreboard::load(&store);
    let mut out = Vec::new();

    scoreboard.handle(&[game_over(50)], &mut store, &mut out);
    assert!(out.is_empty(), "ties with the minimum do not qualify");

    scoreboard.handle(&[game_over(65)], &mut store, &mut out);
    assert_eq!(scoreboard.scores().scores(), &[90, 80, 70, 65, 60]);
    assert_eq!(
        out,
        vec![Event::HighScoresUpdated {
            scores: HighScores::from_scores(vec![90, 80, 70, 65, 60]),
        }]
    );
}

#[test]
fn failed_save_keeps_the_previous_table() {
    let mut store = MemoryStore::with_scores(HighScores::from_scores(vec![40]));
    let mut scoreboard = Scoreboard::load(&store);
    store.reject_saves(true);
    let mut out = Vec::new();

    scoreboard.handle(&[game_over(100)], &mut store, &mut out);

    assert_eq!(scoreboard.scores().scores(), &[40]);
    assert_eq!(store.stored().scores(), &[40]);
    assert!(out.is_empty());

    store.reject_saves(false);
    scoreboard.handle(&[game_over(100)], &mut store, &mut out);
    assert_eq!(scoreboard.scores().scores(), &[100, 40]);
}

struct BrokenStore;

impl ScoreStore for BrokenStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        Err(StoreError::Malformed("not a list".to_owned()))
    }

    fn save(&mut self, _scores: &HighScores) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("read-only".to_owned()))
    }
}

#[test]
fn unreadable_store_starts_empty() {
    let scoreboard = Scoreboard::load(&BrokenStore);
    assert_eq!(scoreboard.scores(), &HighScores::default());
}

#[test]
fn records_the_final_score_of_a_lost_session() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartSession, &mut events);
    world::apply(
        &mut world,
        Command::SpawnHostile {
            kind: HostileKind::Fast,
            position: WorldPoint::new(20.0, 0.0),
        },
        &mut events,
    );
    let hostile = bastion_world::query::hostile_view(&world)
        .iter()
        .next()
        .map(|snapshot| snapshot.id)
        .expect("hostile spawned");
    world::apply(&mut world, Command::FireAt { hostile }, &mut events);
    for _ in 0..4 {
        world::apply(
            &mut world,
            Command::SpawnHostile {
                kind: HostileKind::Tank,
                position: WorldPoint::new(0.0, 0.1),
            },
            &mut events,
        );
    }
    events.clear();
    world::apply(
        &mut world,
        Command::Tick {
            dt: Duration::from_millis(16),
        },
        &mut events,
    );
    assert!(events.contains(&Event::GameOver { final_score: 10 }));

    let mut store = MemoryStore::new();
    let mut scoreboard = Scoreboard::load(&store);
    let mut out = Vec::new();
    scoreboard.handle(&events, &mut store, &mut out);

    assert_eq!(scoreboard.scores().scores(), &[10]);
}
