//! Authoritative hostile state and the registry that owns it.

use std::{collections::BTreeMap, time::Duration};

use bastion_core::{
    DifficultyProfile, HostileId, HostileKind, HostileSnapshot, Resources, WorldPoint,
    WALL_ATTACK_COOLDOWN,
};

/// Hostile stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Hostile {
    pub(crate) id: HostileId,
    pub(crate) kind: HostileKind,
    pub(crate) position: WorldPoint,
    pub(crate) speed: f32,
    pub(crate) health: f32,
    pub(crate) max_health: f32,
    pub(crate) damage: f32,
    pub(crate) drops: Resources,
    /// Simulated time of the last wall attack; `None` until the first one.
    pub(crate) last_attack: Option<Duration>,
}

impl Hostile {
    fn new(
        id: HostileId,
        kind: HostileKind,
        position: WorldPoint,
        profile: &DifficultyProfile,
    ) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position,
            speed: stats.speed,
            health: stats.health,
            max_health: stats.health,
            damage: profile.hostile_damage() * stats.damage_multiplier,
            drops: stats.drops,
            last_attack: None,
        }
    }

    /// Reports whether the wall-attack cooldown elapsed at simulated time `now`.
    pub(crate) fn ready_to_attack(&self, now: Duration) -> bool {
        self.last_attack
            .map_or(true, |last| now.saturating_sub(last) >= WALL_ATTACK_COOLDOWN)
    }

    pub(crate) fn wall_damage(&self) -> f32 {
        self.kind.stats().wall_damage
    }

    pub(crate) fn snapshot(&self) -> HostileSnapshot {
        HostileSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            max_health: self.max_health,
            damage: self.damage,
        }
    }
}

/// Registry that stores hostiles in registration order and allocates identifiers.
///
/// Identifiers grow monotonically, so iterating the ordered map visits
/// hostiles in the order they spawned.
#[derive(Debug)]
pub(crate) struct HostileRegistry {
    entries: BTreeMap<HostileId, Hostile>,
    next_id: u32,
}

impl HostileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Appends a hostile with stats derived from `kind` and `profile`.
    pub(crate) fn spawn(
        &mut self,
        kind: HostileKind,
        position: WorldPoint,
        profile: &DifficultyProfile,
    ) -> &Hostile {
        let id = HostileId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries
            .entry(id)
            .or_insert_with(|| Hostile::new(id, kind, position, profile))
    }

    pub(crate) fn get_mut(&mut self, id: HostileId) -> Option<&mut Hostile> {
        self.entries.get_mut(&id)
    }

    /// Removes a hostile; removing an absent identifier is a no-op.
    pub(crate) fn remove(&mut self, id: HostileId) -> Option<Hostile> {
        self.entries.remove(&id)
    }

    /// Removes every identifier in `doomed` after an update pass completed.
    pub(crate) fn sweep(&mut self, doomed: &[HostileId]) {
        for id in doomed {
            let _ = self.entries.remove(id);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Hostile> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Hostile> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::Difficulty;

    fn registry_with(kinds: &[HostileKind]) -> HostileRegistry {
        let mut registry = HostileRegistry::new();
        let profile = Difficulty::Medium.profile();
        for kind in kinds {
            let _ = registry.spawn(*kind, WorldPoint::new(25.0, 0.0), &profile);
        }
        registry
    }

    #[test]
    fn spawn_applies_kind_stats_and_difficulty_multiplier() {
        let mut registry = HostileRegistry::new();
        let profile = Difficulty::Hard.profile();
        let tank = registry
            .spawn(HostileKind::Tank, WorldPoint::new(-25.0, 3.0), &profile)
            .clone();
        assert_eq!(tank.health, 100.0);
        assert_eq!(tank.max_health, 100.0);
        assert_eq!(tank.damage, 45.0);
        assert_eq!(tank.speed, 0.01);
        assert_eq!(tank.drops, Resources::new(20, 10));
        assert!(tank.last_attack.is_none());
    }

    #[test]
    fn iteration_follows_registration_order() {
        let registry = registry_with(&[
            HostileKind::Fast,
            HostileKind::Normal,
            HostileKind::Tank,
        ]);
        let kinds: Vec<HostileKind> = registry.iter().map(|hostile| hostile.kind).collect();
        assert_eq!(
            kinds,
            vec![HostileKind::Fast, HostileKind::Normal, HostileKind::Tank]
        );
    }

    #[test]
    fn removing_twice_is_a_no_op() {
        let mut registry = registry_with(&[HostileKind::Normal, HostileKind::Strong]);
        let id = HostileId::new(0);
        assert!(registry.remove(id).is_some());
        assert!(registry.remove(id).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn sweep_removes_only_doomed_entries() {
        let mut registry = registry_with(&[
            HostileKind::Normal,
            HostileKind::Normal,
            HostileKind::Normal,
            HostileKind::Normal,
        ]);
        registry.sweep(&[HostileId::new(1), HostileId::new(3), HostileId::new(9)]);
        let ids: Vec<u32> = registry.iter().map(|hostile| hostile.id.get()).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn identifiers_are_not_reused_after_clear() {
        let mut registry = registry_with(&[HostileKind::Normal]);
        registry.clear();
        let profile = Difficulty::Medium.profile();
        let id = registry
            .spawn(HostileKind::Normal, WorldPoint::default(), &profile)
            .id;
        assert_eq!(id, HostileId::new(1));
    }

    #[test]
    fn attack_cooldown_gates_follow_up_attacks() {
        let mut registry = registry_with(&[HostileKind::Normal]);
        let hostile = registry
            .get_mut(HostileId::new(0))
            .expect("hostile spawned");
        assert!(hostile.ready_to_attack(Duration::ZERO));
        hostile.last_attack = Some(Duration::from_millis(500));
        assert!(!hostile.ready_to_attack(Duration::from_millis(1_499)));
        assert!(hostile.ready_to_attack(Duration::from_millis(1_500)));
    }
}
