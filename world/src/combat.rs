//! Melee, movement and ranged damage resolution.

use std::time::Duration;

use bastion_core::{
    health_ratio, Event, HostileId, BASE_POSITION, BASE_REACH, MELEE_RANGE,
};
use tracing::debug;

use crate::{
    hostiles::{Hostile, HostileRegistry},
    walls::{WallDamage, WallRegistry},
};

/// Whether the base survived a frame of hostile movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Advance {
    Continue,
    BaseDestroyed,
}

/// Outcome of a single ranged hit.
#[derive(Debug)]
pub(crate) enum RangedHit {
    /// The hostile survived with the reported health.
    Wounded { health: f32, health_ratio: f32 },
    /// The hostile died and was removed from the registry.
    Killed(Hostile),
}

/// Advances every hostile by one frame in registration order.
///
/// Each hostile is first checked against the walls: the first wall in range
/// blocks it and, once the attack cooldown elapsed, takes the hostile's wall
/// damage. Unblocked hostiles either step toward the base or, when already
/// within reach, damage it and are consumed. Consumed hostiles are swept after
/// the pass. Processing stops as soon as the base is destroyed.
pub(crate) fn advance_hostiles(
    hostiles: &mut HostileRegistry,
    walls: &mut WallRegistry,
    base_health: &mut f32,
    now: Duration,
    out_events: &mut Vec<Event>,
) -> Advance {
    let mut arrived: Vec<HostileId> = Vec::new();
    let mut outcome = Advance::Continue;

    for hostile in hostiles.iter_mut() {
        if let Some(wall) = walls.first_within(hostile.position, MELEE_RANGE) {
            if hostile.ready_to_attack(now) {
                hostile.last_attack = Some(now);
                match walls.damage(wall, hostile.wall_damage()) {
                    Some(WallDamage::Standing(health)) => {
                        out_events.push(Event::WallDamaged { wall, health });
                    }
                    Some(WallDamage::Destroyed) => {
                        debug!(wall = wall.get(), "wall destroyed");
                        out_events.push(Event::WallDestroyed { wall });
                    }
                    None => {}
                }
            }
            continue;
        }

        if hostile.position.distance(BASE_POSITION) > BASE_REACH {
            hostile.position = hostile.position.step_towards(BASE_POSITION, hostile.speed);
            continue;
        }

        *base_health -= hostile.damage;
        arrived.push(hostile.id);
        debug!(
            hostile = hostile.id.get(),
            damage = hostile.damage,
            base_health = *base_health,
            "hostile reached the base"
        );
        out_events.push(Event::HostileReachedBase {
            hostile: hostile.id,
            damage: hostile.damage,
        });
        out_events.push(Event::BaseHealthChanged {
            health: *base_health,
        });

        if *base_health <= 0.0 {
            outcome = Advance::BaseDestroyed;
            break;
        }
    }

    hostiles.sweep(&arrived);
    outcome
}

/// Applies `damage` to the hostile, removing it when its health drops to zero.
///
/// Returns `None` when the hostile no longer exists, so a kill is credited
/// exactly once.
pub(crate) fn ranged_hit(
    hostiles: &mut HostileRegistry,
    id: HostileId,
    damage: f32,
) -> Option<RangedHit> {
    let hostile = hostiles.get_mut(id)?;
    hostile.health -= damage;
    if hostile.health > 0.0 {
        return Some(RangedHit::Wounded {
            health: hostile.health,
            health_ratio: health_ratio(hostile.health, hostile.max_health),
        });
    }
    hostiles.remove(id).map(RangedHit::Killed)
}
