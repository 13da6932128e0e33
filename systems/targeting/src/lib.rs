#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves pointer clicks into ground points and hostile targets.

use bastion_core::{HostileId, HostileView, PointerTarget, WorldPoint};

/// Half the side length of a hostile's square ground footprint.
const FOOTPRINT_HALF_EXTENT: f32 = 0.5;

/// Pointer hit-testing system that reuses a scratch buffer between clicks.
#[derive(Debug, Default)]
pub struct Targeting {
    candidates: Vec<Candidate>,
}

impl Targeting {
    /// Creates a new targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves what lies under the pointer.
    ///
    /// A hostile is hit when the ground point falls inside its unit footprint.
    /// Overlapping footprints resolve to the hostile whose centre is nearest,
    /// with ties going to the earliest registered hostile.
    pub fn resolve(
        &mut self,
        ground: Option<WorldPoint>,
        hostiles: &HostileView,
    ) -> PointerTarget {
        let Some(point) = ground else {
            return PointerTarget::default();
        };

        self.candidates.clear();
        for snapshot in hostiles.iter() {
            let dx = (snapshot.position.x - point.x).abs();
            let dz = (snapshot.position.z - point.z).abs();
            if dx > FOOTPRINT_HALF_EXTENT || dz > FOOTPRINT_HALF_EXTENT {
                continue;
            }
            self.candidates.push(Candidate {
                id: snapshot.id,
                distance_sq: dx * dx + dz * dz,
            });
        }

        let hostile = self
            .candidates
            .iter()
            .copied()
            .reduce(|best, current| if current.precedes(&best) { current } else { best })
            .map(|candidate| candidate.id);

        PointerTarget {
            ground: Some(point),
            hostile,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: HostileId,
    distance_sq: f32,
}

impl Candidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }
        self.id < other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bastion_core::{HostileKind, HostileSnapshot};

    fn snapshot(id: u32, x: f32, z: f32) -> HostileSnapshot {
        HostileSnapshot {
            id: HostileId::new(id),
            kind: HostileKind::Normal,
            position: WorldPoint::new(x, z),
            health: 20.0,
            max_health: 20.0,
            damage: 10.0,
        }
    }

    #[test]
    fn missing_ground_point_resolves_to_nothing() {
        let view = HostileView::from_snapshots(vec![snapshot(0, 0.0, 0.0)]);
        let target = Targeting::new().resolve(None, &view);
        assert_eq!(target, PointerTarget::default());
    }

    #[test]
    fn click_inside_footprint_targets_hostile() {
        let view = HostileView::from_snapshots(vec![snapshot(4, 10.0, -3.0)]);
        let target = Targeting::new().resolve(Some(WorldPoint::new(10.4, -3.5)), &view);
        assert_eq!(target.hostile, Some(HostileId::new(4)));
        assert_eq!(target.ground, Some(WorldPoint::new(10.4, -3.5)));
    }

    #[test]
    fn click_outside_footprint_only_reports_ground() {
        let view = HostileView::from_snapshots(vec![snapshot(0, 10.0, 0.0)]);
        let target = Targeting::new().resolve(Some(WorldPoint::new(10.6, 0.0)), &view);
        assert_eq!(target.hostile, None);
        assert!(target.ground.is_some());
    }

    #[test]
    fn nearest_centre_wins_among_overlapping_footprints() {
        let view = HostileView::from_snapshots(vec![
            snapshot(0, 5.0, 0.0),
            snapshot(1, 5.6, 0.0),
        ]);
        let target = Targeting::new().resolve(Some(WorldPoint::new(5.4, 0.0)), &view);
        assert_eq!(target.hostile, Some(HostileId::new(1)));
    }

    #[test]
    fn ties_go_to_the_earliest_registration() {
        let view = HostileView::from_snapshots(vec![
            snapshot(7, 2.0, 2.0),
            snapshot(3, 2.0, 2.0),
        ]);
        let target = Targeting::new().resolve(Some(WorldPoint::new(2.1, 2.0)), &view);
        assert_eq!(target.hostile, Some(HostileId::new(3)));
    }
}
