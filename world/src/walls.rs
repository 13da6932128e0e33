//! Player-built walls and the registry that owns them.

use std::collections::BTreeMap;

use bastion_core::{Material, Rotation, WallId, WallSnapshot, WorldPoint};

#[derive(Clone, Debug)]
pub(crate) struct Wall {
    pub(crate) id: WallId,
    pub(crate) material: Material,
    pub(crate) position: WorldPoint,
    pub(crate) health: f32,
    pub(crate) rotation: Rotation,
}

impl Wall {
    pub(crate) fn snapshot(&self) -> WallSnapshot {
        WallSnapshot {
            id: self.id,
            material: self.material,
            position: self.position,
            health: self.health,
            rotation: self.rotation,
        }
    }
}

/// Outcome of damaging a wall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum WallDamage {
    /// The wall survived with the contained durability.
    Standing(f32),
    /// The wall reached zero durability and was removed.
    Destroyed,
}

/// Registry that stores walls in placement order and allocates identifiers.
#[derive(Debug)]
pub(crate) struct WallRegistry {
    entries: BTreeMap<WallId, Wall>,
    next_id: u32,
}

impl WallRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn place(
        &mut self,
        material: Material,
        position: WorldPoint,
        rotation: Rotation,
        health: f32,
    ) -> WallId {
        let id = WallId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let _ = self.entries.insert(
            id,
            Wall {
                id,
                material,
                position,
                health,
                rotation,
            },
        );
        id
    }

    /// First wall in placement order closer than `range` to `point`.
    ///
    /// Ties are broken by placement order rather than by distance.
    pub(crate) fn first_within(&self, point: WorldPoint, range: f32) -> Option<WallId> {
        self.entries
            .values()
            .find(|wall| point.distance(wall.position) < range)
            .map(|wall| wall.id)
    }

    /// Subtracts `amount` from the wall, removing it once durability reaches zero.
    pub(crate) fn damage(&mut self, id: WallId, amount: f32) -> Option<WallDamage> {
        let wall = self.entries.get_mut(&id)?;
        wall.health -= amount;
        if wall.health > 0.0 {
            return Some(WallDamage::Standing(wall.health));
        }
        let _ = self.entries.remove(&id);
        Some(WallDamage::Destroyed)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Wall> {
        self.entries.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
