//! Two-material resource ledger gating wall construction.

use bastion_core::{Material, Resources};

/// Capped counters for both construction materials.
///
/// Every mutation clamps each counter into `0..=cap`. Counters are unsigned
/// so the lower bound holds structurally; spending refuses rather than
/// saturating so an unaffordable wall never costs anything.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ledger {
    balance: Resources,
}

impl Ledger {
    /// Creates a ledger holding the session starting balance.
    pub(crate) fn new() -> Self {
        Self {
            balance: clamp(Resources::starting()),
        }
    }

    /// Current balance of both counters.
    pub(crate) fn balance(&self) -> Resources {
        self.balance
    }

    /// Adds `amount` to both counters, clamping each at its cap.
    pub(crate) fn credit(&mut self, amount: Resources) {
        self.balance = clamp(Resources::new(
            self.balance.wood.saturating_add(amount.wood),
            self.balance.metal.saturating_add(amount.metal),
        ));
    }

    /// Deducts the wall cost of `material` when affordable.
    ///
    /// Returns `false` and leaves the balance untouched otherwise.
    pub(crate) fn try_spend(&mut self, material: Material) -> bool {
        let cost = material.wall_cost();
        let held = self.balance.get(material);
        if held < cost {
            return false;
        }
        match material {
            Material::Wood => self.balance.wood = held - cost,
            Material::Metal => self.balance.metal = held - cost,
        }
        true
    }
}

fn clamp(resources: Resources) -> Resources {
    Resources::new(
        resources.wood.min(Material::Wood.cap()),
        resources.metal.min(Material::Metal.cap()),
    )
}
