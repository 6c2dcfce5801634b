//! The faction influence field.
//!
//! A signed density of nearby units, resolved for one querying faction:
//! enemy presence raises a position's cost estimate, allied presence lowers
//! it.  Champions weigh five times a minion — losing a lane to the enemy
//! champion should repel pathing far more than a stray minion does.
//!
//! The field reads the per-tick position snapshot, not the live roster, so
//! it is a plain immutable view with no interior mutability.

use nav_core::{AgentClass, AgentId, Faction, Vec2};
use nav_graph::InfluenceSource;

/// One agent's row in the per-tick position snapshot.
#[derive(Copy, Clone, Debug)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub faction: Faction,
    pub class: AgentClass,
    pub position: Vec2,
}

/// [`InfluenceSource`] over a position snapshot, bound to the querying
/// agent's faction.
pub struct InfluenceField<'a> {
    entries: &'a [AgentSnapshot],
    faction: Faction,
    radius: f32,
    /// The querying agent never influences its own search.
    exclude: AgentId,
}

impl<'a> InfluenceField<'a> {
    pub fn new(
        entries: &'a [AgentSnapshot],
        faction: Faction,
        radius: f32,
        exclude: AgentId,
    ) -> Self {
        Self { entries, faction, radius, exclude }
    }
}

impl InfluenceSource for InfluenceField<'_> {
    fn influence_at(&self, pos: Vec2) -> f32 {
        let mut sum = 0.0;
        for entry in self.entries {
            if entry.id == self.exclude || entry.position.distance(pos) > self.radius {
                continue;
            }
            let weight = entry.class.influence_weight();
            if entry.faction == self.faction {
                sum -= weight;
            } else {
                sum += weight;
            }
        }
        sum
    }
}
