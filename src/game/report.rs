//! Pass Report
//!
//! Counters describing what one collision pass did. Gameplay effects flow
//! through the delegates; the report is for logging, tests and tooling.

use serde::{Serialize, Deserialize};

/// Summary of a single [`CollisionWorld::update`](super::world::CollisionWorld::update).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassReport {
    /// No live player, nothing was tested
    pub skipped: bool,
    /// The player entry was dropped because its entity left the scene
    pub player_cleared: bool,
    /// Live hazards examined
    pub hazards_tested: u32,
    /// Projectile hits accepted by the player (projectile and hazard consumed)
    pub projectile_hits: u32,
    /// Projectile contacts the player declined
    pub projectile_contacts_declined: u32,
    /// Hazard contacts reported to the player
    pub hazard_hits: u32,
    /// Power-ups collected
    pub pickups: u32,
    /// Hazard entries dropped because an entity left the scene
    pub hazards_pruned: u32,
    /// Power-up entries dropped because the entity left the scene
    pub powerups_pruned: u32,
    /// Projectile entries dropped because the entity left the scene
    pub projectiles_pruned: u32,
    /// Queued registrations applied around the pass
    pub registrations_applied: u32,
}

impl PassReport {
    /// Did anything touch anything?
    pub fn had_contact(&self) -> bool {
        self.projectile_hits + self.hazard_hits + self.pickups > 0
    }

    /// Total stale entries removed.
    pub fn pruned(&self) -> u32 {
        self.hazards_pruned + self.powerups_pruned + self.projectiles_pruned
    }

    /// Accumulate another pass into this one (e.g. totals over a session).
    pub fn merge(&mut self, other: &PassReport) {
        self.skipped |= other.skipped;
        self.player_cleared |= other.player_cleared;
        self.hazards_tested += other.hazards_tested;
        self.projectile_hits += other.projectile_hits;
        self.projectile_contacts_declined += other.projectile_contacts_declined;
        self.hazard_hits += other.hazard_hits;
        self.pickups += other.pickups;
        self.hazards_pruned += other.hazards_pruned;
        self.powerups_pruned += other.powerups_pruned;
        self.projectiles_pruned += other.projectiles_pruned;
        self.registrations_applied += other.registrations_applied;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_and_totals() {
        let mut total = PassReport::default();
        assert!(!total.had_contact());

        let frame = PassReport {
            hazards_tested: 3,
            hazard_hits: 1,
            projectiles_pruned: 2,
            hazards_pruned: 1,
            ..PassReport::default()
        };
        total.merge(&frame);
        total.merge(&frame);

        assert_eq!(total.hazards_tested, 6);
        assert_eq!(total.pruned(), 6);
        assert!(total.had_contact());
        assert!(!total.skipped);
    }

    #[test]
    fn test_report_serializes() {
        let report = PassReport { pickups: 1, ..PassReport::default() };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"pickups\":1"));
        let back: PassReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
