//! Collision World
//!
//! Owns the player slot and the hazard, power-up and projectile registries,
//! and runs the once-per-frame collision pass:
//!
//! 1. Apply queued registrations.
//! 2. Skip the pass without a live player (a detached player is cleared).
//! 3. Prune detached projectiles.
//! 4. Resolve the player into world space.
//! 5. For each live hazard: projectiles first, then the player.
//! 6. For each live power-up: test the player, pick up at most once.
//! 7. Apply registrations queued by delegates during the pass.
//!
//! The pass never fails. Outcomes are delivered through the entries'
//! delegates; the returned [`PassReport`] only counts what happened.

use tracing::{debug, instrument, trace};

use super::config::CollisionConfig;
use super::entry::{HazardEntry, PlayerEntry, PowerupEntry, ProjectileEntry};
use super::registrar::{Registrar, Registration};
use super::report::PassReport;
use super::shape::{
    hazard_hits_circle, hazard_hits_player, player_hits_circle, resolve_player, world_circle,
    ScratchBuffers,
};

/// The collision registry and per-frame pass.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    config: CollisionConfig,
    player: Option<PlayerEntry>,
    hazards: Vec<HazardEntry>,
    powerups: Vec<PowerupEntry>,
    projectiles: Vec<ProjectileEntry>,
    scratch: ScratchBuffers,
    registrar: Registrar,
}

impl CollisionWorld {
    /// Create an empty world with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty world with the given configuration.
    pub fn with_config(config: CollisionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Register the player, replacing (and releasing) any previous one.
    pub fn set_player(&mut self, entry: PlayerEntry) {
        if self.player.is_some() {
            debug!("Replacing player with {:?} player", entry.kind());
        } else {
            debug!("{:?} player registered", entry.kind());
        }
        self.player = Some(entry);
    }

    /// Register a hazard.
    pub fn add_hazard(&mut self, entry: HazardEntry) {
        trace!("{:?} hazard registered (damage {})", entry.kind(), entry.info().damage);
        self.hazards.push(entry);
    }

    /// Register a power-up.
    pub fn add_powerup(&mut self, entry: PowerupEntry) {
        trace!("Power-up registered (radius {})", entry.radius());
        self.powerups.push(entry);
    }

    /// Register a projectile.
    pub fn add_projectile(&mut self, entry: ProjectileEntry) {
        trace!("Projectile registered (radius {})", entry.radius());
        self.projectiles.push(entry);
    }

    /// Handle for registering entities from inside delegates.
    pub fn registrar(&self) -> Registrar {
        self.registrar.clone()
    }

    /// Apply queued registrations now. Returns how many were applied.
    pub fn flush_registrations(&mut self) -> usize {
        let queued = self.registrar.drain();
        let count = queued.len();
        for registration in queued {
            match registration {
                Registration::Player(entry) => self.set_player(entry),
                Registration::Hazard(entry) => self.add_hazard(entry),
                Registration::Powerup(entry) => self.add_powerup(entry),
                Registration::Projectile(entry) => self.add_projectile(entry),
            }
        }
        count
    }

    /// Drop all hazards, power-ups and projectiles, including queued ones.
    /// The player (and a queued player replacement) stays registered.
    pub fn clear_collision_data(&mut self) {
        debug!(
            "Clearing collision data: {} hazards, {} power-ups, {} projectiles",
            self.hazards.len(),
            self.powerups.len(),
            self.projectiles.len()
        );
        self.hazards.clear();
        self.powerups.clear();
        self.projectiles.clear();
        self.registrar.discard_entities();
    }

    /// Drop the player only.
    pub fn clear_player(&mut self) {
        self.player = None;
    }

    /// Drop everything, including the player and queued registrations.
    pub fn clear_all(&mut self) {
        self.clear_collision_data();
        self.clear_player();
        self.registrar.discard();
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Registered player, if any.
    pub fn player(&self) -> Option<&PlayerEntry> {
        self.player.as_ref()
    }

    /// Registered hazards (order is unspecified).
    pub fn hazards(&self) -> &[HazardEntry] {
        &self.hazards
    }

    /// Registered power-ups (order is unspecified).
    pub fn powerups(&self) -> &[PowerupEntry] {
        &self.powerups
    }

    /// Registered projectiles (order is unspecified).
    pub fn projectiles(&self) -> &[ProjectileEntry] {
        &self.projectiles
    }

    /// Is a player registered?
    pub fn has_player(&self) -> bool {
        self.player.is_some()
    }

    /// Number of registered hazards.
    pub fn hazard_count(&self) -> usize {
        self.hazards.len()
    }

    /// Number of registered power-ups.
    pub fn powerup_count(&self) -> usize {
        self.powerups.len()
    }

    /// Number of registered projectiles.
    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    /// Nothing registered at all.
    pub fn is_empty(&self) -> bool {
        self.player.is_none()
            && self.hazards.is_empty()
            && self.powerups.is_empty()
            && self.projectiles.is_empty()
    }

    // =========================================================================
    // COLLISION PASS
    // =========================================================================

    /// Run one collision pass. Call once per frame after entities have moved.
    #[instrument(level = "trace", skip_all)]
    pub fn update(&mut self) -> PassReport {
        let before = self.flush_registrations();
        let mut report = self.run_pass();
        let after = self.flush_registrations();
        report.registrations_applied = (before + after) as u32;
        report
    }

    fn run_pass(&mut self) -> PassReport {
        let mut report = PassReport::default();

        let player_alive = match &self.player {
            Some(player) => player.entity().is_attached(),
            None => {
                trace!("No player registered, skipping pass");
                report.skipped = true;
                return report;
            }
        };
        if !player_alive {
            debug!("Player entity left the scene, clearing player");
            self.player = None;
            report.player_cleared = true;
            report.skipped = true;
            return report;
        }

        // Borrow the registries separately so delegates can run while the
        // scratch buffer holds the resolved player.
        let Self {
            config,
            player,
            hazards,
            powerups,
            projectiles,
            scratch,
            ..
        } = self;
        let Some(player) = player.as_mut() else {
            return report;
        };

        let before = projectiles.len();
        projectiles.retain(|projectile| projectile.entity().is_attached());
        report.projectiles_pruned = (before - projectiles.len()) as u32;

        let resolved = resolve_player(player, &mut scratch.player);

        let mut h = 0;
        'hazards: while h < hazards.len() {
            if !hazards[h].is_alive() {
                trace!("Pruning detached {:?} hazard", hazards[h].kind());
                hazards.swap_remove(h);
                report.hazards_pruned += 1;
                continue;
            }
            report.hazards_tested += 1;

            let mut p = 0;
            while p < projectiles.len() {
                let projectile = &projectiles[p];
                let (center, radius) = world_circle(
                    projectile.entity().as_ref(),
                    projectile.offset(),
                    projectile.radius(),
                );
                if hazard_hits_circle(&hazards[h], center, radius) {
                    if player.notify_projectile_hit(&hazards[h]) {
                        let projectile = projectiles.swap_remove(p);
                        let hazard = hazards.swap_remove(h);
                        consume(config, &projectile, &hazard);
                        report.projectile_hits += 1;
                        // The slot now holds an unvisited hazard
                        continue 'hazards;
                    }
                    report.projectile_contacts_declined += 1;
                }
                p += 1;
            }

            if hazard_hits_player(&hazards[h], resolved, &mut scratch.hazard) {
                trace!(
                    "Player hit by {:?} hazard (damage {})",
                    hazards[h].kind(),
                    hazards[h].info().damage
                );
                player.notify_hazard_hit(&hazards[h]);
                report.hazard_hits += 1;
            }
            h += 1;
        }

        let mut i = 0;
        while i < powerups.len() {
            let powerup = &powerups[i];
            if !powerup.entity().is_attached() {
                powerups.swap_remove(i);
                report.powerups_pruned += 1;
                continue;
            }
            let (center, radius) =
                world_circle(powerup.entity().as_ref(), powerup.offset(), powerup.radius());
            if player_hits_circle(resolved, center, radius) {
                trace!("Power-up collected");
                powerups[i].notify_pickup(player);
                powerups.swap_remove(i);
                report.pickups += 1;
                continue;
            }
            i += 1;
        }

        if report.had_contact() || report.pruned() > 0 {
            debug!(
                "Collision pass: {} projectile hits, {} hazard hits, {} pickups, {} pruned",
                report.projectile_hits,
                report.hazard_hits,
                report.pickups,
                report.pruned()
            );
        }
        report
    }
}

/// Remove a consumed projectile/hazard pair's entities from the scene.
///
/// The hazard's own entities are left to the projectile delegate.
fn consume(config: &CollisionConfig, projectile: &ProjectileEntry, hazard: &HazardEntry) {
    trace!(
        "Projectile consumed {:?} hazard (score {:?})",
        hazard.kind(),
        hazard.info().projectile_score
    );
    if config.detach_consumed_projectiles {
        projectile.entity().detach();
    }
    if config.detach_companions {
        for companion in hazard.info().live_companions() {
            companion.detach();
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
