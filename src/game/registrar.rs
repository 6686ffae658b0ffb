//! Deferred Registration
//!
//! Outcome delegates run while the world is mid-pass, so they cannot borrow
//! it. They register new entities through a [`Registrar`] instead; queued
//! registrations are applied by the world before and after every pass.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::entry::{HazardEntry, PlayerEntry, PowerupEntry, ProjectileEntry};

/// A registration waiting to be applied.
#[derive(Debug)]
pub(crate) enum Registration {
    Player(PlayerEntry),
    Hazard(HazardEntry),
    Powerup(PowerupEntry),
    Projectile(ProjectileEntry),
}

/// Cloneable handle queueing registrations for a [`CollisionWorld`](super::world::CollisionWorld).
#[derive(Clone, Default)]
pub struct Registrar {
    queue: Rc<RefCell<Vec<Registration>>>,
}

impl Registrar {
    /// Queue a player replacement.
    pub fn set_player(&self, entry: PlayerEntry) {
        self.push(Registration::Player(entry));
    }

    /// Queue a hazard.
    pub fn add_hazard(&self, entry: HazardEntry) {
        self.push(Registration::Hazard(entry));
    }

    /// Queue a power-up.
    pub fn add_powerup(&self, entry: PowerupEntry) {
        self.push(Registration::Powerup(entry));
    }

    /// Queue a projectile.
    pub fn add_projectile(&self, entry: ProjectileEntry) {
        self.push(Registration::Projectile(entry));
    }

    /// Registrations waiting to be applied.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Drop everything queued.
    pub fn discard(&self) {
        self.queue.borrow_mut().clear();
    }

    /// Drop queued hazards, power-ups and projectiles, keeping a queued player.
    pub(crate) fn discard_entities(&self) {
        self.queue
            .borrow_mut()
            .retain(|registration| matches!(registration, Registration::Player(_)));
    }

    fn push(&self, registration: Registration) {
        self.queue.borrow_mut().push(registration);
    }

    /// Take the queue, leaving it empty.
    pub(crate) fn drain(&self) -> Vec<Registration> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }
}

impl fmt::Debug for Registrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registrar")
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::scene::TransformNode;

    #[test]
    fn test_clones_share_queue() {
        let registrar = Registrar::default();
        let handle = registrar.clone();

        let node = TransformNode::new("bullet");
        handle.add_projectile(ProjectileEntry::new(node, Vec2::ZERO, 1.0).unwrap());
        assert_eq!(registrar.pending(), 1);

        let drained = registrar.drain();
        assert_eq!(drained.len(), 1);
        assert!(matches!(drained[0], Registration::Projectile(_)));
        assert_eq!(handle.pending(), 0);
    }

    #[test]
    fn test_discard_entities_keeps_player() {
        let registrar = Registrar::default();
        let ship = TransformNode::new("ship");
        let gem = TransformNode::new("gem");
        registrar.add_powerup(PowerupEntry::new(gem.clone(), Vec2::ZERO, 2.0, |_| {}).unwrap());
        let player = PlayerEntry::circle(ship, Vec2::ZERO, 5.0, |_| {}, |_| false).unwrap();
        registrar.set_player(player);
        registrar.add_projectile(ProjectileEntry::new(gem, Vec2::ZERO, 1.0).unwrap());

        registrar.discard_entities();
        let drained = registrar.drain();
        assert_eq!(drained.len(), 1);
        assert!(matches!(drained[0], Registration::Player(_)));
    }

    #[test]
    fn test_discard() {
        let registrar = Registrar::default();
        let node = TransformNode::new("gem");
        registrar.add_powerup(PowerupEntry::new(node, Vec2::ZERO, 2.0, |_| {}).unwrap());
        registrar.discard();
        assert_eq!(registrar.pending(), 0);
        assert_eq!(format!("{registrar:?}"), "Registrar { pending: 0 }");
    }
}
