//! Scene Collaborator
//!
//! The collision engine does not own a scene graph. It only needs a handful
//! of services from whatever spatial hierarchy the game uses:
//!
//! - world-space position of a local point
//! - the inverse (world point into local space)
//! - combined ancestor scale
//! - whether the entity is still attached to the scene
//! - detaching an entity (used for consumed projectiles and companions)
//!
//! [`TransformNode`] is a small reference hierarchy implementing those
//! services; games embedding the engine implement [`SceneNode`] for their own
//! node type instead.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::vec2::Vec2;

pub mod node;

pub use node::{Transform, TransformNode};

/// Spatial entity as seen by the collision engine.
pub trait SceneNode: fmt::Debug {
    /// Is the entity still attached to a parent in the scene?
    ///
    /// A detached entity is treated as dead even though the engine may still
    /// hold a strong reference to it.
    fn is_attached(&self) -> bool;

    /// Transform a point from this entity's local space to world space.
    fn to_world(&self, local: Vec2) -> Vec2;

    /// Transform a world-space point into this entity's local space.
    fn to_local(&self, world: Vec2) -> Vec2;

    /// Product of this entity's scale and every ancestor's scale.
    fn combined_scale(&self) -> f32;

    /// Remove the entity from its parent.
    fn detach(&self);
}

/// Strong, shared reference to a scene entity.
pub type NodeRef = Rc<dyn SceneNode>;

/// Non-owning observation of a scene entity.
pub type WeakNodeRef = Weak<dyn SceneNode>;
