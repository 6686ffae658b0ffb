//! Registry Entries
//!
//! Records registered with the collision world. Every entry keeps a strong
//! reference to its backing scene entity for as long as it is registered;
//! scene attachment decides whether the entry is still alive.

use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::core::vec2::Vec2;
use crate::scene::{NodeRef, WeakNodeRef};
use super::error::{CollisionError, check_radius, check_vertex_count};

/// Capacity of the player's world-space polygon buffer.
pub const MAX_PLAYER_VERTICES: usize = 40;

/// Capacity of the hazard's world-space polygon buffer.
pub const MAX_HAZARD_VERTICES: usize = 32;

// =============================================================================
// SHAPES
// =============================================================================

/// Collision shape family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Offset + radius
    Circle,
    /// Two offsets on one entity + radius
    TwoOffsetCapsule,
    /// One offset applied on two entities + radius
    TwoNodeCapsule,
    /// Closed vertex loop
    Polygon,
}

/// Hazard shape in the entity's local space.
#[derive(Clone, Debug)]
pub enum HazardShape {
    /// Circle centered at `offset`.
    Circle {
        /// Center in local space
        offset: Vec2,
        /// Radius in local units
        radius: f32,
    },
    /// Capsule between two local points of the same entity.
    TwoOffsetCapsule {
        /// First endpoint in local space
        start: Vec2,
        /// Second endpoint in local space
        end: Vec2,
        /// Radius in local units
        radius: f32,
    },
    /// Capsule stretched between the primary entity and `other`.
    TwoNodeCapsule {
        /// Entity carrying the second endpoint
        other: NodeRef,
        /// Offset applied in both entities' local spaces
        offset: Vec2,
        /// Radius in local units
        radius: f32,
    },
    /// Polygon whose vertices are relative to `offset`.
    Polygon {
        /// Anchor offset in local space
        offset: Vec2,
        /// Vertex loop, borrowed from a static table or owned
        points: Cow<'static, [Vec2]>,
    },
}

impl HazardShape {
    /// Shape family.
    pub fn kind(&self) -> ShapeKind {
        match self {
            HazardShape::Circle { .. } => ShapeKind::Circle,
            HazardShape::TwoOffsetCapsule { .. } => ShapeKind::TwoOffsetCapsule,
            HazardShape::TwoNodeCapsule { .. } => ShapeKind::TwoNodeCapsule,
            HazardShape::Polygon { .. } => ShapeKind::Polygon,
        }
    }
}

// =============================================================================
// HAZARD
// =============================================================================

/// Gameplay data carried by a hazard and read by the outcome delegates.
#[derive(Clone, Debug, Default)]
pub struct HazardInfo {
    /// Damage dealt to the player on contact
    pub damage: i32,
    /// Score for destroying it with a projectile; `None` if projectiles cannot destroy it
    pub projectile_score: Option<i32>,
    /// Remove the hazard on contact even when the player cannot be hurt
    pub delete_anyway: bool,
    /// Damage goes through the player's shield
    pub penetrates_shield: bool,
    /// Entities removed together with this hazard
    pub companions: [Option<WeakNodeRef>; 2],
}

impl HazardInfo {
    /// Hazard dealing `damage`, indestructible by projectiles.
    pub fn new(damage: i32) -> Self {
        Self {
            damage,
            ..Self::default()
        }
    }

    /// Allow projectiles to destroy the hazard for `score` points.
    pub fn with_projectile_score(mut self, score: i32) -> Self {
        self.projectile_score = Some(score);
        self
    }

    /// Mark the hazard for removal on any player contact.
    pub fn with_delete_anyway(mut self) -> Self {
        self.delete_anyway = true;
        self
    }

    /// Let the hazard's damage bypass shields.
    pub fn with_shield_penetration(mut self) -> Self {
        self.penetrates_shield = true;
        self
    }

    /// Observe `companion` weakly; it is removed together with the hazard.
    pub fn with_companion(mut self, companion: NodeRef) -> Self {
        match self.companions.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => *slot = Some(Rc::downgrade(&companion)),
            None => warn!("Hazard already has two companions, ignoring extra companion"),
        }
        self
    }

    /// Can a projectile destroy this hazard?
    #[inline]
    pub fn is_destructible(&self) -> bool {
        self.projectile_score.is_some()
    }

    /// Companions that are still alive.
    pub fn live_companions(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.companions
            .iter()
            .filter_map(|slot| slot.as_ref().and_then(|weak| weak.upgrade()))
    }
}

/// A registered hazard.
#[derive(Clone, Debug)]
pub struct HazardEntry {
    entity: NodeRef,
    shape: HazardShape,
    info: HazardInfo,
}

impl HazardEntry {
    /// Circle hazard.
    pub fn circle(
        entity: NodeRef,
        offset: Vec2,
        radius: f32,
        info: HazardInfo,
    ) -> Result<Self, CollisionError> {
        let radius = check_radius(radius)?;
        Ok(Self {
            entity,
            shape: HazardShape::Circle { offset, radius },
            info,
        })
    }

    /// Capsule between two local points of `entity`.
    pub fn two_offset_capsule(
        entity: NodeRef,
        start: Vec2,
        end: Vec2,
        radius: f32,
        info: HazardInfo,
    ) -> Result<Self, CollisionError> {
        let radius = check_radius(radius)?;
        Ok(Self {
            entity,
            shape: HazardShape::TwoOffsetCapsule { start, end, radius },
            info,
        })
    }

    /// Capsule between `entity` and `other`, both displaced by `offset`.
    pub fn two_node_capsule(
        entity: NodeRef,
        other: NodeRef,
        offset: Vec2,
        radius: f32,
        info: HazardInfo,
    ) -> Result<Self, CollisionError> {
        let radius = check_radius(radius)?;
        Ok(Self {
            entity,
            shape: HazardShape::TwoNodeCapsule { other, offset, radius },
            info,
        })
    }

    /// Polygon hazard. Static slices are borrowed, vectors are owned.
    pub fn polygon(
        entity: NodeRef,
        offset: Vec2,
        points: impl Into<Cow<'static, [Vec2]>>,
        info: HazardInfo,
    ) -> Result<Self, CollisionError> {
        let points = points.into();
        check_vertex_count("hazard", points.len(), MAX_HAZARD_VERTICES)?;
        if points.len() < 3 {
            warn!("Registering hazard polygon with {} points (fewer than 3)", points.len());
        }
        Ok(Self {
            entity,
            shape: HazardShape::Polygon { offset, points },
            info,
        })
    }

    /// Polygon hazard owning a copy of `points`.
    pub fn polygon_copied(
        entity: NodeRef,
        offset: Vec2,
        points: &[Vec2],
        info: HazardInfo,
    ) -> Result<Self, CollisionError> {
        Self::polygon(entity, offset, points.to_vec(), info)
    }

    /// Shape family.
    #[inline]
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Primary backing entity.
    #[inline]
    pub fn entity(&self) -> &NodeRef {
        &self.entity
    }

    /// Second endpoint entity of a two-node capsule.
    pub fn secondary_entity(&self) -> Option<&NodeRef> {
        match &self.shape {
            HazardShape::TwoNodeCapsule { other, .. } => Some(other),
            _ => None,
        }
    }

    /// Local shape.
    #[inline]
    pub fn shape(&self) -> &HazardShape {
        &self.shape
    }

    /// Gameplay data.
    #[inline]
    pub fn info(&self) -> &HazardInfo {
        &self.info
    }

    /// Local radius, `None` for polygons.
    pub fn radius(&self) -> Option<f32> {
        match &self.shape {
            HazardShape::Circle { radius, .. }
            | HazardShape::TwoOffsetCapsule { radius, .. }
            | HazardShape::TwoNodeCapsule { radius, .. } => Some(*radius),
            HazardShape::Polygon { .. } => None,
        }
    }

    /// Local vertex loop, `None` for radius-based shapes.
    pub fn polygon_points(&self) -> Option<&[Vec2]> {
        match &self.shape {
            HazardShape::Polygon { points, .. } => Some(&**points),
            _ => None,
        }
    }

    /// Does the entry own its vertex list (as opposed to borrowing a static table)?
    pub fn is_polygon_owned(&self) -> bool {
        matches!(&self.shape, HazardShape::Polygon { points: Cow::Owned(_), .. })
    }

    /// Both backing entities (where present) are still in the scene.
    pub fn is_alive(&self) -> bool {
        self.entity.is_attached()
            && self.secondary_entity().map_or(true, |other| other.is_attached())
    }

    /// Remove the hazard's entities and companions from the scene.
    ///
    /// Intended for outcome delegates; the entry itself is pruned on the next pass.
    pub fn detach_all(&self) {
        self.entity.detach();
        if let Some(other) = self.secondary_entity() {
            other.detach();
        }
        for companion in self.info.live_companions() {
            companion.detach();
        }
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// Delegate invoked when the player touches a hazard.
pub type HazardHitFn = Box<dyn FnMut(&HazardEntry)>;

/// Delegate invoked when a projectile touches a hazard; `true` consumes both.
pub type ProjectileHitFn = Box<dyn FnMut(&HazardEntry) -> bool>;

/// Delegate invoked when the player collects a power-up.
pub type PickupFn = Box<dyn FnMut(&PlayerEntry)>;

/// Player shape in the player entity's local space.
#[derive(Clone, Debug)]
pub enum PlayerShape {
    /// Circle centered at `offset`.
    Circle {
        /// Center in local space
        offset: Vec2,
        /// Radius in local units
        radius: f32,
    },
    /// Pre-scaled vertex loop.
    Polygon {
        /// Vertices in local space
        points: Vec<Vec2>,
    },
}

/// The registered player.
pub struct PlayerEntry {
    entity: NodeRef,
    shape: PlayerShape,
    on_hazard_hit: HazardHitFn,
    on_projectile_hit: ProjectileHitFn,
}

impl PlayerEntry {
    /// Circle player.
    pub fn circle(
        entity: NodeRef,
        offset: Vec2,
        radius: f32,
        on_hazard_hit: impl FnMut(&HazardEntry) + 'static,
        on_projectile_hit: impl FnMut(&HazardEntry) -> bool + 'static,
    ) -> Result<Self, CollisionError> {
        let radius = check_radius(radius)?;
        Ok(Self {
            entity,
            shape: PlayerShape::Circle { offset, radius },
            on_hazard_hit: Box::new(on_hazard_hit),
            on_projectile_hit: Box::new(on_projectile_hit),
        })
    }

    /// Polygon player. Vertices are copied and multiplied by `scale`.
    pub fn polygon(
        entity: NodeRef,
        points: &[Vec2],
        scale: f32,
        on_hazard_hit: impl FnMut(&HazardEntry) + 'static,
        on_projectile_hit: impl FnMut(&HazardEntry) -> bool + 'static,
    ) -> Result<Self, CollisionError> {
        check_vertex_count("player", points.len(), MAX_PLAYER_VERTICES)?;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(CollisionError::InvalidScale(scale));
        }
        if points.len() < 3 {
            warn!("Registering player polygon with {} points (fewer than 3)", points.len());
        }
        Ok(Self {
            entity,
            shape: PlayerShape::Polygon {
                points: points.iter().map(|p| p.scale(scale)).collect(),
            },
            on_hazard_hit: Box::new(on_hazard_hit),
            on_projectile_hit: Box::new(on_projectile_hit),
        })
    }

    /// Shape family (`Circle` or `Polygon`).
    pub fn kind(&self) -> ShapeKind {
        match self.shape {
            PlayerShape::Circle { .. } => ShapeKind::Circle,
            PlayerShape::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// Backing entity.
    #[inline]
    pub fn entity(&self) -> &NodeRef {
        &self.entity
    }

    /// Local shape.
    #[inline]
    pub fn shape(&self) -> &PlayerShape {
        &self.shape
    }

    pub(crate) fn notify_hazard_hit(&mut self, hazard: &HazardEntry) {
        (self.on_hazard_hit)(hazard);
    }

    pub(crate) fn notify_projectile_hit(&mut self, hazard: &HazardEntry) -> bool {
        (self.on_projectile_hit)(hazard)
    }
}

impl fmt::Debug for PlayerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerEntry")
            .field("entity", &self.entity)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// POWER-UPS AND PROJECTILES
// =============================================================================

/// A registered power-up. Picked up at most once.
pub struct PowerupEntry {
    entity: NodeRef,
    offset: Vec2,
    radius: f32,
    on_pickup: PickupFn,
}

impl PowerupEntry {
    /// Circle power-up.
    pub fn new(
        entity: NodeRef,
        offset: Vec2,
        radius: f32,
        on_pickup: impl FnMut(&PlayerEntry) + 'static,
    ) -> Result<Self, CollisionError> {
        let radius = check_radius(radius)?;
        Ok(Self {
            entity,
            offset,
            radius,
            on_pickup: Box::new(on_pickup),
        })
    }

    /// Backing entity.
    #[inline]
    pub fn entity(&self) -> &NodeRef {
        &self.entity
    }

    /// Center in local space.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Radius in local units.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub(crate) fn notify_pickup(&mut self, player: &PlayerEntry) {
        (self.on_pickup)(player);
    }
}

impl fmt::Debug for PowerupEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerupEntry")
            .field("entity", &self.entity)
            .field("offset", &self.offset)
            .field("radius", &self.radius)
            .finish_non_exhaustive()
    }
}

/// A registered projectile. Only ever tested against hazards.
#[derive(Clone, Debug)]
pub struct ProjectileEntry {
    entity: NodeRef,
    offset: Vec2,
    radius: f32,
}

impl ProjectileEntry {
    /// Circle projectile.
    pub fn new(entity: NodeRef, offset: Vec2, radius: f32) -> Result<Self, CollisionError> {
        let radius = check_radius(radius)?;
        Ok(Self { entity, offset, radius })
    }

    /// Backing entity.
    #[inline]
    pub fn entity(&self) -> &NodeRef {
        &self.entity
    }

    /// Center in local space.
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Radius in local units.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

// =============================================================================
// TESTS
// =============================================================================
