//! Shape Resolution and Dispatch
//!
//! Turns registered entries into world-space geometry for one pass and picks
//! the narrow-phase primitive for each (player shape, hazard shape) pair.
//!
//! | player \ hazard | Circle | Capsule (both kinds) | Polygon |
//! |-----------------|--------|----------------------|---------|
//! | Circle          | circle/circle | capsule/circle | circle vs polygon in hazard-local space |
//! | Polygon         | polygon/circle | polygon/capsule | polygon/polygon in world space |

use tracing::debug;

use crate::core::geometry::{
    capsule_circle_overlap, circles_overlap, polygon_capsule_overlap, polygon_circle_overlap,
    polygon_polygon_overlap,
};
use crate::core::vec2::Vec2;
use crate::scene::SceneNode;
use super::entry::{
    HazardEntry, HazardShape, PlayerEntry, PlayerShape, MAX_HAZARD_VERTICES, MAX_PLAYER_VERTICES,
};

/// Fixed scratch space for world-space polygons, reused every pass.
#[derive(Debug, Clone)]
pub struct ScratchBuffers {
    pub(crate) player: [Vec2; MAX_PLAYER_VERTICES],
    pub(crate) hazard: [Vec2; MAX_HAZARD_VERTICES],
}

impl Default for ScratchBuffers {
    fn default() -> Self {
        Self {
            player: [Vec2::ZERO; MAX_PLAYER_VERTICES],
            hazard: [Vec2::ZERO; MAX_HAZARD_VERTICES],
        }
    }
}

/// The player's shape in world space for the current pass.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedPlayer<'a> {
    /// World center and scaled radius
    Circle {
        /// Center
        center: Vec2,
        /// Radius
        radius: f32,
    },
    /// World-space vertex loop
    Polygon(&'a [Vec2]),
}

/// World center and radius of a circle attached to `entity`.
#[inline]
pub fn world_circle(entity: &dyn SceneNode, offset: Vec2, radius: f32) -> (Vec2, f32) {
    (entity.to_world(offset), radius * entity.combined_scale())
}

/// Resolve the player into world space, writing polygon vertices into `buffer`.
pub fn resolve_player<'a>(
    player: &PlayerEntry,
    buffer: &'a mut [Vec2; MAX_PLAYER_VERTICES],
) -> ResolvedPlayer<'a> {
    let entity = player.entity();
    match player.shape() {
        PlayerShape::Circle { offset, radius } => {
            let (center, radius) = world_circle(entity.as_ref(), *offset, *radius);
            ResolvedPlayer::Circle { center, radius }
        }
        PlayerShape::Polygon { points } => {
            let count = points.len().min(MAX_PLAYER_VERTICES);
            for (slot, point) in buffer.iter_mut().zip(points.iter()) {
                *slot = entity.to_world(*point);
            }
            ResolvedPlayer::Polygon(&buffer[..count])
        }
    }
}

/// World endpoints and radius of a capsule hazard. `None` for circles and polygons.
fn world_capsule(hazard: &HazardEntry) -> Option<(Vec2, Vec2, f32)> {
    let entity = hazard.entity();
    match hazard.shape() {
        HazardShape::TwoOffsetCapsule { start, end, radius } => Some((
            entity.to_world(*start),
            entity.to_world(*end),
            radius * entity.combined_scale(),
        )),
        HazardShape::TwoNodeCapsule { other, offset, radius } => Some((
            entity.to_world(*offset),
            other.to_world(*offset),
            radius * entity.combined_scale().min(other.combined_scale()),
        )),
        _ => None,
    }
}

/// Does `hazard` intersect the world-space circle (`center`, `radius`)?
///
/// Used for the circle player and for every projectile.
pub fn hazard_hits_circle(hazard: &HazardEntry, center: Vec2, radius: f32) -> bool {
    let entity = hazard.entity();
    match hazard.shape() {
        HazardShape::Circle { offset, radius: local_radius } => {
            let (hazard_center, hazard_radius) =
                world_circle(entity.as_ref(), *offset, *local_radius);
            circles_overlap(center, radius, hazard_center, hazard_radius)
        }
        HazardShape::TwoOffsetCapsule { .. } | HazardShape::TwoNodeCapsule { .. } => {
            match world_capsule(hazard) {
                Some((a, b, seg_radius)) => {
                    capsule_circle_overlap(center, radius, a, b, seg_radius)
                }
                None => false,
            }
        }
        HazardShape::Polygon { offset, points } => {
            let scale = entity.combined_scale();
            if !(scale.is_finite() && scale > 0.0) {
                debug!(
                    "Polygon hazard at {} has degenerate scale {}, skipping",
                    entity.to_world(*offset),
                    scale
                );
                return false;
            }
            // Test in hazard-local space so the polygon never needs transforming
            let local_center = entity.to_local(center) - *offset;
            polygon_circle_overlap(local_center, radius / scale, points)
        }
    }
}

/// Does `hazard` intersect the world-space polygon `polygon`?
pub fn hazard_hits_polygon(
    hazard: &HazardEntry,
    polygon: &[Vec2],
    buffer: &mut [Vec2; MAX_HAZARD_VERTICES],
) -> bool {
    let entity = hazard.entity();
    match hazard.shape() {
        HazardShape::Circle { offset, radius } => {
            let (center, radius) = world_circle(entity.as_ref(), *offset, *radius);
            polygon_circle_overlap(center, radius, polygon)
        }
        HazardShape::TwoOffsetCapsule { .. } | HazardShape::TwoNodeCapsule { .. } => {
            match world_capsule(hazard) {
                Some((a, b, radius)) => polygon_capsule_overlap(a, b, radius, polygon),
                None => false,
            }
        }
        HazardShape::Polygon { offset, points } => {
            let count = points.len().min(MAX_HAZARD_VERTICES);
            for (slot, point) in buffer.iter_mut().zip(points.iter()) {
                *slot = entity.to_world(*point + *offset);
            }
            polygon_polygon_overlap(polygon, &buffer[..count])
        }
    }
}

/// Does `hazard` intersect the resolved player?
pub fn hazard_hits_player(
    hazard: &HazardEntry,
    player: ResolvedPlayer<'_>,
    buffer: &mut [Vec2; MAX_HAZARD_VERTICES],
) -> bool {
    match player {
        ResolvedPlayer::Circle { center, radius } => hazard_hits_circle(hazard, center, radius),
        ResolvedPlayer::Polygon(polygon) => hazard_hits_polygon(hazard, polygon, buffer),
    }
}

/// Does the resolved player touch the world-space circle (`center`, `radius`)?
pub fn player_hits_circle(player: ResolvedPlayer<'_>, center: Vec2, radius: f32) -> bool {
    match player {
        ResolvedPlayer::Circle { center: player_center, radius: player_radius } => {
            circles_overlap(player_center, player_radius, center, radius)
        }
        ResolvedPlayer::Polygon(polygon) => polygon_circle_overlap(center, radius, polygon),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entry::HazardInfo;
    use crate::scene::TransformNode;
    use std::f32::consts::FRAC_PI_2;

    static SQUARE: [Vec2; 4] = [
        Vec2::new(-5.0, -5.0),
        Vec2::new(5.0, -5.0),
        Vec2::new(5.0, 5.0),
        Vec2::new(-5.0, 5.0),
    ];

    fn scene() -> std::rc::Rc<TransformNode> {
        TransformNode::new("root")
    }

    #[test]
    fn test_world_circle_identity() {
        let root = scene();
        let node = TransformNode::new("n");
        root.add_child(&node);
        let (center, radius) = world_circle(node.as_ref(), Vec2::new(1.0, 2.0), 3.0);
        assert_eq!(center, Vec2::new(1.0, 2.0));
        assert_eq!(radius, 3.0);

        // Untransformed chain leaves polygon vertices in place
        let player = PlayerEntry::polygon(node, &SQUARE, 1.0, |_| {}, |_| false).unwrap();
        let mut scratch = ScratchBuffers::default();
        match resolve_player(&player, &mut scratch.player) {
            ResolvedPlayer::Polygon(points) => assert_eq!(points, &SQUARE[..]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_world_circle_translated() {
        let root = scene();
        let node = TransformNode::at("n", Vec2::new(10.0, 0.0));
        root.add_child(&node);
        let (center, radius) = world_circle(node.as_ref(), Vec2::new(1.0, 2.0), 3.0);
        assert_eq!(center, Vec2::new(11.0, 2.0));
        assert_eq!(radius, 3.0);
    }

    #[test]
    fn test_world_circle_scaled() {
        let root = scene();
        root.set_scale(2.0);
        let node = TransformNode::at("n", Vec2::new(5.0, 5.0));
        root.add_child(&node);
        let (center, radius) = world_circle(node.as_ref(), Vec2::ZERO, 4.0);
        assert_eq!(center, Vec2::new(10.0, 10.0));
        assert_eq!(radius, 8.0);
    }

    #[test]
    fn test_resolve_polygon_player() {
        let root = scene();
        let ship = TransformNode::at("ship", Vec2::new(100.0, 0.0));
        root.add_child(&ship);
        let player = PlayerEntry::polygon(ship, &SQUARE, 2.0, |_| {}, |_| false).unwrap();

        let mut scratch = ScratchBuffers::default();
        match resolve_player(&player, &mut scratch.player) {
            ResolvedPlayer::Polygon(points) => {
                assert_eq!(points.len(), 4);
                assert_eq!(points[0], Vec2::new(90.0, -10.0));
                assert_eq!(points[2], Vec2::new(110.0, 10.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_circle_vs_circle_hazard() {
        let root = scene();
        let rock = TransformNode::at("rock", Vec2::new(10.0, 0.0));
        root.add_child(&rock);
        let hazard = HazardEntry::circle(rock, Vec2::ZERO, 5.0, HazardInfo::new(1)).unwrap();

        assert!(hazard_hits_circle(&hazard, Vec2::ZERO, 5.0));
        assert!(!hazard_hits_circle(&hazard, Vec2::ZERO, 4.9));
    }

    #[test]
    fn test_two_offset_capsule() {
        let root = scene();
        let laser = TransformNode::new("laser");
        root.add_child(&laser);
        let hazard = HazardEntry::two_offset_capsule(
            laser.clone(),
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            1.0,
            HazardInfo::new(5),
        )
        .unwrap();

        assert!(hazard_hits_circle(&hazard, Vec2::new(50.0, 3.0), 2.0));
        assert!(!hazard_hits_circle(&hazard, Vec2::new(50.0, 3.5), 2.0));

        // Rotating the entity swings the beam
        laser.set_rotation(FRAC_PI_2);
        assert!(!hazard_hits_circle(&hazard, Vec2::new(50.0, 3.0), 2.0));
        assert!(hazard_hits_circle(&hazard, Vec2::new(1.0, 50.0), 2.0));
    }

    #[test]
    fn test_two_node_capsule_follows_both_entities() {
        let root = scene();
        let left = TransformNode::at("left", Vec2::new(-50.0, 0.0));
        let right = TransformNode::at("right", Vec2::new(50.0, 0.0));
        root.add_child(&left);
        root.add_child(&right);
        let hazard = HazardEntry::two_node_capsule(
            left,
            right.clone(),
            Vec2::ZERO,
            2.0,
            HazardInfo::new(3),
        )
        .unwrap();

        assert!(hazard_hits_circle(&hazard, Vec2::new(0.0, 4.0), 2.0));
        right.set_position(Vec2::new(-50.0, 100.0));
        assert!(!hazard_hits_circle(&hazard, Vec2::new(0.0, 4.0), 2.0));
    }

    #[test]
    fn test_two_node_capsule_uses_smaller_scale() {
        let root = scene();
        let big = TransformNode::at("big", Vec2::new(-50.0, 0.0));
        big.set_scale(4.0);
        let small = TransformNode::at("small", Vec2::new(50.0, 0.0));
        root.add_child(&big);
        root.add_child(&small);
        let hazard = HazardEntry::two_node_capsule(
            big,
            small,
            Vec2::ZERO,
            2.0,
            HazardInfo::new(1),
        )
        .unwrap();

        // Radius 2 * min(4, 1) = 2, not 8
        assert!(hazard_hits_circle(&hazard, Vec2::new(0.0, 3.0), 1.0));
        assert!(!hazard_hits_circle(&hazard, Vec2::new(0.0, 6.0), 1.0));
    }

    #[test]
    fn test_polygon_hazard_local_space() {
        let root = scene();
        let rock = TransformNode::at("rock", Vec2::new(100.0, 100.0));
        rock.set_scale(2.0);
        root.add_child(&rock);
        // Square spans 90..110 in world after scale 2
        let hazard =
            HazardEntry::polygon(rock, Vec2::ZERO, &SQUARE[..], HazardInfo::new(1)).unwrap();

        assert!(hazard_hits_circle(&hazard, Vec2::new(100.0, 100.0), 1.0));
        assert!(hazard_hits_circle(&hazard, Vec2::new(113.0, 100.0), 4.0));
        assert!(!hazard_hits_circle(&hazard, Vec2::new(113.0, 100.0), 2.0));
    }

    #[test]
    fn test_polygon_offset_applied() {
        let root = scene();
        let rock = TransformNode::new("rock");
        root.add_child(&rock);
        let hazard = HazardEntry::polygon(
            rock,
            Vec2::new(20.0, 0.0),
            &SQUARE[..],
            HazardInfo::new(1),
        )
        .unwrap();

        assert!(!hazard_hits_circle(&hazard, Vec2::ZERO, 1.0));
        assert!(hazard_hits_circle(&hazard, Vec2::new(20.0, 0.0), 1.0));

        let mut buffer = [Vec2::ZERO; MAX_HAZARD_VERTICES];
        let near_origin = [Vec2::new(-1.0, -1.0), Vec2::new(1.0, -1.0), Vec2::new(0.0, 1.0)];
        assert!(!hazard_hits_polygon(&hazard, &near_origin, &mut buffer));
        // Straddles the square's right edge at x = 25
        let near_offset = [Vec2::new(24.0, -1.0), Vec2::new(27.0, -1.0), Vec2::new(26.0, 1.0)];
        assert!(hazard_hits_polygon(&hazard, &near_offset, &mut buffer));
    }

    #[test]
    fn test_zero_scale_polygon_never_hits() {
        let root = scene();
        let rock = TransformNode::new("rock");
        rock.set_scale(0.0);
        root.add_child(&rock);
        let hazard =
            HazardEntry::polygon(rock, Vec2::ZERO, &SQUARE[..], HazardInfo::new(1)).unwrap();
        assert!(!hazard_hits_circle(&hazard, Vec2::ZERO, 10.0));
    }

    #[test]
    fn test_polygon_player_dispatch() {
        let root = scene();
        let ship = TransformNode::new("ship");
        let rock = TransformNode::at("rock", Vec2::new(12.0, 0.0));
        let beam = TransformNode::at("beam", Vec2::new(0.0, 20.0));
        root.add_child(&ship);
        root.add_child(&rock);
        root.add_child(&beam);
        let player = PlayerEntry::polygon(ship, &SQUARE, 1.0, |_| {}, |_| false).unwrap();

        let circle = HazardEntry::circle(rock, Vec2::ZERO, 7.0, HazardInfo::new(1)).unwrap();
        let capsule = HazardEntry::two_offset_capsule(
            beam,
            Vec2::new(-30.0, 0.0),
            Vec2::new(30.0, 0.0),
            2.0,
            HazardInfo::new(1),
        )
        .unwrap();

        let mut scratch = ScratchBuffers::default();
        let resolved = resolve_player(&player, &mut scratch.player);
        assert!(hazard_hits_player(&circle, resolved, &mut scratch.hazard));
        assert!(!hazard_hits_player(&capsule, resolved, &mut scratch.hazard));
        assert!(player_hits_circle(resolved, Vec2::new(0.0, 8.0), 3.0));
        assert!(!player_hits_circle(resolved, Vec2::new(0.0, 9.0), 3.0));
    }
}
