//! Narrow-Phase Geometry
//!
//! Boolean intersection tests between circles, capsules and polygons.
//! Every function works in a single shared 2D space; callers transform
//! shapes into that space first. No contact points or normals are produced.
//!
//! Polygons are closed loops (the last vertex connects back to the first).
//! A polygon with fewer than 3 points never intersects anything.

use tracing::warn;

use super::vec2::Vec2;

/// Check if two circles overlap (touching counts).
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    let combined_radius = radius_a + radius_b;
    pos_a.distance_squared(pos_b) <= combined_radius * combined_radius
}

/// Check if a circle overlaps a capsule (segment `seg_a`-`seg_b` thickened by `seg_radius`).
///
/// The circle center is projected onto the segment; outside the segment the
/// nearer endpoint is used. A zero-length segment degenerates to
/// [`circles_overlap`].
pub fn capsule_circle_overlap(
    point: Vec2,
    radius: f32,
    seg_a: Vec2,
    seg_b: Vec2,
    seg_radius: f32,
) -> bool {
    let combined_radius = radius + seg_radius;
    let combined_radius_sq = combined_radius * combined_radius;

    let seg = seg_b - seg_a;
    let seg_len_sq = seg.length_squared();
    if seg_len_sq == 0.0 {
        return point.distance_squared(seg_a) <= combined_radius_sq;
    }

    // Projection parameter scaled by |seg|^2, so [0, 1] maps to [0, seg_len_sq]
    let projection = (point - seg_a).dot(seg);
    if projection < 0.0 {
        return point.distance_squared(seg_a) <= combined_radius_sq;
    }
    if projection > seg_len_sq {
        return point.distance_squared(seg_b) <= combined_radius_sq;
    }

    let foot = seg_a + seg * (projection / seg_len_sq);
    foot.distance_squared(point) <= combined_radius_sq
}

/// Exact segment/segment crossing test (touching counts).
///
/// Each segment's endpoints must straddle the other's supporting line.
/// Collinear segments cross only when their extents overlap.
pub fn segments_cross(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let dir_a = a2 - a1;
    let dir_b = b2 - b1;

    let side_b1 = (b1 - a1).cross(dir_a);
    let side_b2 = (b2 - a1).cross(dir_a);
    let side_a1 = (a1 - b1).cross(dir_b);
    let side_a2 = (a2 - b1).cross(dir_b);

    if side_b1 == 0.0 && side_b2 == 0.0 && side_a1 == 0.0 && side_a2 == 0.0 {
        return extents_overlap(a1, a2, b1, b2);
    }

    side_b1 * side_b2 <= 0.0 && side_a1 * side_a2 <= 0.0
}

/// Axis-aligned extent overlap of two segments. Exact for collinear segments.
fn extents_overlap(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let (a_min, a_max) = (a1.min(a2), a1.max(a2));
    let (b_min, b_max) = (b1.min(b2), b1.max(b2));
    a_min.x <= b_max.x && b_min.x <= a_max.x && a_min.y <= b_max.y && b_min.y <= a_max.y
}

/// Check if two capsules overlap.
///
/// Crossing segments always overlap. Otherwise the closest approach of two
/// segments is reached at one of the four endpoints, so each endpoint is
/// tested against the other capsule.
pub fn capsule_capsule_overlap(
    a1: Vec2,
    a2: Vec2,
    radius_a: f32,
    b1: Vec2,
    b2: Vec2,
    radius_b: f32,
) -> bool {
    if segments_cross(a1, a2, b1, b2) {
        return true;
    }

    capsule_circle_overlap(a1, radius_a, b1, b2, radius_b)
        || capsule_circle_overlap(a2, radius_a, b1, b2, radius_b)
        || capsule_circle_overlap(b1, radius_b, a1, a2, radius_a)
        || capsule_circle_overlap(b2, radius_b, a1, a2, radius_a)
}

/// Check if a circle overlaps a polygon.
///
/// One pass over the edges runs two tests at once: the shell test (each edge
/// as a zero-radius capsule) and a horizontal ray-crossing count for the
/// circle center. Coincident-vertex edges are skipped.
pub fn polygon_circle_overlap(center: Vec2, radius: f32, polygon: &[Vec2]) -> bool {
    if !has_enough_points(polygon) {
        return false;
    }

    let mut inside = false;
    for (p1, p2) in edges(polygon) {
        if p1 == p2 {
            continue;
        }
        if capsule_circle_overlap(center, radius, p1, p2, 0.0) {
            return true;
        }
        if ray_crosses_edge(center, p1, p2) {
            inside = !inside;
        }
    }

    inside
}

/// Check if a capsule overlaps a polygon.
///
/// Shell test uses the full capsule/edge test; containment is evaluated
/// independently for both capsule endpoints.
pub fn polygon_capsule_overlap(seg_a: Vec2, seg_b: Vec2, radius: f32, polygon: &[Vec2]) -> bool {
    if !has_enough_points(polygon) {
        return false;
    }

    let mut inside_a = false;
    let mut inside_b = false;
    for (p1, p2) in edges(polygon) {
        if p1 == p2 {
            continue;
        }
        if capsule_capsule_overlap(seg_a, seg_b, radius, p1, p2, 0.0) {
            return true;
        }
        if ray_crosses_edge(seg_a, p1, p2) {
            inside_a = !inside_a;
        }
        if ray_crosses_edge(seg_b, p1, p2) {
            inside_b = !inside_b;
        }
    }

    inside_a || inside_b
}

/// Check if two polygons overlap by testing every edge pair for a crossing.
///
/// There is no containment fallback: gameplay polygons are thin strips that
/// always cross an edge when they overlap.
pub fn polygon_polygon_overlap(polygon_a: &[Vec2], polygon_b: &[Vec2]) -> bool {
    if !has_enough_points(polygon_a) || !has_enough_points(polygon_b) {
        return false;
    }

    for (a1, a2) in edges(polygon_a) {
        if a1 == a2 {
            continue;
        }
        for (b1, b2) in edges(polygon_b) {
            if b1 == b2 {
                continue;
            }
            if segments_cross(a1, a2, b1, b2) {
                return true;
            }
        }
    }

    false
}

/// Closed-loop edge iterator: (p[0], p[1]), ..., (p[n-1], p[0]).
#[inline]
fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Does the ray from `origin` towards +X cross edge `p1`-`p2`?
///
/// The edge is clipped to `x >= origin.x` first, then checked for straddling
/// the ray's y.
#[inline]
fn ray_crosses_edge(origin: Vec2, mut p1: Vec2, mut p2: Vec2) -> bool {
    if p1.x < origin.x && p2.x < origin.x {
        return false;
    }
    if p1.x < origin.x {
        p1 = p2 + (p1 - p2) * ((origin.x - p2.x) / (p1.x - p2.x));
    } else if p2.x < origin.x {
        p2 = p1 + (p2 - p1) * ((origin.x - p1.x) / (p2.x - p1.x));
    }
    (p1.y >= origin.y) != (p2.y >= origin.y)
}

fn has_enough_points(polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        warn!("Polygon has {} points (fewer than 3), treating as no collision", polygon.len());
        return false;
    }
    true
}

// =============================================================================
// TESTS
// =============================================================================
