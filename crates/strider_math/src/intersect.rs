//! Triangle/box overlap tests
//!
//! Separating axis test after Akenine-Möller: the 3 box face normals, the
//! triangle normal and the 9 edge/axis cross products. Every comparison is
//! inclusive so a triangle that only touches a box face still overlaps it.

use crate::bounds::Rect2;
use crate::point::WorldPoint;

/// Half-height used when a planar rectangle is lifted into a box
const COLUMN_HALF_HEIGHT: f32 = 1.0e6;

#[inline]
fn dot(a: WorldPoint, b: WorldPoint) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

#[inline]
fn cross(a: WorldPoint, b: WorldPoint) -> WorldPoint {
    WorldPoint::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

/// True when the projections of the triangle and box on `axis` are disjoint
#[inline]
fn separated_on(axis: WorldPoint, v: &[WorldPoint; 3], half: WorldPoint) -> bool {
    let p0 = dot(v[0], axis);
    let p1 = dot(v[1], axis);
    let p2 = dot(v[2], axis);
    let r = half.x * axis.x.abs() + half.y * axis.y.abs() + half.z * axis.z.abs();
    p0.min(p1).min(p2) > r || p0.max(p1).max(p2) < -r
}

fn plane_box_overlap(normal: WorldPoint, vert: WorldPoint, half: WorldPoint) -> bool {
    let mut vmin = WorldPoint::ZERO;
    let mut vmax = WorldPoint::ZERO;

    for (n, h, lo, hi, v) in [
        (normal.x, half.x, &mut vmin.x, &mut vmax.x, vert.x),
        (normal.y, half.y, &mut vmin.y, &mut vmax.y, vert.y),
        (normal.z, half.z, &mut vmin.z, &mut vmax.z, vert.z),
    ] {
        if n > 0.0 {
            *lo = -h - v;
            *hi = h - v;
        } else {
            *lo = h - v;
            *hi = -h - v;
        }
    }

    if dot(normal, vmin) > 0.0 {
        return false;
    }
    dot(normal, vmax) >= 0.0
}

/// Test a triangle against an axis-aligned box given by center and half-size
pub fn triangle_box_overlap(
    a: WorldPoint,
    b: WorldPoint,
    c: WorldPoint,
    box_center: WorldPoint,
    box_half: WorldPoint,
) -> bool {
    let v = [a - box_center, b - box_center, c - box_center];
    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];

    const AXES: [WorldPoint; 3] = [
        WorldPoint::new(1.0, 0.0, 0.0),
        WorldPoint::new(0.0, 1.0, 0.0),
        WorldPoint::new(0.0, 0.0, 1.0),
    ];

    for edge in edges {
        for axis in AXES {
            if separated_on(cross(edge, axis), &v, box_half) {
                return false;
            }
        }
    }

    for axis in AXES {
        if separated_on(axis, &v, box_half) {
            return false;
        }
    }

    let normal = cross(edges[0], edges[1]);
    plane_box_overlap(normal, v[0], box_half)
}

/// Test a triangle against an infinitely tall column over a ground rectangle
pub fn triangle_rect_overlap(a: WorldPoint, b: WorldPoint, c: WorldPoint, rect: &Rect2) -> bool {
    let (cx, cy) = rect.center();
    let center = WorldPoint::new(cx, cy, 0.0);
    let half = WorldPoint::new(rect.width() * 0.5, rect.height() * 0.5, COLUMN_HALF_HEIGHT);
    triangle_box_overlap(a, b, c, center, half)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> (WorldPoint, WorldPoint, WorldPoint) {
        (
            WorldPoint::new(0.0, 0.0, 0.0),
            WorldPoint::new(2.0, 0.0, 0.0),
            WorldPoint::new(0.0, 2.0, 0.0),
        )
    }

    #[test]
    fn test_overlap_inside() {
        let (a, b, c) = tri();
        assert!(triangle_rect_overlap(a, b, c, &Rect2::new(0.5, 0.5, 0.7, 0.7)));
    }

    #[test]
    fn test_no_overlap_beyond_hypotenuse() {
        let (a, b, c) = tri();
        // Inside the bounding box but past the slanted edge
        assert!(!triangle_rect_overlap(a, b, c, &Rect2::new(1.6, 1.6, 1.9, 1.9)));
    }

    #[test]
    fn test_touching_edge_counts() {
        let (a, b, c) = tri();
        assert!(triangle_rect_overlap(a, b, c, &Rect2::new(2.0, -1.0, 3.0, 0.0)));
        assert!(triangle_rect_overlap(a, b, c, &Rect2::new(1.0, 1.0, 3.0, 3.0)));
    }

    #[test]
    fn test_far_away() {
        let (a, b, c) = tri();
        assert!(!triangle_rect_overlap(a, b, c, &Rect2::around(100.0, 100.0, 0.1)));
    }

    #[test]
    fn test_sloped_triangle_column() {
        // Steep triangle still overlaps a column below it
        let a = WorldPoint::new(0.0, 0.0, 50.0);
        let b = WorldPoint::new(4.0, 0.0, -50.0);
        let c = WorldPoint::new(0.0, 4.0, 10.0);
        assert!(triangle_rect_overlap(a, b, c, &Rect2::new(0.5, 0.5, 1.0, 1.0)));
    }
}
