//! Straight-line route planner over the geometry index
//!
//! Walks the segment from start to destination, checking the ground under
//! each sample with the geometry index. Any sample off the mesh fails the
//! whole route (empty result).

use std::sync::Arc;

use strider_ai::RoutePlanner;
use strider_math::{triangle_rect_overlap, Rect2, WorldPoint};
use strider_mesh::{GeometryIndex, TriangleMesh};

/// Half-size of the probe square under each sample
const PROBE: f32 = 0.25;

pub struct LinePlanner {
    mesh: Arc<TriangleMesh>,
    index: GeometryIndex,
    spacing: f32,
}

impl LinePlanner {
    pub fn new(mesh: Arc<TriangleMesh>, index: GeometryIndex, spacing: f32) -> Self {
        Self {
            mesh,
            index,
            spacing: spacing.max(1.0),
        }
    }

    /// Height of the ground under `(x, y)`, if any triangle covers it
    pub fn ground_height(&self, x: f32, y: f32) -> Option<f32> {
        let probe = Rect2::around(x, y, PROBE);
        let mut ids: Vec<_> = self.index.query_rect(&probe).into_iter().collect();
        ids.sort_unstable();

        ids.into_iter()
            .filter_map(|id| self.mesh.get(id))
            .find(|tri| {
                let [a, b, c] = tri.vertices;
                triangle_rect_overlap(a, b, c, &probe)
            })
            .map(|tri| tri.centroid().z)
    }
}

impl RoutePlanner for LinePlanner {
    fn find_route(&self, from: WorldPoint, to: WorldPoint) -> Vec<WorldPoint> {
        let length = from.distance_xy_to(to);
        let step = (self.spacing / 8.0).max(PROBE);
        let samples = (length / step).ceil().max(1.0) as usize;

        for i in 0..=samples {
            let p = from.lerp(to, i as f32 / samples as f32);
            if self.ground_height(p.x, p.y).is_none() {
                log::info!("No ground at ({:.1}, {:.1}), no route to {}", p.x, p.y, to);
                return Vec::new();
            }
        }

        let legs = (length / self.spacing).ceil().max(1.0) as usize;
        let route: Vec<WorldPoint> = (1..=legs)
            .map(|i| {
                let p = from.lerp(to, i as f32 / legs as f32);
                let z = self.ground_height(p.x, p.y).unwrap_or(p.z);
                p.with_z(z)
            })
            .collect();

        log::debug!("Planned {} waypoints over {:.1} units", route.len(), length);
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn planner() -> LinePlanner {
        let mesh = Arc::new(TriangleMesh::grid(WorldPoint::new(0.0, 0.0, 2.0), 10, 10, 10.0));
        let index = GeometryIndex::build(&mesh);
        LinePlanner::new(mesh, index, 40.0)
    }

    #[test]
    fn test_route_on_mesh() {
        let planner = planner();
        let route = planner.find_route(WorldPoint::new(5.0, 5.0, 0.0), WorldPoint::new(95.0, 5.0, 0.0));

        assert_eq!(route.len(), 3);
        let last = route[route.len() - 1];
        assert_relative_eq!(last.x, 95.0, epsilon = 1e-4);
        assert_relative_eq!(last.z, 2.0, epsilon = 1e-4);
        assert!(route[0].x < route[1].x);
    }

    #[test]
    fn test_route_off_mesh_fails() {
        let planner = planner();
        let route = planner.find_route(WorldPoint::new(5.0, 5.0, 0.0), WorldPoint::new(150.0, 5.0, 0.0));
        assert!(route.is_empty());
    }

    #[test]
    fn test_ground_height() {
        let planner = planner();
        assert_relative_eq!(planner.ground_height(50.0, 50.0).unwrap(), 2.0, epsilon = 1e-5);
        assert_eq!(planner.ground_height(-20.0, 50.0), None);
    }
}
