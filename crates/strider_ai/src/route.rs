//! Waypoint route owned by the route follower
//!
//! Stored as an ordered list plus a cursor instead of a destructive stack:
//! the point at the cursor is the next one to steer toward, everything after
//! it is still to be visited.

use strider_math::WorldPoint;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Route {
    waypoints: Vec<WorldPoint>,
    cursor: usize,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route visiting `waypoints` in order
    pub fn from_points(waypoints: Vec<WorldPoint>) -> Self {
        Self { waypoints, cursor: 0 }
    }

    /// Replace the whole route
    pub fn replace(&mut self, waypoints: Vec<WorldPoint>) {
        self.waypoints = waypoints;
        self.cursor = 0;
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.cursor = 0;
    }

    /// Next waypoint to steer toward
    pub fn peek(&self) -> Option<WorldPoint> {
        self.waypoints.get(self.cursor).copied()
    }

    /// Drop the next waypoint, returning it
    pub fn advance(&mut self) -> Option<WorldPoint> {
        let point = self.peek()?;
        self.cursor += 1;
        Some(point)
    }

    /// Drop every leading waypoint within `reach` (planar) of `position`.
    /// Returns how many were dropped.
    pub fn skip_reached(&mut self, position: WorldPoint, reach: f32) -> usize {
        let mut skipped = 0;
        while let Some(next) = self.peek() {
            if position.distance_xy_to(next) >= reach {
                break;
            }
            self.cursor += 1;
            skipped += 1;
        }
        skipped
    }

    /// Waypoints not yet visited, next first
    pub fn remaining(&self) -> &[WorldPoint] {
        &self.waypoints[self.cursor.min(self.waypoints.len())..]
    }

    pub fn len(&self) -> usize {
        self.remaining().len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining().is_empty()
    }

    /// Last waypoint of the route, visited or not
    pub fn destination(&self) -> Option<WorldPoint> {
        self.waypoints.last().copied()
    }
}
