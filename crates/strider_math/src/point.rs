//! World-space positions

use core::fmt;
use core::ops::{Add, Mul, Sub};

/// A position in world units.
///
/// `x`/`y` span the ground plane, `z` is height. Headings and "reached"
/// checks work on the ground plane; 3D distance is used for route progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPoint {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Same point with a different height
    #[inline]
    pub fn with_z(self, z: f32) -> Self {
        Self::new(self.x, self.y, z)
    }

    #[inline]
    pub fn distance_to(self, other: Self) -> f32 {
        self.distance_squared_to(other).sqrt()
    }

    #[inline]
    pub fn distance_squared_to(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Distance on the ground plane, ignoring height
    #[inline]
    pub fn distance_xy_to(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when both points lie within `epsilon` of each other on every axis
    #[inline]
    pub fn approx_eq(self, other: Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

impl Add for WorldPoint {
    type Output = Self;
    #[inline] fn add(self, rhs: Self) -> Self { Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z) }
}
impl Sub for WorldPoint {
    type Output = Self;
    #[inline] fn sub(self, rhs: Self) -> Self { Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z) }
}
impl Mul<f32> for WorldPoint {
    type Output = Self;
    #[inline] fn mul(self, rhs: f32) -> Self { Self::new(self.x * rhs, self.y * rhs, self.z * rhs) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance() {
        let a = WorldPoint::new(0.0, 0.0, 0.0);
        let b = WorldPoint::new(3.0, 4.0, 12.0);

        assert_relative_eq!(a.distance_to(b), 13.0);
        assert_relative_eq!(a.distance_xy_to(b), 5.0);
    }

    #[test]
    fn test_approx_eq() {
        let a = WorldPoint::new(1.0, 2.0, 3.0);
        assert!(a.approx_eq(WorldPoint::new(1.0005, 2.0, 3.0), 0.001));
        assert!(!a.approx_eq(WorldPoint::new(1.01, 2.0, 3.0), 0.001));
    }

    #[test]
    fn test_lerp_midpoint() {
        let a = WorldPoint::new(0.0, 0.0, 0.0);
        let b = WorldPoint::new(10.0, -4.0, 2.0);
        assert_eq!(a.lerp(b, 0.5), WorldPoint::new(5.0, -2.0, 1.0));
    }
}
