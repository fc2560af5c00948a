//! # strider_math - Navigation Math
//!
//! Small, pure math primitives shared by the geometry index and the
//! movement controllers:
//! - [`WorldPoint`] positions with planar and 3D distances
//! - [`Rect2`] planar bounds for grid queries
//! - Triangle/box overlap (separating axis test)
//! - Heading math: shortest turn, turn direction, turn duration

pub mod bounds;
pub mod heading;
pub mod intersect;
pub mod point;

pub use bounds::*;
pub use heading::*;
pub use intersect::*;
pub use point::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = core::f32::consts::TAU;
    pub const EPSILON: f32 = 1e-6;
}

pub mod prelude {
    pub use crate::bounds::Rect2;
    pub use crate::heading::{heading_to, turn_amount, turn_direction, turn_duration, TurnDirection};
    pub use crate::intersect::{triangle_box_overlap, triangle_rect_overlap};
    pub use crate::point::WorldPoint;
}
