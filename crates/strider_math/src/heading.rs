//! Heading math
//!
//! Headings are radians on the ground plane, measured counter-clockwise from
//! the +x axis and kept in `[0, TAU)`. Turning left increases the heading.

use core::time::Duration;

use crate::consts::{PI, TAU};
use crate::point::WorldPoint;

/// Default angular rate: half a revolution per second
pub const DEFAULT_TURN_RATE: f32 = PI;

/// Which way to turn to reach a heading
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnDirection {
    Left,
    Right,
}

/// Wrap any angle into `[0, TAU)`
#[inline]
pub fn normalize_heading(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Heading from `from` towards `to` on the ground plane
#[inline]
pub fn heading_to(from: WorldPoint, to: WorldPoint) -> f32 {
    normalize_heading((to.y - from.y).atan2(to.x - from.x))
}

#[inline]
fn counter_clockwise_delta(target: f32, current: f32) -> f32 {
    normalize_heading(target - current)
}

/// Shortest unsigned rotation between two headings, in `[0, PI]`
#[inline]
pub fn turn_amount(target: f32, current: f32) -> f32 {
    let turn = counter_clockwise_delta(target, current);
    if turn > PI { TAU - turn } else { turn }
}

/// Left when the counter-clockwise delta is under half a turn, right otherwise
#[inline]
pub fn turn_direction(target: f32, current: f32) -> TurnDirection {
    if counter_clockwise_delta(target, current) < PI {
        TurnDirection::Left
    } else {
        TurnDirection::Right
    }
}

/// Press duration needed to rotate `angle` radians at [`DEFAULT_TURN_RATE`]
#[inline]
pub fn turn_duration(angle: f32) -> Duration {
    turn_duration_at(angle, DEFAULT_TURN_RATE)
}

/// Press duration needed to rotate `angle` radians at `rate` radians per second.
///
/// Truncated to whole milliseconds; a non-positive rate yields zero.
pub fn turn_duration_at(angle: f32, rate: f32) -> Duration {
    if rate <= 0.0 {
        return Duration::ZERO;
    }
    // `as` saturates and maps NaN to 0
    Duration::from_millis((angle.abs() / rate * 1000.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_turn_amount_is_minimal() {
        assert_relative_eq!(turn_amount(0.5, 0.0), 0.5, epsilon = 1e-5);
        assert_relative_eq!(turn_amount(0.0, 0.5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(turn_amount(TAU - 0.25, 0.25), 0.5, epsilon = 1e-5);
        assert_eq!(turn_amount(1.3, 1.3), 0.0);
    }

    #[test]
    fn test_turn_amount_symmetric_and_bounded() {
        let steps = 48;
        for i in 0..steps {
            for j in 0..steps {
                let a = TAU * i as f32 / steps as f32;
                let b = TAU * j as f32 / steps as f32;
                let ab = turn_amount(a, b);
                let ba = turn_amount(b, a);
                assert_relative_eq!(ab, ba, epsilon = 1e-5);
                assert!((0.0..=PI + 1e-6).contains(&ab));
            }
            let a = TAU * i as f32 / steps as f32;
            assert_eq!(turn_amount(a, a), 0.0);
        }
    }

    #[test]
    fn test_half_turn() {
        assert_relative_eq!(turn_amount(PI, 0.0), PI, epsilon = 1e-5);
        let first = turn_direction(PI, 0.0);
        for _ in 0..10 {
            assert_eq!(turn_direction(PI, 0.0), first);
        }
    }

    #[test]
    fn test_turn_direction_sign() {
        assert_eq!(turn_direction(0.5, 0.0), TurnDirection::Left);
        assert_eq!(turn_direction(0.0, 0.5), TurnDirection::Right);
        // Across the wrap point
        assert_eq!(turn_direction(0.1, TAU - 0.1), TurnDirection::Left);
        assert_eq!(turn_direction(TAU - 0.1, 0.1), TurnDirection::Right);
    }

    #[test]
    fn test_turn_duration_monotonic() {
        assert_eq!(turn_duration(PI), Duration::from_millis(1000));
        assert_eq!(turn_duration(0.0), Duration::ZERO);

        let mut last = Duration::ZERO;
        for i in 0..=100 {
            let d = turn_duration(PI * i as f32 / 100.0);
            assert!(d >= last);
            last = d;
        }
        assert_eq!(turn_duration_at(1.0, 0.0), Duration::ZERO);
    }

    #[test]
    fn test_heading_to() {
        let origin = WorldPoint::ZERO;
        assert_relative_eq!(heading_to(origin, WorldPoint::new(1.0, 0.0, 0.0)), 0.0);
        assert_relative_eq!(heading_to(origin, WorldPoint::new(0.0, 1.0, 0.0)), PI / 2.0, epsilon = 1e-5);
        assert_relative_eq!(heading_to(origin, WorldPoint::new(0.0, -1.0, 0.0)), 1.5 * PI, epsilon = 1e-5);
    }
}
