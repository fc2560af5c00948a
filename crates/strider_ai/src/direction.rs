//! Direction controller
//!
//! Issues at most one timed turn per call, sized by the heading math so the
//! agent ends up facing the requested heading.

use std::time::Duration;

use strider_math::{turn_amount, turn_direction, turn_duration_at, TurnDirection, WorldPoint};

use crate::cancel::CancelToken;
use crate::config::SteeringConfig;
use crate::ports::{InputKey, NavContext};

/// A turn that was issued
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnCommand {
    pub direction: TurnDirection,
    /// Radians, in `[0, π]`
    pub amount: f32,
    pub duration: Duration,
}

impl TurnCommand {
    pub fn key(&self) -> InputKey {
        match self.direction {
            TurnDirection::Left => InputKey::TurnLeft,
            TurnDirection::Right => InputKey::TurnRight,
        }
    }
}

pub struct DirectionController {
    ctx: NavContext,
    config: SteeringConfig,
    /// Cancelled on drop so an in-flight turn is released
    shutdown: CancelToken,
}

impl DirectionController {
    pub fn new(ctx: NavContext, config: SteeringConfig) -> Self {
        Self {
            ctx,
            config,
            shutdown: CancelToken::new(),
        }
    }

    /// Turn toward `target_heading` unless already within the configured
    /// ignore distance of `target_point`.
    pub fn set_direction(&self, target_heading: f32, target_point: WorldPoint) -> Option<TurnCommand> {
        self.set_direction_with(target_heading, target_point, self.config.ignore_distance, &self.shutdown)
    }

    /// Like [`set_direction`](Self::set_direction) with an explicit ignore
    /// distance and cancellation handle for the press.
    pub fn set_direction_with(
        &self,
        target_heading: f32,
        target_point: WorldPoint,
        ignore_distance: f32,
        cancel: &CancelToken,
    ) -> Option<TurnCommand> {
        let distance = self.ctx.feed.position().distance_xy_to(target_point);
        if distance < ignore_distance {
            log::trace!(
                "SetDirection: too close, ignored direction change. {:.3} < {:.3}",
                distance,
                ignore_distance
            );
            return None;
        }

        let current = self.ctx.feed.heading();
        let amount = turn_amount(target_heading, current);
        let command = TurnCommand {
            direction: turn_direction(target_heading, current),
            amount,
            duration: turn_duration_at(amount, self.config.turn_rate),
        };

        log::debug!(
            "SetDirection: {:.3} -> {:.3} ({:?} for {:?}), distance {:.3}",
            current,
            target_heading,
            command.direction,
            command.duration,
            distance
        );

        self.ctx.input.press_for(command.key(), command.duration, cancel);
        Some(command)
    }
}

impl Drop for DirectionController {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Command, FakeWorld};
    use approx::assert_relative_eq;
    use strider_math::consts::PI;

    fn controller(world: &std::sync::Arc<FakeWorld>) -> DirectionController {
        DirectionController::new(world.nav_context(), SteeringConfig::default())
    }

    #[test]
    fn test_close_target_is_ignored() {
        let world = FakeWorld::shared();
        let direction = controller(&world);

        let issued = direction.set_direction(PI, WorldPoint::new(5.0, 5.0, 0.0));
        assert!(issued.is_none());
        assert!(world.commands().is_empty());
    }

    #[test]
    fn test_single_turn_left() {
        let world = FakeWorld::shared();
        world.set_heading(0.0);
        let direction = controller(&world);

        let turn = direction
            .set_direction(PI / 2.0, WorldPoint::new(0.0, 100.0, 0.0))
            .unwrap();

        assert_eq!(turn.direction, TurnDirection::Left);
        assert_relative_eq!(turn.amount, PI / 2.0, epsilon = 1e-5);
        assert_eq!(turn.duration, Duration::from_millis(500));
        assert_eq!(
            world.commands(),
            vec![Command::Press(InputKey::TurnLeft, Duration::from_millis(500))]
        );
    }

    #[test]
    fn test_turn_right_across_zero() {
        let world = FakeWorld::shared();
        world.set_heading(0.25);
        let direction = controller(&world);

        let turn = direction
            .set_direction(2.0 * PI - 0.25, WorldPoint::new(100.0, -10.0, 0.0))
            .unwrap();

        assert_eq!(turn.direction, TurnDirection::Right);
        assert_relative_eq!(turn.amount, 0.5, epsilon = 1e-4);
        assert_eq!(world.commands().len(), 1);
    }

    #[test]
    fn test_zero_ignore_distance() {
        let world = FakeWorld::shared();
        let direction = controller(&world);

        let issued = direction.set_direction_with(1.0, WorldPoint::new(1.0, 0.0, 0.0), 0.0, &CancelToken::new());
        assert!(issued.is_some());
    }
}
