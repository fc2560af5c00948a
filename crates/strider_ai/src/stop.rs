//! Stop controller
//!
//! Releases movement inputs that are still engaged. Position and heading
//! snapshots from the previous call tell whether the agent is still moving;
//! once it is stationary repeated calls do nothing.

use std::time::Duration;

use rand::Rng;
use strider_math::WorldPoint;

use crate::cancel::CancelToken;
use crate::config::StopConfig;
use crate::ports::{InputKey, NavContext};

pub struct StopController {
    ctx: NavContext,
    config: StopConfig,
    last_position: WorldPoint,
    last_heading: f32,
    cancel: CancelToken,
}

impl StopController {
    pub fn new(ctx: NavContext, config: StopConfig) -> Self {
        Self {
            ctx,
            config,
            last_position: WorldPoint::ZERO,
            last_heading: 0.0,
            cancel: CancelToken::new(),
        }
    }

    /// Stop moving then stop turning. Returns `true` if any input was touched.
    pub fn stop(&mut self) -> bool {
        let forward = self.stop_forward();
        let turn = self.stop_turn();
        forward || turn
    }

    pub fn stop_forward(&mut self) -> bool {
        let position = self.ctx.feed.position();
        let mut pressed = false;

        if position != self.last_position {
            let input = &self.ctx.input;
            let forward = input.is_held(InputKey::Forward);
            let backward = input.is_held(InputKey::Backward);

            // Coasting with nothing held: a short forward tap makes the
            // simulation register the agent as settled.
            if !forward && !backward && self.last_position.distance_xy_to(position) >= self.config.min_distance {
                let tap = self.jitter(self.config.forward_tap_min_ms, self.config.forward_tap_max_ms);
                input.press_for(InputKey::Forward, tap, &self.cancel);
                pressed = true;
            }

            if input.is_held(InputKey::Forward) {
                input.set_held(InputKey::Forward, false);
                pressed = true;
            }

            if input.is_held(InputKey::Backward) {
                input.set_held(InputKey::Backward, false);
                pressed = true;
            }

            if pressed {
                let settle = self.jitter(self.config.settle_min_ms, self.config.settle_max_ms);
                self.ctx.clock.sleep(settle, &self.cancel);
            }
        }

        self.last_position = self.ctx.feed.position();
        pressed
    }

    pub fn stop_turn(&mut self) -> bool {
        let heading = self.ctx.feed.heading();
        let mut pressed = false;

        if heading != self.last_heading {
            let input = &self.ctx.input;
            for key in [InputKey::TurnLeft, InputKey::TurnRight] {
                if input.is_held(key) {
                    input.set_held(key, false);
                    pressed = true;
                }
            }

            if pressed {
                self.ctx.clock.sleep(self.config.turn_settle(), &self.cancel);
            }
        }

        self.last_heading = self.ctx.feed.heading();
        pressed
    }

    fn jitter(&self, min_ms: u64, max_ms: u64) -> Duration {
        let ms = if min_ms < max_ms {
            rand::thread_rng().gen_range(min_ms..max_ms)
        } else {
            min_ms
        };
        Duration::from_millis(ms)
    }
}

impl Drop for StopController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
