//! Stuck detection and recovery
//!
//! Tracks the best distance to the current target. No gain larger than the
//! progress epsilon within the stall window means the agent is stuck.
//! Unstick maneuvers escalate with each consecutive attempt.

use std::time::Duration;

use strider_math::WorldPoint;

use crate::cancel::CancelToken;
use crate::config::StuckConfig;
use crate::ports::{InputKey, NavContext};

pub struct StuckDetector {
    ctx: NavContext,
    config: StuckConfig,
    target: Option<WorldPoint>,
    best_distance: f32,
    last_progress: Duration,
    attempts: u32,
    cancel: CancelToken,
}

impl StuckDetector {
    pub fn new(ctx: NavContext, config: StuckConfig) -> Self {
        let now = ctx.clock.now();
        Self {
            ctx,
            config,
            target: None,
            best_distance: f32::MAX,
            last_progress: now,
            attempts: 0,
            cancel: CancelToken::new(),
        }
    }

    /// Start measuring progress toward `target`
    pub fn set_target(&mut self, target: WorldPoint) {
        self.target = Some(target);
        self.best_distance = self.ctx.feed.position().distance_xy_to(target);
        self.last_progress = self.ctx.clock.now();
        self.attempts = 0;
    }

    /// Whether the agent made progress recently
    pub fn is_getting_closer(&mut self) -> bool {
        let Some(target) = self.target else {
            return true;
        };

        let now = self.ctx.clock.now();
        let distance = self.ctx.feed.position().distance_xy_to(target);
        if distance < self.best_distance - self.config.progress_epsilon {
            self.best_distance = distance;
            self.last_progress = now;
            self.attempts = 0;
            return true;
        }

        now.saturating_sub(self.last_progress) < self.config.stall_window()
    }

    /// Back off, sidestep, hop and push forward again.
    /// Alternates the sidestep side and turns further on each attempt.
    pub fn unstick(&mut self) {
        self.attempts += 1;
        log::info!("Stuck, unstick attempt {}", self.attempts);

        let input = &self.ctx.input;
        input.set_held(InputKey::Forward, false);
        input.press_for(InputKey::Backward, self.config.backoff_press(), &self.cancel);

        let side = if self.attempts % 2 == 1 {
            InputKey::TurnLeft
        } else {
            InputKey::TurnRight
        };
        let sidestep = self.config.sidestep_press() * self.attempts.min(4);
        input.press_for(side, sidestep, &self.cancel);

        input.tap(InputKey::Jump, &self.cancel);
        input.press_for(InputKey::Forward, self.config.forward_press(), &self.cancel);
        input.set_held(InputKey::Forward, true);

        // fresh window for the new heading
        self.last_progress = self.ctx.clock.now();
        if let Some(target) = self.target {
            self.best_distance = self.best_distance.min(self.ctx.feed.position().distance_xy_to(target));
        }
    }

    /// Consecutive unstick attempts since the last progress
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Drop for StuckDetector {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
