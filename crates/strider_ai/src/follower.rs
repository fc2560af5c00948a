//! Route-following controller
//!
//! Drives the agent along a planned route to the start of a fixed path, walks
//! that path to an NPC, runs the interaction sequence and walks back. One call
//! to [`RouteFollower::tick`] is one control step.
//!
//! ```text
//!   Idle ──► Routing ──stall──► Recovering ──► Routing
//!              │
//!              └─route exhausted──► Arrived ──► Interacting ──► Idle (leg complete)
//! ```

use std::sync::Arc;
use std::time::Duration;

use strider_math::{heading_to, turn_amount, WorldPoint};

use crate::cancel::CancelToken;
use crate::config::NavConfig;
use crate::direction::DirectionController;
use crate::error::{NavError, Result};
use crate::events::{ActionEvent, ActionEventSink, GoalKey};
use crate::interaction::{InteractionGoal, InteractionReport, Interactor};
use crate::movement::MovementProfile;
use crate::ports::{GoalPorts, InputKey, NavContext};
use crate::route::Route;
use crate::stop::StopController;
use crate::stuck::StuckDetector;
use crate::watchdog::InterruptWatchdog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FollowState {
    Idle,
    Routing,
    Recovering,
    Arrived,
    Interacting,
}

/// Result of one control tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// In combat and not attended; nothing was done
    Suspended,
    /// Steering toward `next`
    Routing { next: WorldPoint, distance: f32 },
    /// Progress stalled; `unstuck` is false when the controller had been idle
    /// and only paused
    Stalled { unstuck: bool },
    /// The leg finished during this tick
    Completed(InteractionReport),
    /// The leg is already finished; nothing was done
    Arrived,
}

pub struct RouteFollower {
    ctx: NavContext,
    ports: GoalPorts,
    events: Arc<dyn ActionEventSink>,
    goal: InteractionGoal,
    config: NavConfig,

    direction: DirectionController,
    stop: StopController,
    stuck: StuckDetector,
    interactor: Interactor,

    route: Route,
    state: FollowState,
    last_distance: f32,
    last_active: Option<Duration>,
    should_mount: bool,
    leg_complete: bool,
    cancel: CancelToken,
}

impl RouteFollower {
    /// Fails when the goal has no path to its interaction point or the
    /// config does not validate.
    pub fn new(
        ctx: NavContext,
        ports: GoalPorts,
        watchdog: Arc<InterruptWatchdog>,
        events: Arc<dyn ActionEventSink>,
        goal: InteractionGoal,
        config: NavConfig,
    ) -> Result<Self> {
        if goal.config.path.is_empty() {
            log::error!("Path to target is not defined for '{}'", goal.config.name);
            return Err(NavError::MissingInteractionPath {
                goal: goal.config.name.clone(),
            });
        }
        config.validate()?;

        let direction = DirectionController::new(ctx.clone(), config.steering.clone());
        let stop = StopController::new(ctx.clone(), config.stop.clone());
        let stuck = StuckDetector::new(ctx.clone(), config.stuck.clone());
        let interactor = Interactor::new(ctx.clone(), ports.clone(), watchdog, config.interaction.clone());

        Ok(Self {
            ctx,
            ports,
            events,
            goal,
            config,
            direction,
            stop,
            stuck,
            interactor,
            route: Route::new(),
            state: FollowState::Idle,
            last_distance: f32::MAX,
            last_active: None,
            should_mount: true,
            leg_complete: false,
            cancel: CancelToken::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.goal.config.name
    }

    pub fn cost(&self) -> f32 {
        self.goal.config.cost
    }

    /// Eligibility predicate for the goal selector
    pub fn can_run(&self) -> bool {
        self.goal.can_run()
    }

    /// World state required before this goal may run
    pub fn preconditions(&self) -> Vec<(GoalKey, bool)> {
        self.goal
            .config
            .in_combat
            .map(|in_combat| vec![(GoalKey::InCombat, in_combat)])
            .unwrap_or_default()
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    /// Start of the fixed path to the NPC
    pub fn destination(&self) -> WorldPoint {
        self.goal.config.path[0]
    }

    /// Remaining waypoints, next first
    pub fn route_snapshot(&self) -> Vec<WorldPoint> {
        self.route.remaining().to_vec()
    }

    pub fn next_point(&self) -> Option<WorldPoint> {
        self.route.peek()
    }

    /// Clock time of the last completed active tick
    pub fn last_active(&self) -> Option<Duration> {
        self.last_active
    }

    /// Another goal acted: the route is stale and mounting is allowed again
    pub fn on_action_event(&mut self, event: &ActionEvent) {
        if event.source == self.goal.config.name {
            return;
        }

        self.should_mount = true;
        self.leg_complete = false;
        self.route.clear();
        self.state = FollowState::Idle;
    }

    pub fn tick(&mut self) -> Result<TickOutcome> {
        let now = self.ctx.clock.now();
        let idle = self.idle_for_too_long(now);
        let position = self.ctx.feed.position();

        if self.leg_complete {
            let near = position.distance_xy_to(self.destination()) <= self.config.movement.replan_distance;
            if near && !idle {
                return Ok(TickOutcome::Arrived);
            }
            log::info!("Leg to {} re-armed", self.destination());
            self.leg_complete = false;
            self.route.clear();
        }

        self.events
            .publish(ActionEvent::new(self.goal.config.name.clone(), GoalKey::Fighting, false));
        self.ctx.clock.sleep(self.config.movement.tick_pacing(), &self.cancel);

        if self.ctx.feed.in_combat() && !self.config.movement.relaxed_wander {
            return Ok(TickOutcome::Suspended);
        }

        if self.idle_for_too_long(self.ctx.clock.now()) || self.route.is_empty() {
            self.fill_route();
        } else {
            self.ctx.input.set_held(InputKey::Forward, true);
        }

        let Some(mut next) = self.route.peek() else {
            self.state = FollowState::Idle;
            return Ok(TickOutcome::Arrived);
        };

        let location = self.ctx.feed.position();
        let distance = location.distance_xy_to(next);
        let heading = heading_to(location, next);
        let tolerance = self.profile().tolerance(&self.config.movement);

        self.adjust_heading(heading, next, tolerance.wander_angle);

        let mut outcome = TickOutcome::Routing { next, distance };
        if self.last_distance < distance {
            log::debug!("Further away from {}", next);
            self.direction.set_direction(heading, next);
        } else if !self.stuck.is_getting_closer() {
            self.state = FollowState::Recovering;
            self.ctx.input.set_held(InputKey::Forward, true);
            self.ctx.clock.sleep(self.config.movement.stuck_nudge(), &self.cancel);

            let unstuck = self.active_recently();
            if unstuck {
                self.stuck.unstick();
            } else {
                self.ctx.clock.sleep(self.config.movement.resume_pause(), &self.cancel);
                log::info!("Resuming movement");
            }
            outcome = TickOutcome::Stalled { unstuck };
        }

        self.last_distance = distance;

        if distance < tolerance.reach_distance {
            log::info!("Move to next point");
            self.ctx.feed.hint_height(next.z);

            let reach = self.profile().tolerance(&self.config.movement).reach_distance;
            self.route.skip_reached(self.ctx.feed.position(), reach);
            self.last_distance = f32::MAX;

            if self.route.is_empty() {
                self.stop.stop();
                let remaining = self.ctx.feed.position().distance_xy_to(self.destination());
                if remaining > self.config.movement.replan_distance {
                    self.fill_route();
                }

                if self.route.is_empty() {
                    let report = self.complete_leg();
                    return Ok(TickOutcome::Completed(report));
                }
            }

            let Some(point) = self.route.peek() else {
                return Ok(outcome);
            };
            next = point;

            self.stuck.set_target(next);
            let heading = heading_to(self.ctx.feed.position(), next);
            self.direction.set_direction(heading, next);
        }

        if self.state == FollowState::Recovering {
            self.state = FollowState::Routing;
        }

        self.mount_if_required();
        self.last_active = Some(self.ctx.clock.now());
        Ok(outcome)
    }

    fn profile(&self) -> MovementProfile {
        MovementProfile::select(self.ctx.feed.as_ref(), self.config.movement.relaxed_wander)
    }

    fn idle_for_too_long(&self, now: Duration) -> bool {
        self.last_active
            .map_or(true, |last| now.saturating_sub(last) > self.config.movement.idle_rebuild())
    }

    fn active_recently(&self) -> bool {
        self.last_active.map_or(false, |last| {
            self.ctx.clock.now().saturating_sub(last) < self.config.movement.recently_active()
        })
    }

    fn adjust_heading(&self, heading: f32, next: WorldPoint, wander_angle: f32) {
        let current = self.ctx.feed.heading();
        if turn_amount(heading, current) > wander_angle {
            log::debug!("Correct direction");
            self.direction.set_direction(heading, next);
        } else {
            log::trace!("Direction ok heading: {:.3}, agent direction {:.3}", heading, current);
        }
    }

    /// Throw the route away and plan a fresh one to the destination
    fn fill_route(&mut self) {
        self.route.clear();
        let target = self.destination();
        let location = self.ctx.feed.position();
        self.direction.set_direction(heading_to(location, target), target);

        self.stop.stop();
        let path = self.ports.planner.find_route(self.ctx.feed.position(), target);
        if path.is_empty() {
            log::info!("No route to {}, approaching directly", target);
        }
        self.route.replace(path);

        if let Some(next) = self.route.peek() {
            self.ctx.feed.hint_height(next.z);
        }

        let reach = self.profile().tolerance(&self.config.movement).reach_distance;
        self.route.skip_reached(self.ctx.feed.position(), reach);
        if self.route.is_empty() {
            self.route.replace(vec![target]);
        }

        if let Some(next) = self.route.peek() {
            self.stuck.set_target(next);
        }
        self.last_distance = f32::MAX;
        self.state = FollowState::Routing;
    }

    fn mount_if_required(&mut self) {
        let feed = &self.ctx.feed;
        if self.should_mount && !feed.is_mounted() && !feed.in_combat() {
            self.should_mount = false;
            self.ports.mount.mount_up();
            self.ctx.input.set_held(InputKey::Forward, true);
        }
    }

    /// Approach the destination, walk the fixed path, interact, walk back
    fn complete_leg(&mut self) -> InteractionReport {
        self.state = FollowState::Arrived;
        let destination = self.destination();
        let movement = self.config.movement.clone();

        self.move_closer_to_point(movement.far_approach_press(), destination);
        self.move_closer_to_point(movement.near_approach_press(), destination);

        let path = self.goal.config.path.clone();
        self.follow_path(&path);

        self.stop.stop();
        self.ctx.input.tap(InputKey::ClearTarget, &self.cancel);
        self.ctx.clock.sleep(movement.settle(), &self.cancel);

        self.state = FollowState::Interacting;
        let report = self.interactor.run(&self.goal, &self.cancel);
        log::info!("Interaction '{}' finished: {:?}", self.goal.config.name, report);
        self.ctx.input.tap(InputKey::ClearTarget, &self.cancel);

        let back: Vec<WorldPoint> = path.iter().rev().copied().collect();
        self.follow_path(&back);
        self.stop.stop();

        self.route.clear();
        self.leg_complete = true;
        self.last_distance = f32::MAX;
        self.last_active = Some(self.ctx.clock.now());
        self.state = FollowState::Idle;
        report
    }

    /// Walk a fixed path point by point; shown as the current route
    fn follow_path(&mut self, path: &[WorldPoint]) {
        self.route.replace(path.to_vec());

        if self.ctx.feed.is_mounted() {
            self.ctx.input.tap(InputKey::Dismount, &self.cancel);
        }

        let press = self.config.movement.far_approach_press();
        for &point in path {
            self.move_closer_to_point(press, point);
        }
    }

    /// Face `target` and press forward while each press brings the agent
    /// closer and it is still outside the approach tolerance
    fn move_closer_to_point(&mut self, press: Duration, target: WorldPoint) {
        log::info!("Moving to spot {}", target);

        let tolerance = self.config.movement.approach_tolerance;
        let mut distance = self.ctx.feed.position().distance_xy_to(target);
        let mut last_distance = f32::MAX;

        while distance < last_distance && distance > tolerance {
            if self.ctx.feed.is_dead() || self.cancel.is_cancelled() {
                return;
            }

            log::debug!("Distance to spot {:.3}", distance);
            last_distance = distance;

            let heading = heading_to(self.ctx.feed.position(), target);
            self.direction.set_direction_with(heading, target, 0.0, &self.cancel);

            self.ctx.input.press_for(InputKey::Forward, press, &self.cancel);
            self.stop.stop();
            distance = self.ctx.feed.position().distance_xy_to(target);
        }
    }
}

impl Drop for RouteFollower {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
