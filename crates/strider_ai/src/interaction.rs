//! Interaction sequence
//!
//! Bounded retry loop run at the interaction point: interact, answer a
//! gossip window, fire the bound action, then confirm on the selected target.
//! A lost target ends the loop early.

use std::fmt;
use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::config::{InteractionConfig, InteractionGoalConfig};
use crate::ports::{GoalPorts, GossipKind, InputKey, NavContext};
use crate::watchdog::InterruptWatchdog;

/// Whether the goal still has work to do
pub type CanRun = Box<dyn Fn() -> bool + Send + Sync>;

/// A configured interaction goal
pub struct InteractionGoal {
    pub config: InteractionGoalConfig,
    pub can_run: CanRun,
}

impl InteractionGoal {
    pub fn new(config: InteractionGoalConfig, can_run: CanRun) -> Self {
        Self { config, can_run }
    }

    pub fn can_run(&self) -> bool {
        (self.can_run)()
    }
}

impl fmt::Debug for InteractionGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionGoal")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// All attempts ran and the goal has nothing left to do
    Completed,
    /// All attempts ran but the goal can still run
    Exhausted,
    /// No target was selected after firing the action
    TargetLost,
    /// The agent is dead; nothing was attempted
    AgentDead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionReport {
    /// Attempts started
    pub attempts: u32,
    pub outcome: InteractionOutcome,
}

impl InteractionReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == InteractionOutcome::Completed
    }
}

pub struct Interactor {
    ctx: NavContext,
    ports: GoalPorts,
    watchdog: Arc<InterruptWatchdog>,
    config: InteractionConfig,
}

impl Interactor {
    pub fn new(
        ctx: NavContext,
        ports: GoalPorts,
        watchdog: Arc<InterruptWatchdog>,
        config: InteractionConfig,
    ) -> Self {
        Self {
            ctx,
            ports,
            watchdog,
            config,
        }
    }

    /// Run up to `max_attempts` interaction attempts for `goal`
    pub fn run(&self, goal: &InteractionGoal, cancel: &CancelToken) -> InteractionReport {
        if self.ctx.feed.is_dead() {
            log::info!("Agent is dead, skipping interaction");
            return InteractionReport {
                attempts: 0,
                outcome: InteractionOutcome::AgentDead,
            };
        }

        log::info!("Interacting with NPC for '{}'", goal.config.name);

        let input = &self.ctx.input;
        let action = InputKey::Action(goal.config.key);
        let mut attempts = 0;
        let mut lost_target = false;

        while attempts < self.config.max_attempts && !cancel.is_cancelled() {
            attempts += 1;
            input.tap(InputKey::Interact, cancel);
            self.answer_gossip(cancel);

            // bound macro: targets the NPC and performs the action
            input.press_for(action, self.config.action_press(), cancel);

            match self.ctx.feed.target() {
                Some(target) => {
                    self.ports.blacklist.add(target);
                    input.tap(InputKey::Interact, cancel);
                }
                None => {
                    log::error!(
                        "No target selected after attempt {}. Action key {} should target an NPC.",
                        attempts,
                        goal.config.key
                    );
                    lost_target = true;
                    break;
                }
            }

            self.pause_unless_target_lost(cancel);
            input.tap(InputKey::ClearTarget, cancel);
        }

        let still_runnable = goal.can_run();
        if still_runnable {
            log::error!("Failed to complete '{}' at the NPC after {} attempts", goal.config.name, attempts);
        }

        let outcome = if lost_target {
            InteractionOutcome::TargetLost
        } else if still_runnable {
            InteractionOutcome::Exhausted
        } else {
            InteractionOutcome::Completed
        };

        InteractionReport { attempts, outcome }
    }

    /// Poll briefly for a gossip or merchant window and pick the vendor entry
    fn answer_gossip(&self, cancel: &CancelToken) {
        let gossip = &self.ports.gossip;
        let clock = &self.ctx.clock;
        let start = clock.now();

        while !gossip.merchant_open() && clock.now().saturating_sub(start) < self.config.gossip_poll_window() {
            if !clock.sleep(self.config.gossip_poll_step(), cancel) {
                return;
            }

            let count = gossip.option_count();
            if count == 0 {
                continue;
            }

            log::info!("There are {} gossip options", count);
            if let Some(index) = gossip.option_index(GossipKind::Vendor) {
                log::info!("Picking {:?} -> {}", GossipKind::Vendor, index);
                self.ctx.input.select_gossip_option(index);
                if !clock.sleep(self.config.gossip_poll_step() * 2, cancel) {
                    return;
                }
            }
        }
    }

    /// Fixed pause, cut short by the watchdog when the target goes away, the
    /// agent dies or the caller cancels
    fn pause_unless_target_lost(&self, cancel: &CancelToken) {
        if cancel.is_cancelled() {
            return;
        }

        let pause = CancelToken::new();
        let feed = Arc::clone(&self.ctx.feed);
        let caller = cancel.clone();
        let armed = self.watchdog.set(
            Box::new(move || feed.target().is_some() && !feed.is_dead() && !caller.is_cancelled()),
            pause.clone(),
        );

        match armed {
            Ok(()) => {
                if !self.ctx.clock.sleep(self.config.pause(), &pause) {
                    log::debug!("Interaction pause interrupted");
                }
                self.watchdog.reset();
            }
            Err(e) => {
                log::warn!("{}, pausing without interrupt", e);
                self.ctx.clock.sleep(self.config.pause(), cancel);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    use crate::clock::SystemClock;
    use crate::config::WatchdogConfig;
    use crate::ports::{EntityId, NavContext};
    use crate::testing::{Command, FakeWorld};

    fn goal(can_run: bool) -> InteractionGoal {
        let config = InteractionGoalConfig {
            name: "Sell".to_string(),
            key: 56,
            cost: 6.0,
            in_combat: None,
            path: Vec::new(),
        };
        InteractionGoal::new(config, Box::new(move || can_run))
    }

    fn interactor(world: &Arc<FakeWorld>) -> Interactor {
        let watchdog = Arc::new(InterruptWatchdog::start(WatchdogConfig::default()).unwrap());
        Interactor::new(world.nav_context(), world.goal_ports(), watchdog, InteractionConfig::default())
    }

    #[test]
    fn test_target_present_caps_at_max_attempts() {
        let world = FakeWorld::shared();
        world.set_action_target(Some(EntityId(7)));
        let interactor = interactor(&world);

        let report = interactor.run(&goal(true), &CancelToken::new());
        assert_eq!(report.attempts, 5);
        assert_eq!(report.outcome, InteractionOutcome::Exhausted);
        assert_eq!(world.blacklisted(), vec![EntityId(7); 5]);

        let actions = world
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Press(InputKey::Action(56), _)))
            .count();
        assert_eq!(actions, 5);
    }

    #[test]
    fn test_no_target_stops_after_first_attempt() {
        let world = FakeWorld::shared();
        let interactor = interactor(&world);

        let report = interactor.run(&goal(true), &CancelToken::new());
        assert_eq!(report.attempts, 1);
        assert_eq!(report.outcome, InteractionOutcome::TargetLost);
        assert!(world.blacklisted().is_empty());
    }

    #[test]
    fn test_completed_when_goal_satisfied() {
        let world = FakeWorld::shared();
        world.set_action_target(Some(EntityId(3)));
        let interactor = interactor(&world);

        let report = interactor.run(&goal(false), &CancelToken::new());
        assert!(report.succeeded());
        assert_eq!(report.attempts, 5);
    }

    #[test]
    fn test_dead_agent_skips_interaction() {
        let world = FakeWorld::shared();
        world.set_health(0);
        let interactor = interactor(&world);

        let report = interactor.run(&goal(true), &CancelToken::new());
        assert_eq!(report.outcome, InteractionOutcome::AgentDead);
        assert_eq!(report.attempts, 0);
        assert!(world.commands().is_empty());
    }

    #[test]
    fn test_vendor_gossip_option_selected() {
        let world = FakeWorld::shared();
        world.set_action_target(Some(EntityId(9)));
        world.set_gossip(vec![(GossipKind::Gossip, 0), (GossipKind::Vendor, 1)]);
        let interactor = interactor(&world);

        interactor.run(&goal(false), &CancelToken::new());
        assert!(world.commands().contains(&Command::SelectGossip(1)));
    }

    #[test]
    fn test_merchant_window_skips_polling() {
        let world = FakeWorld::shared();
        world.set_action_target(Some(EntityId(9)));
        world.set_gossip(vec![(GossipKind::Vendor, 2)]);
        world.set_merchant_open(true);
        let interactor = interactor(&world);

        interactor.run(&goal(false), &CancelToken::new());
        assert!(!world.commands().contains(&Command::SelectGossip(2)));
    }

    /// Feed and input from the fake, real time from a `SystemClock`
    fn realtime_interactor(world: &Arc<FakeWorld>, pause_ms: u64) -> Interactor {
        let watchdog = Arc::new(InterruptWatchdog::start(WatchdogConfig::default()).unwrap());
        let ctx = NavContext::new(world.clone(), world.clone(), Arc::new(SystemClock::new()));
        let config = InteractionConfig {
            max_attempts: 1,
            pause_ms,
            ..InteractionConfig::default()
        };
        Interactor::new(ctx, world.goal_ports(), watchdog, config)
    }

    #[test]
    fn test_lost_target_cuts_pause_short() {
        let world = FakeWorld::shared();
        world.set_action_target(Some(EntityId(11)));
        let interactor = realtime_interactor(&world, 3_000);

        let remote = world.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            remote.set_target(None);
        });

        let start = Instant::now();
        let report = interactor.run(&goal(true), &CancelToken::new());
        let elapsed = start.elapsed();
        handle.join().unwrap();

        assert_eq!(report.attempts, 1);
        assert_eq!(report.outcome, InteractionOutcome::Exhausted);
        assert!(elapsed < Duration::from_millis(2_500), "pause ran for {:?}", elapsed);
    }

    #[test]
    fn test_caller_cancel_cuts_pause_short() {
        let world = FakeWorld::shared();
        world.set_action_target(Some(EntityId(12)));
        let interactor = realtime_interactor(&world, 3_000);

        let cancel = CancelToken::new();
        let remote = cancel.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(300));
            remote.cancel();
        });

        let start = Instant::now();
        interactor.run(&goal(true), &cancel);
        let elapsed = start.elapsed();
        handle.join().unwrap();

        assert!(elapsed < Duration::from_millis(2_500), "pause ran for {:?}", elapsed);
    }
}
