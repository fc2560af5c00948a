//! Navigation configuration
//!
//! Every tunable of the controllers lives here. Durations are stored as
//! milliseconds so config files stay readable.
//!
//! # Example Config File
//!
//! ```toml
//! [movement]
//! relaxed_wander = false
//! replan_distance = 50.0
//! idle_rebuild_ms = 10000
//!
//! [movement.mounted_profile]
//! wander_angle = 0.05
//! reach_distance = 50.0
//!
//! [steering]
//! ignore_distance = 10.0
//!
//! [interaction]
//! max_attempts = 5
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strider_math::{consts::PI, WorldPoint};
use thiserror::Error;

/// Errors from config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[inline]
fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn positive(name: &str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!("{} must be positive, got {}", name, value)))
    }
}

/// Angular tolerance and waypoint reach distance of one movement profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileTolerance {
    /// Heading error (radians) tolerated before a correction is issued
    pub wander_angle: f32,
    /// Distance at which a waypoint counts as reached
    pub reach_distance: f32,
}

impl ProfileTolerance {
    fn validate(&self, name: &str) -> ConfigResult<()> {
        positive(&format!("{}.reach_distance", name), self.reach_distance)?;
        if !(self.wander_angle > 0.0 && self.wander_angle <= PI) {
            return Err(ConfigError::Validation(format!(
                "{}.wander_angle must be in (0, PI], got {}",
                name, self.wander_angle
            )));
        }
        Ok(())
    }
}

/// Route following and approach
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Attended mode: looser heading tolerance, keeps running in combat
    pub relaxed_wander: bool,
    pub default_profile: ProfileTolerance,
    pub relaxed_profile: ProfileTolerance,
    /// Mounted or in a travel form
    pub mounted_profile: ProfileTolerance,
    /// Distance to the destination beyond which an exhausted route is re-planned
    pub replan_distance: f32,
    /// A route untouched this long is rebuilt
    pub idle_rebuild_ms: u64,
    /// Stalls within this long of the last tick are treated as real obstructions
    pub recently_active_ms: u64,
    /// Pause used instead of unsticking after a long idle
    pub resume_pause_ms: u64,
    /// Forward hold before a stuck maneuver
    pub stuck_nudge_ms: u64,
    /// Delay at the start of every tick
    pub tick_pacing_ms: u64,
    /// Direct approach stops within this distance
    pub approach_tolerance: f32,
    pub far_approach_press_ms: u64,
    pub near_approach_press_ms: u64,
    /// Pause after clearing the target before interacting
    pub settle_ms: u64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            relaxed_wander: false,
            default_profile: ProfileTolerance { wander_angle: 0.05, reach_distance: 20.0 },
            relaxed_profile: ProfileTolerance { wander_angle: 0.3, reach_distance: 20.0 },
            mounted_profile: ProfileTolerance { wander_angle: 0.05, reach_distance: 50.0 },
            replan_distance: 50.0,
            idle_rebuild_ms: 10_000,
            recently_active_ms: 2_000,
            resume_pause_ms: 1_000,
            stuck_nudge_ms: 100,
            tick_pacing_ms: 200,
            approach_tolerance: 5.0,
            far_approach_press_ms: 400,
            near_approach_press_ms: 100,
            settle_ms: 100,
        }
    }
}

impl MovementConfig {
    pub fn idle_rebuild(&self) -> Duration { ms(self.idle_rebuild_ms) }
    pub fn recently_active(&self) -> Duration { ms(self.recently_active_ms) }
    pub fn resume_pause(&self) -> Duration { ms(self.resume_pause_ms) }
    pub fn stuck_nudge(&self) -> Duration { ms(self.stuck_nudge_ms) }
    pub fn tick_pacing(&self) -> Duration { ms(self.tick_pacing_ms) }
    pub fn far_approach_press(&self) -> Duration { ms(self.far_approach_press_ms) }
    pub fn near_approach_press(&self) -> Duration { ms(self.near_approach_press_ms) }
    pub fn settle(&self) -> Duration { ms(self.settle_ms) }
}

/// Direction controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Corrections are skipped this close to the target point
    pub ignore_distance: f32,
    /// Radians per second while a turn input is held
    pub turn_rate: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            ignore_distance: 10.0,
            turn_rate: PI,
        }
    }
}

/// Stop controller
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StopConfig {
    /// Planar movement below this is not treated as motion
    pub min_distance: f32,
    pub forward_tap_min_ms: u64,
    /// Exclusive upper bound
    pub forward_tap_max_ms: u64,
    pub settle_min_ms: u64,
    /// Exclusive upper bound
    pub settle_max_ms: u64,
    pub turn_settle_ms: u64,
}

impl Default for StopConfig {
    fn default() -> Self {
        Self {
            min_distance: 0.001,
            forward_tap_min_ms: 2,
            forward_tap_max_ms: 5,
            settle_min_ms: 25,
            settle_max_ms: 30,
            turn_settle_ms: 1,
        }
    }
}

impl StopConfig {
    pub fn turn_settle(&self) -> Duration { ms(self.turn_settle_ms) }
}

/// Stuck detection and unstick maneuvers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StuckConfig {
    /// Distance gain that counts as progress
    pub progress_epsilon: f32,
    /// No progress for this long means stuck
    pub stall_window_ms: u64,
    pub backoff_press_ms: u64,
    /// Sidestep turn per attempt, scaled by the attempt number up to four
    pub sidestep_press_ms: u64,
    pub forward_press_ms: u64,
}

impl Default for StuckConfig {
    fn default() -> Self {
        Self {
            progress_epsilon: 1.0,
            stall_window_ms: 2_000,
            backoff_press_ms: 300,
            sidestep_press_ms: 250,
            forward_press_ms: 500,
        }
    }
}

impl StuckConfig {
    pub fn stall_window(&self) -> Duration { ms(self.stall_window_ms) }
    pub fn backoff_press(&self) -> Duration { ms(self.backoff_press_ms) }
    pub fn sidestep_press(&self) -> Duration { ms(self.sidestep_press_ms) }
    pub fn forward_press(&self) -> Duration { ms(self.forward_press_ms) }
}

/// Interaction sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub max_attempts: u32,
    /// Upper bound on waiting for a gossip/merchant window per attempt
    pub gossip_poll_window_ms: u64,
    pub gossip_poll_step_ms: u64,
    pub action_press_ms: u64,
    /// Pause after each attempt, cut short when the target is lost
    pub pause_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            gossip_poll_window_ms: 100,
            gossip_poll_step_ms: 20,
            action_press_ms: 100,
            pause_ms: 1_000,
        }
    }
}

impl InteractionConfig {
    pub fn gossip_poll_window(&self) -> Duration { ms(self.gossip_poll_window_ms) }
    pub fn gossip_poll_step(&self) -> Duration { ms(self.gossip_poll_step_ms) }
    pub fn action_press(&self) -> Duration { ms(self.action_press_ms) }
    pub fn pause(&self) -> Duration { ms(self.pause_ms) }
}

/// Interrupt watchdog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    /// Pause between predicate evaluations while armed
    pub poll_interval_ms: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 5 }
    }
}

impl WatchdogConfig {
    pub fn poll_interval(&self) -> Duration { ms(self.poll_interval_ms) }
}

/// Root navigation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub movement: MovementConfig,
    pub steering: SteeringConfig,
    pub stop: StopConfig,
    pub stuck: StuckConfig,
    pub interaction: InteractionConfig,
    pub watchdog: WatchdogConfig,
}

impl NavConfig {
    /// Parse and validate a TOML document; missing sections use defaults
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: NavConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let m = &self.movement;
        m.default_profile.validate("movement.default_profile")?;
        m.relaxed_profile.validate("movement.relaxed_profile")?;
        m.mounted_profile.validate("movement.mounted_profile")?;
        positive("movement.replan_distance", m.replan_distance)?;
        positive("movement.approach_tolerance", m.approach_tolerance)?;
        if m.idle_rebuild_ms == 0 {
            return Err(ConfigError::Validation("movement.idle_rebuild_ms must be non-zero".into()));
        }

        positive("steering.turn_rate", self.steering.turn_rate)?;
        let ignore = self.steering.ignore_distance;
        if ignore.is_nan() || ignore < 0.0 {
            return Err(ConfigError::Validation(format!(
                "steering.ignore_distance must not be negative, got {}",
                ignore
            )));
        }

        let s = &self.stop;
        if s.forward_tap_min_ms >= s.forward_tap_max_ms || s.settle_min_ms >= s.settle_max_ms {
            return Err(ConfigError::Validation("stop ranges need min < max".into()));
        }

        positive("stuck.progress_epsilon", self.stuck.progress_epsilon)?;

        let i = &self.interaction;
        if i.max_attempts == 0 {
            return Err(ConfigError::Validation("interaction.max_attempts must be at least 1".into()));
        }
        if i.gossip_poll_step_ms == 0 {
            return Err(ConfigError::Validation("interaction.gossip_poll_step_ms must be non-zero".into()));
        }

        if self.watchdog.poll_interval_ms == 0 {
            return Err(ConfigError::Validation("watchdog.poll_interval_ms must be non-zero".into()));
        }
        Ok(())
    }
}

/// A goal that walks to a fixed spot and interacts with whoever stands there
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionGoalConfig {
    pub name: String,
    /// Code of the bound action input (a macro that targets the NPC)
    pub key: u16,
    #[serde(default = "InteractionGoalConfig::default_cost")]
    pub cost: f32,
    /// Only run when the agent's combat state matches
    #[serde(default)]
    pub in_combat: Option<bool>,
    /// Fixed path from the route destination to the interaction point.
    /// The first point is the route destination.
    #[serde(default)]
    pub path: Vec<WorldPoint>,
}

impl InteractionGoalConfig {
    fn default_cost() -> f32 {
        6.0
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }
}
