//! # strider_ai - Route Following and Steering
//!
//! Controllers that move an agent through the world by pressing inputs:
//!
//! - [`DirectionController`]: one timed turn toward a heading
//! - [`StopController`]: releases movement inputs that are still engaged
//! - [`StuckDetector`]: notices stalls and runs unstick maneuvers
//! - [`InterruptWatchdog`]: background worker that cancels a wait when a
//!   condition flips
//! - [`Interactor`]: bounded-retry NPC interaction
//! - [`RouteFollower`]: the state machine tying them together
//!
//! Everything talks to the world through the traits in [`ports`] and to time
//! through [`Clock`], so the same code drives a live agent or a simulation.
//!
//! ## Example
//!
//! ```ignore
//! use strider_ai::prelude::*;
//!
//! let watchdog = Arc::new(InterruptWatchdog::start(config.watchdog.clone())?);
//! let mut follower = RouteFollower::new(ctx, ports, watchdog, events, goal, config)?;
//!
//! loop {
//!     match follower.tick()? {
//!         TickOutcome::Completed(report) => log::info!("{:?}", report),
//!         TickOutcome::Arrived => break,
//!         _ => {}
//!     }
//! }
//! ```

pub mod cancel;
pub mod clock;
pub mod config;
pub mod direction;
pub mod error;
pub mod events;
pub mod follower;
pub mod interaction;
pub mod movement;
pub mod ports;
pub mod route;
pub mod stop;
pub mod stuck;
pub mod watchdog;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cancel::CancelToken;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, InteractionGoalConfig, NavConfig};
pub use direction::{DirectionController, TurnCommand};
pub use error::{NavError, Result};
pub use events::{ActionEvent, ActionEventSink, GoalKey, NullSink};
pub use follower::{FollowState, RouteFollower, TickOutcome};
pub use interaction::{InteractionGoal, InteractionOutcome, InteractionReport, Interactor};
pub use movement::{MovementProfile, TravelMode, WanderMode};
pub use ports::{
    Actuator, AgentFeed, Blacklist, EntityId, GoalPorts, GossipKind, GossipReader, InputKey, MountService,
    NavContext, RoutePlanner,
};
pub use route::Route;
pub use stop::StopController;
pub use stuck::StuckDetector;
pub use watchdog::{InterruptPredicate, InterruptWatchdog};

pub mod prelude {
    pub use crate::cancel::CancelToken;
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::config::{InteractionGoalConfig, NavConfig};
    pub use crate::error::{NavError, Result};
    pub use crate::events::{ActionEvent, ActionEventSink, GoalKey};
    pub use crate::follower::{FollowState, RouteFollower, TickOutcome};
    pub use crate::interaction::{InteractionGoal, InteractionOutcome, InteractionReport};
    pub use crate::ports::*;
    pub use crate::watchdog::InterruptWatchdog;
    pub use std::sync::Arc;
}
