//! # strider_sim - Simulated World
//!
//! A deterministic kinematic world implementing every port of `strider_ai`,
//! a straight-line route planner backed by the geometry index, and a runner
//! that drives a [`strider_ai::RouteFollower`] through a scenario.

pub mod config;
pub mod error;
pub mod planner;
pub mod scenario;
pub mod world;

pub mod prelude {
    pub use crate::config::{MapConfig, NpcConfig, ScenarioConfig, SimConfig};
    pub use crate::error::{Result, SimError};
    pub use crate::planner::LinePlanner;
    pub use crate::scenario::{RunSummary, Scenario};
    pub use crate::world::{SimNpc, SimState, SimWorld};
}

pub use prelude::*;
