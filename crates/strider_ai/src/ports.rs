//! Collaborator interfaces
//!
//! The controllers only talk to the outside world through these traits. All
//! methods take `&self`; implementations use interior mutability so one world
//! object can be shared behind `Arc` by every controller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strider_math::WorldPoint;

use crate::cancel::CancelToken;
use crate::clock::Clock;

/// Identifier of a selectable entity (NPC, mob, object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Abstract input identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKey {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    Interact,
    ClearTarget,
    Jump,
    Dismount,
    /// A user-bound action, identified by its key code
    Action(u16),
}

/// Semantic kind of a gossip option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GossipKind {
    Vendor,
    Trainer,
    Taxi,
    Banker,
    Binder,
    Gossip,
}

/// Position, orientation and state of the controlled agent
pub trait AgentFeed: Send + Sync {
    fn position(&self) -> WorldPoint;

    /// Facing in radians, `[0, 2π)`, counter-clockwise from +x
    fn heading(&self) -> f32;

    fn is_mounted(&self) -> bool;

    fn in_combat(&self) -> bool;

    /// Shapeshifted into a fast travel form
    fn in_travel_form(&self) -> bool {
        false
    }

    fn health_percent(&self) -> u8;

    fn is_dead(&self) -> bool {
        self.health_percent() == 0
    }

    /// Currently selected entity
    fn target(&self) -> Option<EntityId>;

    /// Ground height of the next waypoint, for feeds that cannot read it
    fn hint_height(&self, _z: f32) {}
}

/// Input device of the agent
pub trait Actuator: Send + Sync {
    /// Press or release a key and keep it in that state
    fn set_held(&self, key: InputKey, held: bool);

    fn is_held(&self, key: InputKey) -> bool;

    /// Hold `key` for `duration`, releasing early if `cancel` fires.
    /// Blocks for at most `duration`.
    fn press_for(&self, key: InputKey, duration: Duration, cancel: &CancelToken);

    /// Short press and release
    fn tap(&self, key: InputKey, cancel: &CancelToken);

    /// Pick a gossip option by its index
    fn select_gossip_option(&self, index: usize);
}

/// Computes waypoint routes; an empty route means failure
pub trait RoutePlanner: Send + Sync {
    /// Ordered waypoints from `from` to `to`, nearest first
    fn find_route(&self, from: WorldPoint, to: WorldPoint) -> Vec<WorldPoint>;
}

pub trait MountService: Send + Sync {
    /// Best effort; may do nothing when mounted or in combat
    fn mount_up(&self);
}

/// Entities that target selection elsewhere should avoid
pub trait Blacklist: Send + Sync {
    fn add(&self, entity: EntityId);
}

/// Interaction window state
pub trait GossipReader: Send + Sync {
    fn option_count(&self) -> usize;

    fn option_index(&self, kind: GossipKind) -> Option<usize>;

    fn merchant_open(&self) -> bool;
}

/// Ports every movement controller needs
#[derive(Clone)]
pub struct NavContext {
    pub feed: Arc<dyn AgentFeed>,
    pub input: Arc<dyn Actuator>,
    pub clock: Arc<dyn Clock>,
}

impl NavContext {
    pub fn new(feed: Arc<dyn AgentFeed>, input: Arc<dyn Actuator>, clock: Arc<dyn Clock>) -> Self {
        Self { feed, input, clock }
    }
}

impl fmt::Debug for NavContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavContext").finish_non_exhaustive()
    }
}

/// Ports used only by the route-following goal
#[derive(Clone)]
pub struct GoalPorts {
    pub planner: Arc<dyn RoutePlanner>,
    pub mount: Arc<dyn MountService>,
    pub blacklist: Arc<dyn Blacklist>,
    pub gossip: Arc<dyn GossipReader>,
}

impl fmt::Debug for GoalPorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoalPorts").finish_non_exhaustive()
    }
}
