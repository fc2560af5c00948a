//! Recording test doubles
//!
//! [`FakeWorld`] implements every port plus [`Clock`]. It does not simulate
//! motion: tests move the agent with the setters. Presses and sleeps advance
//! its manual clock, and actuator calls are recorded in order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use strider_math::WorldPoint;

use crate::cancel::CancelToken;
use crate::clock::Clock;
use crate::ports::{
    Actuator, AgentFeed, Blacklist, EntityId, GoalPorts, GossipKind, GossipReader, InputKey, MountService,
    NavContext, RoutePlanner,
};

/// A recorded actuator call
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Hold(InputKey, bool),
    Press(InputKey, Duration),
    Tap(InputKey),
    SelectGossip(usize),
}

#[derive(Debug)]
struct State {
    now: Duration,
    position: WorldPoint,
    heading: f32,
    mounted: bool,
    in_combat: bool,
    travel_form: bool,
    health: u8,
    target: Option<EntityId>,
    action_target: Option<EntityId>,
    heights: Vec<f32>,
    held: HashSet<InputKey>,
    commands: Vec<Command>,
    route_response: Vec<WorldPoint>,
    route_requests: Vec<(WorldPoint, WorldPoint)>,
    mount_works: bool,
    mount_requests: usize,
    blacklisted: Vec<EntityId>,
    gossip: HashMap<GossipKind, usize>,
    merchant_open: bool,
}

impl Default for State {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            position: WorldPoint::ZERO,
            heading: 0.0,
            mounted: false,
            in_combat: false,
            travel_form: false,
            health: 100,
            target: None,
            action_target: None,
            heights: Vec::new(),
            held: HashSet::new(),
            commands: Vec::new(),
            route_response: Vec::new(),
            route_requests: Vec::new(),
            mount_works: true,
            mount_requests: 0,
            blacklisted: Vec::new(),
            gossip: HashMap::new(),
            merchant_open: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct FakeWorld {
    state: Mutex<State>,
}

impl FakeWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn nav_context(self: &Arc<Self>) -> NavContext {
        NavContext::new(self.clone(), self.clone(), self.clone())
    }

    pub fn goal_ports(self: &Arc<Self>) -> GoalPorts {
        GoalPorts {
            planner: self.clone(),
            mount: self.clone(),
            blacklist: self.clone(),
            gossip: self.clone(),
        }
    }

    pub fn set_position(&self, position: WorldPoint) {
        self.state.lock().position = position;
    }

    pub fn set_heading(&self, heading: f32) {
        self.state.lock().heading = heading;
    }

    pub fn set_mounted(&self, mounted: bool) {
        self.state.lock().mounted = mounted;
    }

    pub fn set_in_combat(&self, in_combat: bool) {
        self.state.lock().in_combat = in_combat;
    }

    pub fn set_travel_form(&self, travel_form: bool) {
        self.state.lock().travel_form = travel_form;
    }

    pub fn set_health(&self, health: u8) {
        self.state.lock().health = health;
    }

    pub fn set_target(&self, target: Option<EntityId>) {
        self.state.lock().target = target;
    }

    /// Entity selected whenever an action key is pressed
    pub fn set_action_target(&self, target: Option<EntityId>) {
        self.state.lock().action_target = target;
    }

    pub fn set_route_response(&self, route: Vec<WorldPoint>) {
        self.state.lock().route_response = route;
    }

    /// Whether `mount_up` actually mounts
    pub fn set_mount_works(&self, works: bool) {
        self.state.lock().mount_works = works;
    }

    pub fn set_gossip(&self, options: Vec<(GossipKind, usize)>) {
        self.state.lock().gossip = options.into_iter().collect();
    }

    pub fn set_merchant_open(&self, open: bool) {
        self.state.lock().merchant_open = open;
    }

    pub fn advance(&self, by: Duration) {
        self.state.lock().now += by;
    }

    pub fn commands(&self) -> Vec<Command> {
        self.state.lock().commands.clone()
    }

    pub fn clear_commands(&self) {
        self.state.lock().commands.clear();
    }

    pub fn route_requests(&self) -> Vec<(WorldPoint, WorldPoint)> {
        self.state.lock().route_requests.clone()
    }

    pub fn mount_requests(&self) -> usize {
        self.state.lock().mount_requests
    }

    pub fn blacklisted(&self) -> Vec<EntityId> {
        self.state.lock().blacklisted.clone()
    }

    /// Heights passed to [`AgentFeed::hint_height`]
    pub fn height_hints(&self) -> Vec<f32> {
        self.state.lock().heights.clone()
    }

    fn key_effect(state: &mut State, key: InputKey) {
        match key {
            InputKey::Action(_) => {
                if let Some(target) = state.action_target {
                    state.target = Some(target);
                }
            }
            InputKey::ClearTarget => state.target = None,
            InputKey::Dismount => state.mounted = false,
            _ => {}
        }
    }
}

impl AgentFeed for FakeWorld {
    fn position(&self) -> WorldPoint {
        self.state.lock().position
    }

    fn heading(&self) -> f32 {
        self.state.lock().heading
    }

    fn is_mounted(&self) -> bool {
        self.state.lock().mounted
    }

    fn in_combat(&self) -> bool {
        self.state.lock().in_combat
    }

    fn in_travel_form(&self) -> bool {
        self.state.lock().travel_form
    }

    fn health_percent(&self) -> u8 {
        self.state.lock().health
    }

    fn target(&self) -> Option<EntityId> {
        self.state.lock().target
    }

    fn hint_height(&self, z: f32) {
        self.state.lock().heights.push(z);
    }
}

impl Actuator for FakeWorld {
    fn set_held(&self, key: InputKey, held: bool) {
        let mut state = self.state.lock();
        if held {
            state.held.insert(key);
        } else {
            state.held.remove(&key);
        }
        state.commands.push(Command::Hold(key, held));
    }

    fn is_held(&self, key: InputKey) -> bool {
        self.state.lock().held.contains(&key)
    }

    fn press_for(&self, key: InputKey, duration: Duration, cancel: &CancelToken) {
        let mut state = self.state.lock();
        state.commands.push(Command::Press(key, duration));
        if !cancel.is_cancelled() {
            state.now += duration;
        }
        Self::key_effect(&mut state, key);
    }

    fn tap(&self, key: InputKey, _cancel: &CancelToken) {
        let mut state = self.state.lock();
        state.commands.push(Command::Tap(key));
        Self::key_effect(&mut state, key);
    }

    fn select_gossip_option(&self, index: usize) {
        self.state.lock().commands.push(Command::SelectGossip(index));
    }
}

impl Clock for FakeWorld {
    fn now(&self) -> Duration {
        self.state.lock().now
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        self.advance(duration);
        true
    }
}

impl RoutePlanner for FakeWorld {
    fn find_route(&self, from: WorldPoint, to: WorldPoint) -> Vec<WorldPoint> {
        let mut state = self.state.lock();
        state.route_requests.push((from, to));
        state.route_response.clone()
    }
}

impl MountService for FakeWorld {
    fn mount_up(&self) {
        let mut state = self.state.lock();
        state.mount_requests += 1;
        if state.mount_works && !state.in_combat {
            state.mounted = true;
        }
    }
}

impl Blacklist for FakeWorld {
    fn add(&self, entity: EntityId) {
        self.state.lock().blacklisted.push(entity);
    }
}

impl GossipReader for FakeWorld {
    fn option_count(&self) -> usize {
        self.state.lock().gossip.len()
    }

    fn option_index(&self, kind: GossipKind) -> Option<usize> {
        self.state.lock().gossip.get(&kind).copied()
    }

    fn merchant_open(&self) -> bool {
        self.state.lock().merchant_open
    }
}
