//! Kinematic agent world
//!
//! Implements every port of the navigation controllers on top of a tiny
//! simulation. Time only moves inside [`Clock::sleep`] and timed presses, in
//! fixed steps; held keys move and turn the agent during those steps.

use std::collections::HashSet;
use std::time::Duration;

use parking_lot::Mutex;
use strider_ai::{
    Actuator, AgentFeed, Blacklist, CancelToken, Clock, EntityId, GossipKind, GossipReader, InputKey,
    MountService,
};
use strider_math::{normalize_heading, Rect2, WorldPoint};

use crate::config::{NpcConfig, SimConfig};

/// Time a tap takes
const TAP: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct SimNpc {
    pub id: EntityId,
    pub position: WorldPoint,
    pub gossip: Vec<GossipKind>,
    /// Trade completed
    pub served: bool,
}

impl From<&NpcConfig> for SimNpc {
    fn from(config: &NpcConfig) -> Self {
        Self {
            id: EntityId(config.id),
            position: config.position,
            gossip: config.gossip.clone(),
            served: false,
        }
    }
}

/// Agent and world state
#[derive(Debug, Clone)]
pub struct SimState {
    pub now: Duration,
    pub position: WorldPoint,
    pub heading: f32,
    pub mounted: bool,
    pub in_combat: bool,
    pub health: u8,
    pub target: Option<EntityId>,
    pub held: HashSet<InputKey>,
    pub npcs: Vec<SimNpc>,
    /// Rectangles the agent cannot enter
    pub obstacles: Vec<Rect2>,
    pub blacklist: Vec<EntityId>,
    /// NPC whose gossip window is open
    pub window: Option<EntityId>,
    pub merchant_open: bool,
    /// Distance covered, for reporting
    pub travelled: f32,
}

pub struct SimWorld {
    config: SimConfig,
    state: Mutex<SimState>,
}

impl SimWorld {
    pub fn new(config: SimConfig, start: WorldPoint) -> Self {
        Self {
            config,
            state: Mutex::new(SimState {
                now: Duration::ZERO,
                position: start,
                heading: 0.0,
                mounted: false,
                in_combat: false,
                health: 100,
                target: None,
                held: HashSet::new(),
                npcs: Vec::new(),
                obstacles: Vec::new(),
                blacklist: Vec::new(),
                window: None,
                merchant_open: false,
                travelled: 0.0,
            }),
        }
    }

    pub fn add_npc(&self, npc: SimNpc) {
        self.state.lock().npcs.push(npc);
    }

    pub fn add_obstacle(&self, rect: Rect2) {
        self.state.lock().obstacles.push(rect);
    }

    pub fn set_in_combat(&self, in_combat: bool) {
        self.state.lock().in_combat = in_combat;
    }

    pub fn set_health(&self, health: u8) {
        self.state.lock().health = health;
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SimState {
        self.state.lock().clone()
    }

    pub fn is_served(&self, id: EntityId) -> bool {
        self.state.lock().npcs.iter().any(|npc| npc.id == id && npc.served)
    }

    /// Advance time, stopping early if `cancel` fires
    fn run_for(&self, duration: Duration, cancel: &CancelToken) -> bool {
        let step = Duration::from_millis(self.config.step_ms.max(1));
        let mut remaining = duration;

        while !remaining.is_zero() {
            if cancel.is_cancelled() {
                return false;
            }
            let dt = remaining.min(step);
            self.integrate(dt);
            remaining -= dt;
        }
        !cancel.is_cancelled()
    }

    fn integrate(&self, dt: Duration) {
        let mut state = self.state.lock();
        let secs = dt.as_secs_f32();
        state.now += dt;

        if state.health == 0 {
            return;
        }

        let mut turn = 0.0;
        if state.held.contains(&InputKey::TurnLeft) {
            turn += self.config.turn_rate * secs;
        }
        if state.held.contains(&InputKey::TurnRight) {
            turn -= self.config.turn_rate * secs;
        }
        state.heading = normalize_heading(state.heading + turn);

        let speed = if state.mounted {
            self.config.mounted_speed
        } else {
            self.config.walk_speed
        };
        let mut advance = 0.0;
        if state.held.contains(&InputKey::Forward) {
            advance += speed * secs;
        }
        if state.held.contains(&InputKey::Backward) {
            advance -= 0.5 * speed * secs;
        }
        if advance == 0.0 {
            return;
        }

        let (sin, cos) = state.heading.sin_cos();
        let next = WorldPoint::new(
            state.position.x + cos * advance,
            state.position.y + sin * advance,
            state.position.z,
        );
        if state.obstacles.iter().any(|rect| rect.contains_point(next.x, next.y)) {
            return;
        }

        state.travelled += advance.abs();
        state.position = next;
    }

    fn nearest_npc(state: &SimState, range: f32) -> Option<EntityId> {
        state
            .npcs
            .iter()
            .map(|npc| (npc.id, npc.position.distance_xy_to(state.position)))
            .filter(|(_, distance)| *distance <= range)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn on_tap(&self, key: InputKey) {
        let mut state = self.state.lock();
        match key {
            InputKey::Interact => {
                let candidate = state.target.or_else(|| Self::nearest_npc(&state, self.config.interact_range));
                let in_range = candidate.and_then(|id| {
                    state
                        .npcs
                        .iter()
                        .find(|npc| npc.id == id && npc.position.distance_xy_to(state.position) <= self.config.interact_range)
                        .map(|npc| npc.id)
                });
                if let Some(id) = in_range {
                    state.window = Some(id);
                }
            }
            InputKey::ClearTarget => {
                state.target = None;
                state.window = None;
                state.merchant_open = false;
            }
            InputKey::Dismount => state.mounted = false,
            InputKey::Action(_) => {
                // targeting macro, trades when close enough
                let Some(id) = Self::nearest_npc(&state, self.config.action_range) else {
                    return;
                };
                state.target = Some(id);
                let position = state.position;
                let range = self.config.interact_range;
                if let Some(npc) = state.npcs.iter_mut().find(|npc| npc.id == id) {
                    if npc.position.distance_xy_to(position) <= range {
                        npc.served = true;
                    }
                }
            }
            _ => {}
        }
    }
}

impl AgentFeed for SimWorld {
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

    fn health_percent(&self) -> u8 {
        self.state.lock().health
    }

    fn target(&self) -> Option<EntityId> {
        self.state.lock().target
    }

    /// The simulation has no ground model; the route supplies the height
    fn hint_height(&self, z: f32) {
        self.state.lock().position.z = z;
    }
}

impl Actuator for SimWorld {
    fn set_held(&self, key: InputKey, held: bool) {
        let mut state = self.state.lock();
        if held {
            state.held.insert(key);
        } else {
            state.held.remove(&key);
        }
    }

    fn is_held(&self, key: InputKey) -> bool {
        self.state.lock().held.contains(&key)
    }

    fn press_for(&self, key: InputKey, duration: Duration, cancel: &CancelToken) {
        self.set_held(key, true);
        self.run_for(duration, cancel);
        self.set_held(key, false);
        self.on_tap(key);
    }

    fn tap(&self, key: InputKey, cancel: &CancelToken) {
        self.on_tap(key);
        self.run_for(TAP, cancel);
    }

    fn select_gossip_option(&self, index: usize) {
        let mut state = self.state.lock();
        let Some(window) = state.window else {
            return;
        };
        let vendor = state
            .npcs
            .iter()
            .find(|npc| npc.id == window)
            .map_or(false, |npc| npc.gossip.get(index) == Some(&GossipKind::Vendor));
        if vendor {
            state.merchant_open = true;
        }
    }
}

impl Clock for SimWorld {
    fn now(&self) -> Duration {
        self.state.lock().now
    }

    fn sleep(&self, duration: Duration, cancel: &CancelToken) -> bool {
        self.run_for(duration, cancel)
    }
}

impl MountService for SimWorld {
    fn mount_up(&self) {
        let mut state = self.state.lock();
        if state.in_combat || state.mounted {
            return;
        }
        log::info!("Mounting up");
        state.mounted = true;
    }
}

impl Blacklist for SimWorld {
    fn add(&self, entity: EntityId) {
        log::debug!("Blacklisting {}", entity);
        self.state.lock().blacklist.push(entity);
    }
}

impl GossipReader for SimWorld {
    fn option_count(&self) -> usize {
        let state = self.state.lock();
        if state.merchant_open {
            return 0;
        }
        state
            .window
            .and_then(|id| state.npcs.iter().find(|npc| npc.id == id))
            .map_or(0, |npc| npc.gossip.len())
    }

    fn option_index(&self, kind: GossipKind) -> Option<usize> {
        let state = self.state.lock();
        let id = state.window?;
        let npc = state.npcs.iter().find(|npc| npc.id == id)?;
        npc.gossip.iter().position(|k| *k == kind)
    }

    fn merchant_open(&self) -> bool {
        self.state.lock().merchant_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strider_math::consts::PI;

    fn world() -> SimWorld {
        SimWorld::new(SimConfig::default(), WorldPoint::ZERO)
    }

    #[test]
    fn test_forward_press_moves_along_heading() {
        let world = world();
        world.press_for(InputKey::Forward, Duration::from_secs(1), &CancelToken::new());

        let state = world.snapshot();
        assert_relative_eq!(state.position.x, 7.0, epsilon = 1e-3);
        assert_relative_eq!(state.position.y, 0.0, epsilon = 1e-3);
        assert_eq!(state.now, Duration::from_secs(1));
        assert!(!world.is_held(InputKey::Forward));
    }

    #[test]
    fn test_turn_left_increases_heading() {
        let world = world();
        world.press_for(InputKey::TurnLeft, Duration::from_millis(500), &CancelToken::new());
        assert_relative_eq!(world.heading(), PI / 2.0, epsilon = 1e-4);

        world.press_for(InputKey::TurnRight, Duration::from_millis(1000), &CancelToken::new());
        assert_relative_eq!(world.heading(), 1.5 * PI, epsilon = 1e-4);
    }

    #[test]
    fn test_obstacle_blocks() {
        let world = world();
        world.add_obstacle(Rect2::new(2.0, -5.0, 4.0, 5.0));
        world.set_held(InputKey::Forward, true);
        world.sleep(Duration::from_secs(2), &CancelToken::new());

        assert!(world.position().x < 2.0);
    }

    #[test]
    fn test_cancelled_sleep_does_not_advance() {
        let world = world();
        let token = CancelToken::new();
        token.cancel();
        assert!(!world.sleep(Duration::from_secs(1), &token));
        assert_eq!(world.now(), Duration::ZERO);
    }

    #[test]
    fn test_vendor_flow() {
        let world = world();
        world.add_npc(SimNpc {
            id: EntityId(1),
            position: WorldPoint::new(3.0, 0.0, 0.0),
            gossip: vec![GossipKind::Gossip, GossipKind::Vendor],
            served: false,
        });
        let token = CancelToken::new();

        world.tap(InputKey::Interact, &token);
        assert_eq!(world.option_count(), 2);
        assert_eq!(world.option_index(GossipKind::Vendor), Some(1));

        world.select_gossip_option(1);
        assert!(world.merchant_open());

        world.press_for(InputKey::Action(56), Duration::from_millis(100), &token);
        assert_eq!(world.target(), Some(EntityId(1)));
        assert!(world.is_served(EntityId(1)));

        world.tap(InputKey::ClearTarget, &token);
        assert_eq!(world.target(), None);
        assert!(!world.merchant_open());
    }

    #[test]
    fn test_mount_and_dismount() {
        let world = world();
        world.mount_up();
        assert!(world.is_mounted());
        world.tap(InputKey::Dismount, &CancelToken::new());
        assert!(!world.is_mounted());

        world.set_in_combat(true);
        world.mount_up();
        assert!(!world.is_mounted());
    }
}
