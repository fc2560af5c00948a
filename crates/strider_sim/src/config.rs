//! Scenario files
//!
//! A scenario describes the map, the agent's start, one NPC and the goal
//! that walks to it. Every section is optional.
//!
//! ```toml
//! start = { x = 0.0, y = 0.0, z = 0.0 }
//!
//! [map]
//! cols = 30
//! rows = 20
//! cell_size = 10.0
//!
//! [npc]
//! id = 42
//! position = { x = 212.0, y = 100.0, z = 0.0 }
//! gossip = ["gossip", "vendor"]
//!
//! [goal]
//! name = "Sell"
//! key = 56
//! path = [{ x = 200.0, y = 100.0, z = 0.0 }, { x = 210.0, y = 100.0, z = 0.0 }]
//!
//! [nav.movement]
//! relaxed_wander = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use strider_ai::{GossipKind, InteractionGoalConfig, NavConfig};
use strider_math::{consts::PI, WorldPoint};
use strider_mesh::IndexConfig;

use crate::error::Result;

/// Agent kinematics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Units per second on foot
    pub walk_speed: f32,
    /// Units per second mounted
    pub mounted_speed: f32,
    /// Radians per second while a turn key is held
    pub turn_rate: f32,
    /// Integration step
    pub step_ms: u64,
    /// Interact and trade reach
    pub interact_range: f32,
    /// Reach of the targeting macro
    pub action_range: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            walk_speed: 7.0,
            mounted_speed: 14.0,
            turn_rate: PI,
            step_ms: 10,
            interact_range: 10.0,
            action_range: 30.0,
        }
    }
}

/// Flat walkable grid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub origin: WorldPoint,
    pub cols: u32,
    pub rows: u32,
    pub cell_size: f32,
    pub index: IndexConfig,
    /// Spacing of planned waypoints
    pub waypoint_spacing: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            origin: WorldPoint::new(-50.0, -50.0, 0.0),
            cols: 35,
            rows: 25,
            cell_size: 10.0,
            index: IndexConfig::default(),
            waypoint_spacing: 40.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NpcConfig {
    pub id: u64,
    pub position: WorldPoint,
    /// Gossip options in window order
    pub gossip: Vec<GossipKind>,
}

impl Default for NpcConfig {
    fn default() -> Self {
        Self {
            id: 42,
            position: WorldPoint::new(212.0, 100.0, 0.0),
            gossip: vec![GossipKind::Gossip, GossipKind::Vendor],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub start: WorldPoint,
    pub max_ticks: u32,
    pub sim: SimConfig,
    pub map: MapConfig,
    pub npc: NpcConfig,
    pub goal: InteractionGoalConfig,
    pub nav: NavConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            start: WorldPoint::ZERO,
            max_ticks: 1_000,
            sim: SimConfig::default(),
            map: MapConfig::default(),
            npc: NpcConfig::default(),
            goal: InteractionGoalConfig {
                name: "Sell".to_string(),
                key: 56,
                cost: 6.0,
                in_combat: Some(false),
                path: vec![WorldPoint::new(200.0, 100.0, 0.0), WorldPoint::new(210.0, 100.0, 0.0)],
            },
            nav: NavConfig::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scenario: ScenarioConfig = toml::from_str(content)?;
        scenario.nav.validate().map_err(strider_ai::NavError::from)?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scenario_is_default() {
        let scenario = ScenarioConfig::from_toml_str("").unwrap();
        assert_eq!(scenario.goal.name, "Sell");
        assert_eq!(scenario.map.index.resolution, 2.0);
        assert_eq!(scenario.sim.walk_speed, 7.0);
    }

    #[test]
    fn test_overrides() {
        let scenario = ScenarioConfig::from_toml_str(
            r#"
            max_ticks = 10
            start = { x = 5.0, y = 6.0, z = 0.0 }

            [map.index]
            resolution = 4.0
            overlap = "triangle"

            [npc]
            gossip = ["vendor"]

            [nav.interaction]
            max_attempts = 2
            "#,
        )
        .unwrap();

        assert_eq!(scenario.max_ticks, 10);
        assert_eq!(scenario.start, WorldPoint::new(5.0, 6.0, 0.0));
        assert_eq!(scenario.map.index.overlap, strider_mesh::OverlapMode::Triangle);
        assert_eq!(scenario.npc.gossip, vec![GossipKind::Vendor]);
        assert_eq!(scenario.nav.interaction.max_attempts, 2);
    }

    #[test]
    fn test_invalid_nav_section_rejected() {
        assert!(ScenarioConfig::from_toml_str("[nav.interaction]\nmax_attempts = 0\n").is_err());
    }
}
