//! Movement profiles
//!
//! The heading tolerance follows the wander mode and the waypoint reach
//! distance follows how the agent travels. The two axes are independent: a
//! mounted agent in relaxed wander mode gets the relaxed angle and the
//! mounted reach distance.

use serde::{Deserialize, Serialize};

use crate::config::{MovementConfig, ProfileTolerance};
use crate::ports::AgentFeed;

/// Heading tolerance axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WanderMode {
    /// Unattended: tight heading tolerance
    #[default]
    Strict,
    /// Attended: loose heading tolerance
    Relaxed,
}

/// Reach distance axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    OnFoot,
    /// Mounted or in travel form: waypoints count as reached from further away
    Mounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MovementProfile {
    pub wander: WanderMode,
    pub travel: TravelMode,
}

impl MovementProfile {
    pub fn select(feed: &dyn AgentFeed, relaxed_wander: bool) -> Self {
        let wander = if relaxed_wander { WanderMode::Relaxed } else { WanderMode::Strict };
        let travel = if feed.is_mounted() || feed.in_travel_form() {
            TravelMode::Mounted
        } else {
            TravelMode::OnFoot
        };
        Self { wander, travel }
    }

    /// Angle from the wander axis, reach distance from the travel axis
    pub fn tolerance(self, config: &MovementConfig) -> ProfileTolerance {
        let wander_angle = match self.wander {
            WanderMode::Strict => config.default_profile.wander_angle,
            WanderMode::Relaxed => config.relaxed_profile.wander_angle,
        };
        let reach_distance = match self.travel {
            TravelMode::OnFoot => config.default_profile.reach_distance,
            TravelMode::Mounted => config.mounted_profile.reach_distance,
        };
        ProfileTolerance { wander_angle, reach_distance }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeWorld;

    fn profile(wander: WanderMode, travel: TravelMode) -> MovementProfile {
        MovementProfile { wander, travel }
    }

    #[test]
    fn test_selection() {
        let world = FakeWorld::new();
        assert_eq!(
            MovementProfile::select(&world, false),
            profile(WanderMode::Strict, TravelMode::OnFoot)
        );
        assert_eq!(
            MovementProfile::select(&world, true),
            profile(WanderMode::Relaxed, TravelMode::OnFoot)
        );

        world.set_travel_form(true);
        assert_eq!(
            MovementProfile::select(&world, true),
            profile(WanderMode::Relaxed, TravelMode::Mounted)
        );

        world.set_travel_form(false);
        world.set_mounted(true);
        assert_eq!(
            MovementProfile::select(&world, false),
            profile(WanderMode::Strict, TravelMode::Mounted)
        );
    }

    #[test]
    fn test_tolerances() {
        let config = MovementConfig::default();
        let strict = profile(WanderMode::Strict, TravelMode::OnFoot).tolerance(&config);
        assert_eq!(strict.wander_angle, 0.05);
        assert_eq!(strict.reach_distance, 20.0);

        let relaxed = profile(WanderMode::Relaxed, TravelMode::OnFoot).tolerance(&config);
        assert_eq!(relaxed.wander_angle, 0.3);
        assert_eq!(relaxed.reach_distance, 20.0);
    }

    #[test]
    fn test_mounted_relaxed_keeps_both_axes() {
        let config = MovementConfig::default();
        let tolerance = profile(WanderMode::Relaxed, TravelMode::Mounted).tolerance(&config);
        assert_eq!(tolerance.wander_angle, 0.3);
        assert_eq!(tolerance.reach_distance, 50.0);

        let mounted = profile(WanderMode::Strict, TravelMode::Mounted).tolerance(&config);
        assert_eq!(mounted.wander_angle, 0.05);
        assert_eq!(mounted.reach_distance, 50.0);
    }
}
