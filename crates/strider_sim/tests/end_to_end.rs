//! Full navigation legs in the simulated world

use strider_ai::{AgentFeed, Clock, InteractionOutcome, TickOutcome};
use strider_math::{Rect2, WorldPoint};
use strider_sim::{Scenario, ScenarioConfig};

#[test]
fn test_full_leg_serves_npc() {
    let mut scenario = Scenario::build(ScenarioConfig::default()).unwrap();
    let summary = scenario.run().unwrap();

    assert_eq!(summary.report.outcome, InteractionOutcome::Completed);
    assert_eq!(summary.report.attempts, 5);
    assert!(summary.served);
    assert_eq!(summary.events as u32, summary.ticks);

    // walked back to the start of the fixed path
    let start = WorldPoint::new(200.0, 100.0, 0.0);
    assert!(summary.position.distance_xy_to(start) <= 6.0, "ended at {}", summary.position);
    assert!(summary.travelled > 200.0);
    assert!(!scenario.world.is_mounted());
}

#[test]
fn test_finished_leg_stays_idle() {
    let mut scenario = Scenario::build(ScenarioConfig::default()).unwrap();
    scenario.run().unwrap();

    let before = scenario.world.snapshot();
    for _ in 0..5 {
        assert_eq!(scenario.follower.tick().unwrap(), TickOutcome::Arrived);
    }
    let after = scenario.world.snapshot();

    assert_eq!(before.now, after.now);
    assert_eq!(before.position, after.position);
    assert!(scenario.follower.route_snapshot().is_empty());
}

#[test]
fn test_off_mesh_destination_uses_direct_approach() {
    let mut config = ScenarioConfig::default();
    config.goal.path = vec![WorldPoint::new(320.0, 100.0, 0.0), WorldPoint::new(330.0, 100.0, 0.0)];
    config.npc.position = WorldPoint::new(332.0, 100.0, 0.0);

    let mut scenario = Scenario::build(config).unwrap();
    let summary = scenario.run().unwrap();

    assert!(summary.served);
    assert_eq!(summary.report.outcome, InteractionOutcome::Completed);
}

#[test]
fn test_wall_triggers_recovery() {
    let mut config = ScenarioConfig::default();
    config.max_ticks = 200;
    let mut scenario = Scenario::build(config).unwrap();
    scenario.world.add_obstacle(Rect2::new(60.0, -50.0, 64.0, 200.0));

    let mut stalled = false;
    for _ in 0..200 {
        if let TickOutcome::Stalled { .. } = scenario.follower.tick().unwrap() {
            stalled = true;
            break;
        }
    }

    assert!(stalled);
    assert!(scenario.world.position().x < 60.0);
    assert!(scenario.world.now() > std::time::Duration::from_secs(2));
}

#[test]
fn test_index_stats_reported() {
    let scenario = Scenario::build(ScenarioConfig::default()).unwrap();
    let stats = scenario.index_stats;

    assert_eq!(stats.triangles, 35 * 25 * 2);
    assert!(stats.cells > 0);
    assert!(stats.max_per_cell >= 2);
}
