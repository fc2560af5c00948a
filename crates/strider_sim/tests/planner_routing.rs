//! The index-backed planner feeding a follower driven by recording fakes

use std::sync::Arc;

use strider_ai::config::WatchdogConfig;
use strider_ai::testing::FakeWorld;
use strider_ai::{
    GoalPorts, InteractionGoal, InteractionGoalConfig, InterruptWatchdog, NavConfig, NullSink, RoutePlanner,
    RouteFollower, TickOutcome,
};
use strider_math::WorldPoint;
use strider_mesh::{GeometryIndex, TriangleMesh};
use strider_sim::LinePlanner;

fn planner() -> Arc<LinePlanner> {
    let mesh = Arc::new(TriangleMesh::grid(WorldPoint::new(0.0, 0.0, 2.0), 20, 10, 10.0));
    let index = GeometryIndex::build(&mesh);
    Arc::new(LinePlanner::new(mesh, index, 40.0))
}

fn follower(world: &Arc<FakeWorld>, planner: Arc<LinePlanner>, destination: WorldPoint) -> RouteFollower {
    let ports = GoalPorts {
        planner,
        mount: world.clone(),
        blacklist: world.clone(),
        gossip: world.clone(),
    };
    let goal = InteractionGoal::new(
        InteractionGoalConfig {
            name: "Train".to_string(),
            key: 58,
            cost: 6.0,
            in_combat: None,
            path: vec![destination],
        },
        Box::new(|| true),
    );
    let watchdog = Arc::new(InterruptWatchdog::start(WatchdogConfig::default()).unwrap());

    RouteFollower::new(world.nav_context(), ports, watchdog, Arc::new(NullSink), goal, NavConfig::default())
        .unwrap()
}

#[test]
fn test_follower_takes_planner_samples() {
    let world = FakeWorld::shared();
    let start = WorldPoint::new(5.0, 5.0, 0.0);
    let destination = WorldPoint::new(185.0, 5.0, 0.0);
    world.set_position(start);
    world.set_mount_works(false);

    let planner = planner();
    let expected = planner.find_route(start, destination);
    assert!(expected.len() > 2);

    let mut follower = follower(&world, planner, destination);
    assert!(matches!(follower.tick().unwrap(), TickOutcome::Routing { .. }));

    assert_eq!(follower.route_snapshot(), expected);
    assert_eq!(world.height_hints().first().copied(), Some(2.0));
}

#[test]
fn test_off_mesh_destination_is_approached_directly() {
    let world = FakeWorld::shared();
    let start = WorldPoint::new(5.0, 5.0, 0.0);
    let destination = WorldPoint::new(400.0, 5.0, 0.0);
    world.set_position(start);
    world.set_mount_works(false);

    let mut follower = follower(&world, planner(), destination);
    follower.tick().unwrap();

    assert_eq!(follower.route_snapshot(), vec![destination]);
}
