//! Scenario runner: wires a simulated world to a route follower

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};
use strider_ai::{
    ActionEvent, Clock, EntityId, GoalPorts, InteractionGoal, InteractionReport, InterruptWatchdog, NavContext,
    RouteFollower, TickOutcome,
};
use strider_math::WorldPoint;
use strider_mesh::{GeometryIndex, IndexStats, TriangleMesh};

use crate::config::ScenarioConfig;
use crate::error::{Result, SimError};
use crate::planner::LinePlanner;
use crate::world::{SimNpc, SimWorld};

/// What a finished run looked like
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub ticks: u32,
    pub report: InteractionReport,
    pub served: bool,
    pub position: WorldPoint,
    pub travelled: f32,
    pub sim_time: Duration,
    pub events: usize,
}

pub struct Scenario {
    pub world: Arc<SimWorld>,
    pub follower: RouteFollower,
    pub index_stats: IndexStats,
    npc: EntityId,
    events: Receiver<ActionEvent>,
    max_ticks: u32,
}

impl Scenario {
    pub fn build(config: ScenarioConfig) -> Result<Self> {
        let map = &config.map;
        let mesh = Arc::new(TriangleMesh::grid(map.origin, map.cols, map.rows, map.cell_size));
        let index = GeometryIndex::build_with(&mesh, &map.index)?;
        let index_stats = *index.stats();
        log::info!(
            "Indexed {} triangles into {} cells (max {} per cell) in {:?}",
            index_stats.triangles,
            index_stats.cells,
            index_stats.max_per_cell,
            index_stats.build_time
        );

        let world = Arc::new(SimWorld::new(config.sim.clone(), config.start));
        let npc = SimNpc::from(&config.npc);
        let npc_id = npc.id;
        world.add_npc(npc);

        let planner = Arc::new(LinePlanner::new(mesh, index, map.waypoint_spacing));
        let ctx = NavContext::new(world.clone(), world.clone(), world.clone());
        let ports = GoalPorts {
            planner,
            mount: world.clone(),
            blacklist: world.clone(),
            gossip: world.clone(),
        };

        let watchdog = Arc::new(InterruptWatchdog::start(config.nav.watchdog.clone())?);
        let (sender, events) = unbounded();

        let served = Arc::clone(&world);
        let goal = InteractionGoal::new(config.goal.clone(), Box::new(move || !served.is_served(npc_id)));
        let follower = RouteFollower::new(ctx, ports, watchdog, Arc::new(sender), goal, config.nav.clone())?;

        Ok(Self {
            world,
            follower,
            index_stats,
            npc: npc_id,
            events,
            max_ticks: config.max_ticks,
        })
    }

    /// Tick until the leg completes
    pub fn run(&mut self) -> Result<RunSummary> {
        let mut events = 0;

        for tick in 1..=self.max_ticks {
            let outcome = self.follower.tick()?;
            events += self.events.try_iter().count();

            match outcome {
                TickOutcome::Completed(report) => {
                    let state = self.world.snapshot();
                    return Ok(RunSummary {
                        ticks: tick,
                        report,
                        served: self.world.is_served(self.npc),
                        position: state.position,
                        travelled: state.travelled,
                        sim_time: self.world.now(),
                        events,
                    });
                }
                TickOutcome::Stalled { unstuck } => {
                    log::info!("Tick {}: stalled (unstick: {})", tick, unstuck);
                }
                TickOutcome::Routing { next, distance } => {
                    log::trace!("Tick {}: heading for {} ({:.1} away)", tick, next, distance);
                }
                TickOutcome::Suspended | TickOutcome::Arrived => {}
            }
        }

        Err(SimError::TickLimit(self.max_ticks))
    }
}
