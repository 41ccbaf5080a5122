//! Orchestrating root: owns one of everything.
//!
//! The engine constructs its scene, pool, traffic and scoreboard
//! explicitly and threads references through every call, so multiple
//! independent simulations can coexist in one process. Whole runs are
//! reproducible from a single seed.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::placement::AssembledShip;
use crate::pool::{AssetPool, PoolInventory};
use crate::scene::SceneGraph;
use crate::score::{Destination, Scoreboard};
use crate::traffic::{Routes, ShipTraffic, TrafficError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarborConfig {
    pub seed: u64,
    pub walker_speed: f32,
    pub inventory: PoolInventory,
}

impl Default for HarborConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            walker_speed: 0.1,
            inventory: PoolInventory::default_inventory(),
        }
    }
}

pub struct HarborEngine {
    scene: SceneGraph,
    pool: AssetPool,
    traffic: ShipTraffic,
    scoreboard: Scoreboard,
    rng: StdRng,
}

impl HarborEngine {
    pub fn new(config: HarborConfig, routes: Routes) -> Self {
        let mut scene = SceneGraph::new();
        let pool = AssetPool::populate(&mut scene, &config.inventory);
        let traffic = ShipTraffic::new(&mut scene, routes, config.walker_speed);
        Self {
            scene,
            pool,
            traffic,
            scoreboard: Scoreboard::new(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// One simulation step: advance both walkers by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Result<(), TrafficError> {
        self.traffic
            .tick(&mut self.scene, &self.pool, &mut self.scoreboard, dt)
    }

    pub fn spawn_ship(&mut self) -> Result<(), TrafficError> {
        self.traffic
            .new_ship(&mut self.scene, &self.pool, &mut self.rng)
    }

    pub fn route_ship(&mut self, destination: Destination) -> Result<(), TrafficError> {
        self.traffic.set_ship_to_going(&mut self.scene, destination)
    }

    pub fn no_ship_spawned(&self) -> bool {
        self.traffic.no_ship_spawned(&self.scene)
    }

    pub fn docked_ship(&self) -> Option<&AssembledShip> {
        self.traffic.docked_ship()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneGraph {
        &mut self.scene
    }

    pub fn pool(&self) -> &AssetPool {
        &self.pool
    }

    pub fn traffic(&self) -> &ShipTraffic {
        &self.traffic
    }
}
