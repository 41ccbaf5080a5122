//! Two-slot ship lifecycle orchestration.
//!
//! One slot holds the ship approaching or sitting at the dock, the
//! other holds the ship departing after a routing decision. Handing a
//! ship from the coming slot to the going slot frees the dock for the
//! next arrival while the previous one is still sailing away.

use hecs::Entity;
use log::debug;
use portwatch_logic::dimensions::random_dimensions;
use portwatch_logic::spline::{Spline, Vec3};
use rand::Rng;

use crate::placement::{assemble, AssembledShip, AssemblyError};
use crate::pool::AssetPool;
use crate::scene::{SceneError, SceneGraph, Transform};
use crate::score::{Destination, Scoreboard};
use crate::walker::{ShipProfile, SplineWalker, WalkerStep};

/// The three fixed routes through the harbor.
#[derive(Debug, Clone)]
pub struct Routes {
    pub approach: Spline,
    pub city: Spline,
    pub out: Spline,
}

impl Routes {
    pub fn departure(&self, destination: Destination) -> &Spline {
        match destination {
            Destination::City => &self.city,
            Destination::Out => &self.out,
        }
    }

    /// Straight-line stand-in routes: open sea to the dock, dock to
    /// the city gate, dock back out to sea.
    pub fn straight_harbor() -> Self {
        Self {
            approach: Spline::line(Vec3::new(-60.0, 0.0, 35.0), Vec3::ZERO),
            city: Spline::line(Vec3::ZERO, Vec3::new(45.0, 0.0, -20.0)),
            out: Spline::line(Vec3::ZERO, Vec3::new(-60.0, 0.0, -35.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficError {
    /// A ship already occupies the coming slot.
    SlotOccupied,
    /// No ship has been spawned into the coming slot.
    NoShipAtDock,
    /// The coming ship has not finished its approach yet.
    ShipStillApproaching,
    /// The previous ship is still sailing its departure route.
    DepartureInProgress,
    /// The pool had no hull for a new ship.
    HullUnavailable,
    Scene(SceneError),
}

impl From<SceneError> for TrafficError {
    fn from(err: SceneError) -> Self {
        TrafficError::Scene(err)
    }
}

impl From<AssemblyError> for TrafficError {
    fn from(err: AssemblyError) -> Self {
        match err {
            AssemblyError::HullUnavailable => TrafficError::HullUnavailable,
            AssemblyError::Scene(e) => TrafficError::Scene(e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShipPhase {
    Approaching,
    Docked,
}

struct ComingState {
    ship: AssembledShip,
    phase: ShipPhase,
}

struct GoingState {
    assets: Vec<Entity>,
    nice_content: bool,
    destination: Destination,
}

pub struct ShipTraffic {
    coming_slot: Entity,
    going_slot: Entity,
    coming_walker: SplineWalker,
    going_walker: SplineWalker,
    routes: Routes,
    coming: Option<ComingState>,
    going: Option<GoingState>,
}

impl ShipTraffic {
    pub fn new(scene: &mut SceneGraph, routes: Routes, walker_speed: f32) -> Self {
        Self {
            coming_slot: scene.spawn_node(),
            going_slot: scene.spawn_node(),
            coming_walker: SplineWalker::new(walker_speed),
            going_walker: SplineWalker::new(walker_speed),
            routes,
            coming: None,
            going: None,
        }
    }

    pub fn coming_slot(&self) -> Entity {
        self.coming_slot
    }

    pub fn going_slot(&self) -> Entity {
        self.going_slot
    }

    /// Whether the coming slot is free for a new spawn. Occupancy is
    /// the slot's child count, not a separate flag.
    pub fn no_ship_spawned(&self, scene: &SceneGraph) -> bool {
        scene.child_count(self.coming_slot) == 0
    }

    /// The coming ship, once it has finished its approach.
    pub fn docked_ship(&self) -> Option<&AssembledShip> {
        match &self.coming {
            Some(state) if state.phase == ShipPhase::Docked => Some(&state.ship),
            _ => None,
        }
    }

    pub fn ship_departing(&self) -> bool {
        self.going.is_some()
    }

    /// Spawn, assemble and launch a new ship toward the dock.
    pub fn new_ship(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), TrafficError> {
        if !self.no_ship_spawned(scene) {
            return Err(TrafficError::SlotOccupied);
        }

        let dimensions = random_dimensions(rng);
        let nice_content = rng.gen_bool(0.5);
        let ship = assemble(
            scene,
            pool,
            self.coming_slot,
            dimensions,
            nice_content,
            rng,
        )?;

        let origin = scene
            .position_of(self.coming_slot)
            .ok_or(SceneError::Missing)?;
        let profile = ShipProfile::padded(&ship.dimensions);
        let offset = SplineWalker::entrance_for(&self.routes.approach, origin, &profile);
        self.coming_walker.begin(offset);

        debug!(
            "new ship: {}x{} tiles, {} assets, nice={}",
            dimensions.length_count,
            dimensions.width_count,
            ship.chosen.len(),
            nice_content
        );
        self.coming = Some(ComingState {
            ship,
            phase: ShipPhase::Approaching,
        });
        Ok(())
    }

    /// Hand the docked ship over to the going slot and launch it on
    /// the chosen route. The coming slot returns to the origin, free
    /// for the next spawn. Only one ship departs at a time; routing
    /// is rejected while the previous departure is still in flight.
    pub fn set_ship_to_going(
        &mut self,
        scene: &mut SceneGraph,
        destination: Destination,
    ) -> Result<(), TrafficError> {
        let state = self.coming.take().ok_or(TrafficError::NoShipAtDock)?;
        if state.phase == ShipPhase::Approaching {
            self.coming = Some(state);
            return Err(TrafficError::ShipStillApproaching);
        }
        if self.going.is_some() {
            self.coming = Some(state);
            return Err(TrafficError::DepartureInProgress);
        }

        let dock = scene
            .transform_of(self.coming_slot)
            .ok_or(SceneError::Missing)?;
        scene.set_transform(self.going_slot, dock)?;
        for &entity in &state.ship.chosen {
            scene.reparent(entity, self.going_slot)?;
        }
        scene.set_transform(self.coming_slot, Transform::default())?;

        self.going_walker.begin(self.coming_walker.entrance_offset());
        debug!("ship departing toward {:?}", destination);
        self.going = Some(GoingState {
            assets: state.ship.chosen,
            nice_content: state.ship.nice_content,
            destination,
        });
        Ok(())
    }

    /// Return every departing asset to the pool and reset the slot.
    pub fn despawn_going(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
    ) -> Result<(), TrafficError> {
        if let Some(state) = self.going.take() {
            for &entity in &state.assets {
                pool.release(scene, entity)?;
            }
            scene.set_transform(self.going_slot, Transform::default())?;
            debug!("going ship despawned, {} assets released", state.assets.len());
        }
        Ok(())
    }

    /// Advance both walkers by `dt`. A finishing approach parks the
    /// ship at the dock; a finishing departure records the score and
    /// despawns.
    pub fn tick(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        scoreboard: &mut Scoreboard,
        dt: f32,
    ) -> Result<(), TrafficError> {
        match self.coming_walker.advance(&self.routes.approach, dt) {
            WalkerStep::Idle => {}
            WalkerStep::Moving(position) => {
                scene.set_position(self.coming_slot, position)?;
            }
            WalkerStep::Arrived(position) => {
                scene.set_position(self.coming_slot, position)?;
                if let Some(state) = self.coming.as_mut() {
                    state.phase = ShipPhase::Docked;
                    debug!("ship docked");
                }
            }
        }

        let going_step = match self.going.as_ref() {
            Some(state) => self
                .going_walker
                .advance(self.routes.departure(state.destination), dt),
            None => WalkerStep::Idle,
        };
        match going_step {
            WalkerStep::Idle => {}
            WalkerStep::Moving(position) => {
                scene.set_position(self.going_slot, position)?;
            }
            WalkerStep::Arrived(position) => {
                scene.set_position(self.going_slot, position)?;
                if let Some(state) = self.going.as_ref() {
                    let success = scoreboard.record(state.nice_content, state.destination);
                    debug!(
                        "ship arrived via {:?}: {}",
                        state.destination,
                        if success { "success" } else { "failure" }
                    );
                }
                self.despawn_going(scene, pool)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{PartClass, PoolInventory};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn harbor() -> (SceneGraph, AssetPool, ShipTraffic) {
        let mut scene = SceneGraph::new();
        let pool = AssetPool::populate(&mut scene, &PoolInventory::default_inventory());
        let traffic = ShipTraffic::new(&mut scene, Routes::straight_harbor(), 0.5);
        (scene, pool, traffic)
    }

    fn single_hull_harbor() -> (SceneGraph, AssetPool, ShipTraffic) {
        let mut scene = SceneGraph::new();
        let mut inventory = PoolInventory::default_inventory();
        for entry in &mut inventory.counts {
            if entry.0 == PartClass::Hull {
                entry.1 = 1;
            }
        }
        let pool = AssetPool::populate(&mut scene, &inventory);
        let traffic = ShipTraffic::new(&mut scene, Routes::straight_harbor(), 0.5);
        (scene, pool, traffic)
    }

    fn tick_until_docked(
        scene: &mut SceneGraph,
        pool: &AssetPool,
        traffic: &mut ShipTraffic,
        scoreboard: &mut Scoreboard,
    ) {
        for _ in 0..8 {
            traffic.tick(scene, pool, scoreboard, 1.0).unwrap();
            if traffic.docked_ship().is_some() {
                return;
            }
        }
        panic!("ship never docked");
    }

    #[test]
    fn spawn_occupies_the_coming_slot() {
        let (mut scene, pool, mut traffic) = harbor();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(traffic.no_ship_spawned(&scene));
        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        assert!(!traffic.no_ship_spawned(&scene));

        // Second spawn while occupied is rejected.
        assert_eq!(
            traffic.new_ship(&mut scene, &pool, &mut rng),
            Err(TrafficError::SlotOccupied)
        );
    }

    #[test]
    fn routing_requires_a_docked_ship() {
        let (mut scene, pool, mut traffic) = harbor();
        let mut rng = StdRng::seed_from_u64(2);

        assert_eq!(
            traffic.set_ship_to_going(&mut scene, Destination::City),
            Err(TrafficError::NoShipAtDock)
        );

        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        assert_eq!(
            traffic.set_ship_to_going(&mut scene, Destination::City),
            Err(TrafficError::ShipStillApproaching)
        );
    }

    #[test]
    fn full_lifecycle_restores_the_pool() {
        let (mut scene, pool, mut traffic) = harbor();
        let mut rng = StdRng::seed_from_u64(3);
        let mut scoreboard = Scoreboard::new();
        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        tick_until_docked(&mut scene, &pool, &mut traffic, &mut scoreboard);

        let nice = traffic.docked_ship().unwrap().nice_content;
        traffic
            .set_ship_to_going(&mut scene, Destination::City)
            .unwrap();
        assert!(traffic.no_ship_spawned(&scene));
        assert!(traffic.ship_departing());

        for _ in 0..8 {
            traffic.tick(&mut scene, &pool, &mut scoreboard, 1.0).unwrap();
        }
        assert!(!traffic.ship_departing());
        assert_eq!(scoreboard.total(), 1);
        assert_eq!(scoreboard.successes, u32::from(nice));
        assert_eq!(scoreboard.failures, u32::from(!nice));

        // Everything went back: all pool entries inactive again.
        let active = scene
            .world
            .query::<&crate::scene::Active>()
            .iter()
            .filter(|(_, a)| a.0)
            .count();
        // Only the three grouping nodes (pool root + two slots) stay active.
        assert_eq!(active, 3);
    }

    #[test]
    fn dock_frees_while_previous_ship_departs() {
        let (mut scene, pool, mut traffic) = harbor();
        let mut rng = StdRng::seed_from_u64(4);
        let mut scoreboard = Scoreboard::new();

        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        tick_until_docked(&mut scene, &pool, &mut traffic, &mut scoreboard);
        traffic
            .set_ship_to_going(&mut scene, Destination::Out)
            .unwrap();

        // A new ship can spawn immediately, mid-departure.
        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        assert!(!traffic.no_ship_spawned(&scene));
        assert!(traffic.ship_departing());
    }

    #[test]
    fn failed_spawn_leaves_the_pool_and_slot_untouched() {
        let (mut scene, pool, mut traffic) = single_hull_harbor();
        let mut rng = StdRng::seed_from_u64(6);
        let mut scoreboard = Scoreboard::new();

        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        tick_until_docked(&mut scene, &pool, &mut traffic, &mut scoreboard);
        traffic
            .set_ship_to_going(&mut scene, Destination::Out)
            .unwrap();

        // The only hull is sailing away, so the next spawn must fail
        // without consuming anything or occupying the dock.
        let floors = pool.available(&scene, PartClass::BaseFloor);
        let beams = pool.available(&scene, PartClass::WidthBeam);
        assert_eq!(
            traffic.new_ship(&mut scene, &pool, &mut rng),
            Err(TrafficError::HullUnavailable)
        );
        assert_eq!(pool.available(&scene, PartClass::BaseFloor), floors);
        assert_eq!(pool.available(&scene, PartClass::WidthBeam), beams);
        assert!(traffic.no_ship_spawned(&scene));

        // Once the departure finishes, spawning works again.
        for _ in 0..8 {
            traffic.tick(&mut scene, &pool, &mut scoreboard, 1.0).unwrap();
        }
        assert!(!traffic.ship_departing());
        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
    }

    #[test]
    fn second_departure_waits_for_the_first() {
        let (mut scene, pool, mut traffic) = harbor();
        let mut rng = StdRng::seed_from_u64(8);
        let mut scoreboard = Scoreboard::new();

        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        tick_until_docked(&mut scene, &pool, &mut traffic, &mut scoreboard);
        traffic
            .set_ship_to_going(&mut scene, Destination::Out)
            .unwrap();

        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        // Force the second ship straight to the dock while the first
        // is still sailing away.
        traffic.coming.as_mut().unwrap().phase = ShipPhase::Docked;
        assert_eq!(
            traffic.set_ship_to_going(&mut scene, Destination::City),
            Err(TrafficError::DepartureInProgress)
        );
        // The docked ship stays put for a later attempt.
        assert!(traffic.docked_ship().is_some());
        assert!(traffic.ship_departing());
    }

    #[test]
    fn coming_slot_resets_to_origin_after_handover() {
        let (mut scene, pool, mut traffic) = harbor();
        let mut rng = StdRng::seed_from_u64(5);
        let mut scoreboard = Scoreboard::new();

        traffic.new_ship(&mut scene, &pool, &mut rng).unwrap();
        tick_until_docked(&mut scene, &pool, &mut traffic, &mut scoreboard);
        let dock_pos = scene.position_of(traffic.coming_slot()).unwrap();
        assert_ne!(dock_pos, Vec3::ZERO);

        traffic
            .set_ship_to_going(&mut scene, Destination::City)
            .unwrap();
        assert_eq!(scene.position_of(traffic.coming_slot()), Some(Vec3::ZERO));
        assert_eq!(scene.position_of(traffic.going_slot()), Some(dock_pos));
    }
}
