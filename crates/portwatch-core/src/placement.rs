//! Ship assembly: turns a dimension pair into a fully dressed ship.
//!
//! The phases run strictly in sequence against the coming slot:
//! warehouse structure, hull, sails, stairs, windows, hold cargo,
//! container contents. Layout generation is deterministic; randomness
//! only enters through dimension choice, cargo occupancy rolls and
//! content selection.

use std::collections::VecDeque;

use hecs::Entity;
use log::{debug, warn};
use portwatch_logic::dimensions::ShipDimensions;
use portwatch_logic::layout::{build_layout, PartKind, PartTally, StructureLayout};
use portwatch_logic::spline::Vec3;
use portwatch_logic::template::{trim_template, CargoCategory};
use rand::Rng;

use crate::interact::SealedCrate;
use crate::pool::{AssetPool, PartClass};
use crate::scene::{SceneError, SceneGraph};

/// Structure tiles sit half a unit above the slot origin.
const DECK_HEIGHT: f32 = 0.5;
/// Window offsets relative to the wall tile carrying it.
const WINDOW_HEIGHT_OFFSET: f32 = 1.6;
const WINDOW_TO_WALL_OFFSET: f32 = 0.8;
/// Chance a cargo-eligible cell actually receives an object.
const CARGO_OCCUPANCY: f32 = 0.8;
/// Cargo placement jitter, per horizontal axis.
const CARGO_JITTER: f32 = 0.05;
/// Hull sits below the deck and extends one tile past each grid end.
const HULL_SINK: f32 = 2.9;
const HULL_HEIGHT: f32 = 7.2;
/// Contents rest slightly above their container's base.
const CONTENT_LIFT: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyError {
    /// The pool had no inactive hull. Everything else degrades to a
    /// sparser ship, but a ship without a hull is not a ship.
    HullUnavailable,
    Scene(SceneError),
}

impl From<SceneError> for AssemblyError {
    fn from(err: SceneError) -> Self {
        AssemblyError::Scene(err)
    }
}

/// Everything the orchestrator needs to move, inspect and despawn a
/// ship after assembly.
pub struct AssembledShip {
    pub dimensions: ShipDimensions,
    pub nice_content: bool,
    pub layout: StructureLayout,
    pub hull: Entity,
    /// Every pool object activated for this ship, hull included.
    pub chosen: Vec<Entity>,
    pub small_containers: Vec<Entity>,
    pub large_containers: Vec<Entity>,
    pub double_containers: Vec<Entity>,
}

/// Run the full assembly sequence against `slot`. On failure every
/// asset activated so far is released back to the pool, so a failed
/// spawn leaves the slot empty and the pool as it was.
pub fn assemble(
    scene: &mut SceneGraph,
    pool: &AssetPool,
    slot: Entity,
    dimensions: ShipDimensions,
    nice_content: bool,
    rng: &mut impl Rng,
) -> Result<AssembledShip, AssemblyError> {
    let mut asm = ShipAssembler::new(slot, dimensions, nice_content);
    match asm.run(scene, pool, rng) {
        Ok(()) => asm.finish(),
        Err(err) => {
            asm.abort(scene, pool);
            Err(err)
        }
    }
}

struct ShipAssembler {
    slot: Entity,
    dimensions: ShipDimensions,
    nice_content: bool,
    layout: StructureLayout,
    /// Structure entity per grid cell, row-major. None on pool shortfall.
    assigned: Vec<Option<Entity>>,
    chosen: Vec<Entity>,
    hull: Option<Entity>,
    small_containers: Vec<Entity>,
    large_containers: Vec<Entity>,
    double_containers: Vec<Entity>,
}

impl ShipAssembler {
    fn new(slot: Entity, dimensions: ShipDimensions, nice_content: bool) -> Self {
        let layout = build_layout(dimensions.length_count, dimensions.width_count);
        let cell_count = dimensions.length_count * dimensions.width_count;
        Self {
            slot,
            dimensions,
            nice_content,
            layout,
            assigned: vec![None; cell_count],
            chosen: Vec::new(),
            hull: None,
            small_containers: Vec::new(),
            large_containers: Vec::new(),
            double_containers: Vec::new(),
        }
    }

    fn run(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), AssemblyError> {
        self.place_warehouse(scene, pool, rng)?;
        self.place_hull(scene, pool, rng)?;
        self.place_sails(scene, pool, rng)?;
        self.place_stairs(scene, pool, rng)?;
        self.place_windows(scene, pool, rng)?;
        self.place_cargo(scene, pool, rng)?;
        self.place_content(scene, pool, rng)
    }

    /// Undo a partial assembly: release everything activated so far.
    fn abort(&mut self, scene: &mut SceneGraph, pool: &AssetPool) {
        for &entity in &self.chosen {
            if pool.release(scene, entity).is_err() {
                warn!("rollback could not release {entity:?}");
            }
        }
        self.chosen.clear();
        self.assigned.fill(None);
        self.hull = None;
    }

    fn assigned_at(&self, row: usize, col: usize) -> Option<Entity> {
        self.assigned[row * self.dimensions.width_count + col]
    }

    fn cell_position(&self, origin: Vec3, row: usize, col: usize) -> Vec3 {
        Vec3::new(
            origin.x + col as f32 * self.dimensions.body_width,
            origin.y + DECK_HEIGHT,
            origin.z - row as f32 * self.dimensions.body_length,
        )
    }

    fn activate(&mut self, scene: &mut SceneGraph, entity: Entity) -> Result<(), SceneError> {
        scene.set_active(entity, true)?;
        self.chosen.push(entity);
        Ok(())
    }

    /// Phase 1: one structure tile per grid cell, plus the mast at the
    /// grid center. Per-kind stock is pulled in pool order and consumed
    /// row-major, so identical layouts always use identical tiles.
    fn place_warehouse(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), AssemblyError> {
        let tally = PartTally::of(&self.layout);
        let mut stock: Vec<(PartKind, VecDeque<Entity>)> = PartKind::ALL
            .iter()
            .map(|&kind| {
                let picked = pool.select(scene, kind.into(), tally.count(kind), true, rng);
                (kind, picked.into())
            })
            .collect();
        let mast = pool.select(scene, PartClass::Mast, 1, true, rng);

        let origin = scene.position_of(self.slot).ok_or(SceneError::Missing)?;
        let l_center = self.layout.length_center();
        let w_center = self.layout.width_center();

        for row in 0..self.dimensions.length_count {
            for col in 0..self.dimensions.width_count {
                let cell = self.layout.cell(row, col);
                let position = self.cell_position(origin, row, col);

                if row == l_center && col == w_center {
                    if let Some(&mast_entity) = mast.first() {
                        scene.set_parent_and_pos(
                            mast_entity,
                            self.slot,
                            position,
                            cell.y_rotation,
                        )?;
                        self.activate(scene, mast_entity)?;
                    }
                }

                let entity = stock
                    .iter_mut()
                    .find(|(kind, _)| *kind == cell.kind)
                    .and_then(|(_, queue)| queue.pop_front());
                if let Some(entity) = entity {
                    scene.set_parent_and_pos(entity, self.slot, position, cell.y_rotation)?;
                    self.activate(scene, entity)?;
                    self.assigned[row * self.dimensions.width_count + col] = Some(entity);
                }
            }
        }

        debug!(
            "warehouse placed: {} of {} tiles",
            self.assigned.iter().flatten().count(),
            tally.total()
        );
        Ok(())
    }

    /// Phase 2: the hull, centered under the grid and scaled to wrap
    /// it with one tile of padding fore and aft.
    fn place_hull(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), AssemblyError> {
        let picked = pool.select(scene, PartClass::Hull, 1, true, rng);
        let hull = *picked.first().ok_or(AssemblyError::HullUnavailable)?;

        let origin = scene.position_of(self.slot).ok_or(SceneError::Missing)?;
        let padded = (self.dimensions.length_count + 2) as f32;
        let width = self.dimensions.width_count as f32;
        let body_width = self.dimensions.body_width;
        let body_length = self.dimensions.body_length;

        let position = Vec3::new(
            origin.x + width * 0.5 * body_width - body_width * 0.5,
            origin.y - HULL_SINK,
            origin.z - padded * 0.1,
        );
        let scale = Vec3::new(
            body_width * width + 2.0,
            HULL_HEIGHT,
            body_length * padded + padded * 0.5,
        );

        scene.set_parent_pos_scale(hull, self.slot, position, 0.0, scale)?;
        self.activate(scene, hull)?;
        self.hull = Some(hull);
        Ok(())
    }

    /// Phase 3: sails along the deck centerline, counts taken from the
    /// hull's rig. Back sails astern, then mains, then wings.
    fn place_sails(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), AssemblyError> {
        let hull = self.hull.ok_or(AssemblyError::HullUnavailable)?;
        let rig = scene.hull_rig(hull).unwrap_or_default();

        let mut sails = pool.select(scene, PartClass::BackSail, rig.back_sails as usize, true, rng);
        sails.extend(pool.select(scene, PartClass::MainSail, rig.main_sails as usize, true, rng));
        sails.extend(pool.select(scene, PartClass::WingSail, rig.wing_sails as usize, true, rng));

        let origin = scene.position_of(self.slot).ok_or(SceneError::Missing)?;
        let center_x =
            origin.x + self.dimensions.width_center() as f32 * self.dimensions.body_width;
        let hold_length = self.dimensions.length_count as f32 * self.dimensions.body_length;
        let count = sails.len();

        for (index, &sail) in sails.iter().enumerate() {
            let z = origin.z - (index + 1) as f32 * hold_length / (count + 1) as f32;
            scene.set_parent_and_pos(
                sail,
                self.slot,
                Vec3::new(center_x, origin.y + DECK_HEIGHT, z),
                0.0,
            )?;
            self.activate(scene, sail)?;
        }
        Ok(())
    }

    /// Phase 4: one stairway down into the hold, near the stern. Short
    /// ships only get the two outboard positions; longer ships may also
    /// use the center aisle. Half the time a small container ends up
    /// tucked beneath it.
    fn place_stairs(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), AssemblyError> {
        let choice = if self.dimensions.length_count < 13 {
            rng.gen_range(0..2)
        } else {
            rng.gen_range(0..3)
        };
        let half = self.dimensions.width_count / 2;
        let col = match choice {
            0 => half - 2,
            1 => half + 2,
            _ => half,
        };
        let row = self.dimensions.length_count - 2;

        let anchor = match self.assigned_at(row, col) {
            Some(anchor) => anchor,
            None => return Ok(()),
        };
        let picked = pool.select(scene, PartClass::Stairs, 1, true, rng);
        if let Some(&stairs) = picked.first() {
            let base = scene.position_of(anchor).ok_or(SceneError::Missing)?;
            scene.set_parent_and_pos(
                stairs,
                self.slot,
                Vec3::new(base.x, base.y, base.z + 0.5),
                0.0,
            )?;
            self.activate(scene, stairs)?;
        }

        if rng.gen::<f32>() < 0.5 {
            self.place_item(
                scene,
                pool,
                rng,
                PartClass::SmallContainer,
                self.dimensions.length_count - 1,
                col,
                true,
            )?;
        }
        Ok(())
    }

    /// Phase 5: a porthole on every second window-wall per side.
    fn place_windows(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), AssemblyError> {
        let last_col = self.dimensions.width_count - 1;
        let mut spots: Vec<(usize, usize, f32)> = Vec::new();
        let mut left_count = 0usize;
        let mut right_count = 0usize;

        for row in 0..self.dimensions.length_count {
            if self.layout.cell(row, 0).kind == PartKind::Wall {
                if left_count % 2 == 0 {
                    spots.push((row, 0, -1.0));
                }
                left_count += 1;
            }
            if self.layout.cell(row, last_col).kind == PartKind::Wall {
                if right_count % 2 == 0 {
                    spots.push((row, last_col, 1.0));
                }
                right_count += 1;
            }
        }

        for (row, col, outboard) in spots {
            let anchor = match self.assigned_at(row, col) {
                Some(anchor) => anchor,
                None => continue,
            };
            let picked = pool.select(scene, PartClass::Window, 1, true, rng);
            let window = match picked.first() {
                Some(&window) => window,
                None => continue,
            };
            let base = scene.transform_of(anchor).ok_or(SceneError::Missing)?;
            let position = Vec3::new(
                base.position.x + outboard * WINDOW_TO_WALL_OFFSET,
                base.position.y + WINDOW_HEIGHT_OFFSET,
                base.position.z,
            );
            scene.set_parent_and_pos(window, self.slot, position, base.y_rotation + 180.0)?;
            self.activate(scene, window)?;
        }
        Ok(())
    }

    /// Phase 6: hold cargo per the trimmed template. A `Large` cell is
    /// a coin flip between a large and a small container.
    fn place_cargo(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), AssemblyError> {
        let grid = trim_template(self.dimensions.length_count, self.dimensions.width_count);

        for row in 0..self.dimensions.length_count {
            for col in 0..self.dimensions.width_count {
                let class = match grid.cell(row, col) {
                    CargoCategory::Filler => PartClass::FillerProp,
                    CargoCategory::Small => PartClass::SmallContainer,
                    CargoCategory::Double => PartClass::DoubleContainer,
                    CargoCategory::Large => {
                        if rng.gen::<f32>() < 0.5 {
                            PartClass::LargeContainer
                        } else {
                            PartClass::SmallContainer
                        }
                    }
                    CargoCategory::Empty => continue,
                };
                self.place_item(scene, pool, rng, class, row, col, false)?;
            }
        }
        Ok(())
    }

    /// Place one cargo object on the tile at `(row, col)`, subject to
    /// the occupancy roll. Cargo only mounts on interior floor and beam
    /// tiles unless `force` is set (the under-stairs spot is a wall
    /// tile). Objects face the grid center, flipped in the bow and
    /// port quadrants so their fronts stay visible from the aisle.
    fn place_item(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
        class: PartClass,
        row: usize,
        col: usize,
        force: bool,
    ) -> Result<(), AssemblyError> {
        let anchor = match self.assigned_at(row, col) {
            Some(anchor) => anchor,
            None => return Ok(()),
        };
        if !force && !is_mountable(self.layout.cell(row, col).kind) {
            return Ok(());
        }
        if rng.gen::<f32>() >= CARGO_OCCUPANCY {
            return Ok(());
        }
        let picked = pool.select(scene, class, 1, false, rng);
        let item = match picked.first() {
            Some(&item) => item,
            None => return Ok(()),
        };

        let base = scene.position_of(anchor).ok_or(SceneError::Missing)?;
        let position = Vec3::new(
            base.x + rng.gen_range(-CARGO_JITTER..CARGO_JITTER),
            base.y,
            base.z + rng.gen_range(-CARGO_JITTER..CARGO_JITTER),
        );

        let l_center = self.layout.length_center();
        let w_center = self.layout.width_center();
        let mut rotation = ((l_center as f32 - row as f32)
            / (w_center as f32 - col as f32 + 0.001))
            .atan()
            .to_degrees()
            - 90.0;
        if (row < 2 && col <= w_center) || (row >= 2 && col < 2) || (col == w_center + 1 && row > 2)
        {
            rotation += 180.0;
        }

        scene.set_parent_and_pos(item, self.slot, position, rotation)?;
        self.activate(scene, item)?;
        match class {
            PartClass::SmallContainer => self.small_containers.push(item),
            PartClass::LargeContainer => self.large_containers.push(item),
            PartClass::DoubleContainer => self.double_containers.push(item),
            _ => {}
        }
        Ok(())
    }

    /// Phase 7: stock 80–100% of the containers with good cargo. When
    /// the ship carries contraband, exactly one random small container
    /// gets a bad item instead.
    fn place_content(
        &mut self,
        scene: &mut SceneGraph,
        pool: &AssetPool,
        rng: &mut impl Rng,
    ) -> Result<(), AssemblyError> {
        let small_total = self.small_containers.len();
        let large_total = self.large_containers.len();
        let small_count = content_count(rng, small_total, small_total.saturating_sub(1));
        let large_count = content_count(rng, large_total, large_total);

        let small_goods = pool.select(scene, PartClass::GoodSmallCargo, small_count, false, rng);
        let large_goods = pool.select(scene, PartClass::GoodLargeCargo, large_count, false, rng);

        let mut bad_index = None;
        if !self.nice_content && small_total > 0 {
            let index = rng.gen_range(0..small_total);
            let picked = pool.select(scene, PartClass::BadCargo, 1, false, rng);
            if let Some(&bad) = picked.first() {
                let container = self.small_containers[index];
                self.fill_container(scene, container, bad)?;
                bad_index = Some(index);
            }
        }

        for (index, &good) in small_goods.iter().enumerate() {
            if Some(index) == bad_index || index >= small_total {
                continue;
            }
            let container = self.small_containers[index];
            self.fill_container(scene, container, good)?;
        }
        for (index, &good) in large_goods.iter().enumerate() {
            if index >= large_total {
                break;
            }
            let container = self.large_containers[index];
            self.fill_container(scene, container, good)?;
        }
        Ok(())
    }

    fn fill_container(
        &mut self,
        scene: &mut SceneGraph,
        container: Entity,
        content: Entity,
    ) -> Result<(), SceneError> {
        let base = scene.transform_of(container).ok_or(SceneError::Missing)?;
        let position = Vec3::new(
            base.position.x,
            base.position.y + CONTENT_LIFT,
            base.position.z,
        );
        scene.set_parent_and_pos(content, self.slot, position, base.y_rotation)?;
        self.activate(scene, content)?;
        scene
            .world
            .insert_one(container, SealedCrate::new(content))
            .map_err(|_| SceneError::Missing)?;
        Ok(())
    }

    fn finish(self) -> Result<AssembledShip, AssemblyError> {
        let hull = self.hull.ok_or(AssemblyError::HullUnavailable)?;
        Ok(AssembledShip {
            dimensions: self.dimensions,
            nice_content: self.nice_content,
            layout: self.layout,
            hull,
            chosen: self.chosen,
            small_containers: self.small_containers,
            large_containers: self.large_containers,
            double_containers: self.double_containers,
        })
    }
}

fn is_mountable(kind: PartKind) -> bool {
    matches!(
        kind,
        PartKind::Floor | PartKind::WidthBeam | PartKind::LengthBeam | PartKind::CrossBeam
    )
}

/// Random fill count in the 80–100% band, degrading gracefully for
/// tiny container sets.
fn content_count(rng: &mut impl Rng, total: usize, cap: usize) -> usize {
    let low = (total as f32 * 0.8) as usize;
    if low < cap {
        rng.gen_range(low..cap)
    } else {
        low.min(total)
    }
}
