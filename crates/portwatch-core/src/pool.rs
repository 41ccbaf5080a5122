//! Pre-spawned asset pool with tagged selection.
//!
//! Every placeable object exists up front as an inactive scene entity
//! under the pool root. Selection filters by part class and by the
//! scene-active flag; activation is the exclusion mechanism, so there
//! is no separate reservation count to fall out of sync. Callers
//! activate what they place and release it back when the ship despawns.

use hecs::Entity;
use log::{debug, warn};
use portwatch_logic::layout::PartKind;
use portwatch_logic::spline::Vec3;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::scene::{HullRig, SceneError, SceneGraph};

/// Pool tag: which interchangeable family a pre-spawned object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartClass {
    // Warehouse structure
    BaseFloor,
    BaseWall,
    RotatedWall,
    ThinWall,
    ThickWall,
    Corner,
    FinalWall,
    CrossBeam,
    WidthBeam,
    LengthBeam,
    Column,
    Mast,
    // Whole-ship dressing
    Hull,
    BackSail,
    MainSail,
    WingSail,
    Stairs,
    Window,
    // Cargo containers and clutter
    SmallContainer,
    LargeContainer,
    DoubleContainer,
    FillerProp,
    // Container contents
    GoodSmallCargo,
    GoodLargeCargo,
    BadCargo,
}

impl From<PartKind> for PartClass {
    fn from(kind: PartKind) -> Self {
        match kind {
            PartKind::Wall => PartClass::BaseWall,
            PartKind::CornerWall => PartClass::Corner,
            PartKind::Floor => PartClass::BaseFloor,
            PartKind::WidthBeam => PartClass::WidthBeam,
            PartKind::LengthBeam => PartClass::LengthBeam,
            PartKind::CrossBeam => PartClass::CrossBeam,
            PartKind::Column => PartClass::Column,
            PartKind::FinalWall => PartClass::FinalWall,
            PartKind::RotatedWall => PartClass::RotatedWall,
            PartKind::ThickColumnWall => PartClass::ThickWall,
            PartKind::ThinColumnWall => PartClass::ThinWall,
        }
    }
}

/// How many objects of each class to pre-spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolInventory {
    pub counts: Vec<(PartClass, usize)>,
}

impl PoolInventory {
    /// Inventory sized so two largest ships (17×9) can be live at once,
    /// one at the dock and one departing, without under-filling.
    /// Shortfalls degrade silently at placement time, so this is a
    /// content-design constraint rather than a hard requirement.
    pub fn default_inventory() -> Self {
        Self {
            counts: vec![
                (PartClass::BaseFloor, 220),
                (PartClass::BaseWall, 60),
                (PartClass::RotatedWall, 32),
                (PartClass::ThinWall, 32),
                (PartClass::ThickWall, 16),
                (PartClass::Corner, 8),
                (PartClass::FinalWall, 20),
                (PartClass::CrossBeam, 20),
                (PartClass::WidthBeam, 120),
                (PartClass::LengthBeam, 20),
                (PartClass::Column, 4),
                (PartClass::Mast, 2),
                (PartClass::Hull, 2),
                (PartClass::BackSail, 4),
                (PartClass::MainSail, 6),
                (PartClass::WingSail, 6),
                (PartClass::Stairs, 2),
                (PartClass::Window, 24),
                (PartClass::SmallContainer, 120),
                (PartClass::LargeContainer, 60),
                (PartClass::DoubleContainer, 8),
                (PartClass::FillerProp, 60),
                (PartClass::GoodSmallCargo, 120),
                (PartClass::GoodLargeCargo, 60),
                (PartClass::BadCargo, 4),
            ],
        }
    }
}

/// The pool itself: entry order is spawn order and never changes.
pub struct AssetPool {
    root: Entity,
    entries: Vec<Entity>,
}

impl AssetPool {
    /// Pre-spawn the whole inventory as inactive children of a fresh
    /// pool root.
    pub fn populate(scene: &mut SceneGraph, inventory: &PoolInventory) -> Self {
        let root = scene.spawn_node();
        let mut entries = Vec::new();
        for &(class, count) in &inventory.counts {
            for _ in 0..count {
                let entity = scene.spawn_part(class);
                if class == PartClass::Hull {
                    let _ = scene.world.insert_one(entity, HullRig::default());
                }
                // Fresh entities always accept parenting.
                let _ = scene.set_parent_and_pos(entity, root, Vec3::ZERO, 0.0);
                entries.push(entity);
            }
        }
        debug!("asset pool populated with {} entries", entries.len());
        Self { root, entries }
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inactive entries of a class still available for selection.
    pub fn available(&self, scene: &SceneGraph, class: PartClass) -> usize {
        self.entries
            .iter()
            .filter(|&&e| scene.class_of(e) == Some(class) && !scene.is_active(e))
            .count()
    }

    /// Take up to `count` available objects of `class`.
    ///
    /// `ordered` keeps pool insertion order; otherwise the available
    /// candidates are shuffled uniformly. Selection alone does not
    /// reserve anything: the caller activates what it actually places,
    /// and only active objects are excluded from later selections.
    /// Returns fewer than `count` when the pool runs short.
    pub fn select(
        &self,
        scene: &SceneGraph,
        class: PartClass,
        count: usize,
        ordered: bool,
        rng: &mut impl Rng,
    ) -> Vec<Entity> {
        let mut candidates: Vec<Entity> = self
            .entries
            .iter()
            .copied()
            .filter(|&e| scene.class_of(e) == Some(class) && !scene.is_active(e))
            .collect();

        if !ordered {
            candidates.shuffle(rng);
        }

        if candidates.len() < count {
            warn!(
                "pool shortfall for {:?}: wanted {}, only {} available",
                class,
                count,
                candidates.len()
            );
        }

        candidates.truncate(count);
        candidates
    }

    /// Return an object to the pool: deactivate, reparent under the
    /// root, zero its pose and restore unit scale.
    pub fn release(&self, scene: &mut SceneGraph, entity: Entity) -> Result<(), SceneError> {
        scene.set_active(entity, false)?;
        scene.set_parent_and_pos(entity, self.root, Vec3::ZERO, 0.0)?;
        scene.set_scale(entity, Vec3::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_pool(scene: &mut SceneGraph) -> AssetPool {
        let inventory = PoolInventory {
            counts: vec![
                (PartClass::SmallContainer, 5),
                (PartClass::LargeContainer, 3),
            ],
        };
        AssetPool::populate(scene, &inventory)
    }

    #[test]
    fn populate_spawns_inactive_entries_under_root() {
        let mut scene = SceneGraph::new();
        let pool = small_pool(&mut scene);
        assert_eq!(pool.len(), 8);
        assert_eq!(scene.child_count(pool.root()), 8);
        assert_eq!(pool.available(&scene, PartClass::SmallContainer), 5);
        assert_eq!(pool.available(&scene, PartClass::LargeContainer), 3);
    }

    #[test]
    fn ordered_selection_is_idempotent_without_activation() {
        let mut scene = SceneGraph::new();
        let pool = small_pool(&mut scene);
        let mut rng = StdRng::seed_from_u64(1);

        let first = pool.select(&scene, PartClass::SmallContainer, 3, true, &mut rng);
        let second = pool.select(&scene, PartClass::SmallContainer, 3, true, &mut rng);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn activation_excludes_from_later_selections() {
        let mut scene = SceneGraph::new();
        let pool = small_pool(&mut scene);
        let mut rng = StdRng::seed_from_u64(2);

        let first = pool.select(&scene, PartClass::SmallContainer, 3, true, &mut rng);
        for &e in &first {
            scene.set_active(e, true).unwrap();
        }
        let third = pool.select(&scene, PartClass::SmallContainer, 5, true, &mut rng);
        assert_eq!(third.len(), 2);
        for e in &third {
            assert!(!first.contains(e));
        }
    }

    #[test]
    fn shortfall_returns_partial_list() {
        let mut scene = SceneGraph::new();
        let pool = small_pool(&mut scene);
        let mut rng = StdRng::seed_from_u64(3);

        let picked = pool.select(&scene, PartClass::LargeContainer, 10, true, &mut rng);
        assert_eq!(picked.len(), 3);
        let none = pool.select(&scene, PartClass::Mast, 1, true, &mut rng);
        assert!(none.is_empty());
    }

    #[test]
    fn shuffled_selection_draws_from_the_same_set() {
        let mut scene = SceneGraph::new();
        let pool = small_pool(&mut scene);
        let mut rng = StdRng::seed_from_u64(4);

        let ordered = pool.select(&scene, PartClass::SmallContainer, 5, true, &mut rng);
        let shuffled = pool.select(&scene, PartClass::SmallContainer, 5, false, &mut rng);
        let mut sorted = shuffled.clone();
        sorted.sort();
        let mut expected = ordered.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn release_restores_availability_and_pose() {
        let mut scene = SceneGraph::new();
        let pool = small_pool(&mut scene);
        let mut rng = StdRng::seed_from_u64(5);
        let slot = scene.spawn_node();

        let picked = pool.select(&scene, PartClass::SmallContainer, 1, true, &mut rng);
        let e = picked[0];
        scene
            .set_parent_and_pos(e, slot, Vec3::new(4.0, 0.5, -2.0), 90.0)
            .unwrap();
        scene.set_active(e, true).unwrap();
        assert_eq!(pool.available(&scene, PartClass::SmallContainer), 4);

        pool.release(&mut scene, e).unwrap();
        assert_eq!(pool.available(&scene, PartClass::SmallContainer), 5);
        assert_eq!(scene.parent_of(e), Some(pool.root()));
        assert_eq!(scene.position_of(e), Some(Vec3::ZERO));
        assert!(!scene.is_active(e));
    }
}
