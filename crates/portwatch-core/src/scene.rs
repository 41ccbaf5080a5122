//! In-memory scene graph backed by a hecs world.
//!
//! Scene objects are entities carrying [`Transform`], [`Parent`] and
//! [`Active`] components. The graph exposes exactly the primitives the
//! orchestration layer needs: parent/position assignment, activation
//! toggling and child queries. There is no rendering here; the world
//! is the single source of truth for "what is in the scene".

use hecs::{Entity, World};
use portwatch_logic::spline::Vec3;
use serde::{Deserialize, Serialize};

use crate::pool::PartClass;

/// Position, yaw and scale of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub y_rotation: f32,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            y_rotation: 0.0,
            scale: Vec3::ONE,
        }
    }
}

/// Link to the owning scene object, if any.
pub struct Parent(pub Option<Entity>);

/// Whether the object is live in the scene. Inactive objects are
/// invisible to gameplay and count as available to the asset pool.
pub struct Active(pub bool);

/// Sail mounts a hull model provides, carried by hull pool entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HullRig {
    pub back_sails: u8,
    pub main_sails: u8,
    pub wing_sails: u8,
}

impl Default for HullRig {
    fn default() -> Self {
        Self {
            back_sails: 1,
            main_sails: 2,
            wing_sails: 2,
        }
    }
}

/// Scene access error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The entity was despawned or never had the requested component.
    Missing,
}

/// The scene world plus convenience accessors.
pub struct SceneGraph {
    pub world: World,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            world: World::new(),
        }
    }

    /// Spawn an empty, active grouping node (slots, pool root).
    pub fn spawn_node(&mut self) -> Entity {
        self.world
            .spawn((Transform::default(), Parent(None), Active(true)))
    }

    /// Spawn an inactive, unparented pool part of the given class.
    pub fn spawn_part(&mut self, class: PartClass) -> Entity {
        self.world
            .spawn((Transform::default(), Parent(None), Active(false), class))
    }

    pub fn set_parent_and_pos(
        &mut self,
        entity: Entity,
        parent: Entity,
        position: Vec3,
        y_rotation: f32,
    ) -> Result<(), SceneError> {
        {
            let mut transform = self
                .world
                .get::<&mut Transform>(entity)
                .map_err(|_| SceneError::Missing)?;
            transform.position = position;
            transform.y_rotation = y_rotation;
        }
        let mut link = self
            .world
            .get::<&mut Parent>(entity)
            .map_err(|_| SceneError::Missing)?;
        link.0 = Some(parent);
        Ok(())
    }

    /// Parent/position assignment that also sets the object's scale.
    pub fn set_parent_pos_scale(
        &mut self,
        entity: Entity,
        parent: Entity,
        position: Vec3,
        y_rotation: f32,
        scale: Vec3,
    ) -> Result<(), SceneError> {
        self.set_parent_and_pos(entity, parent, position, y_rotation)?;
        self.set_scale(entity, scale)
    }

    /// Move an object to a new parent without touching its transform.
    pub fn reparent(&mut self, entity: Entity, parent: Entity) -> Result<(), SceneError> {
        let mut link = self
            .world
            .get::<&mut Parent>(entity)
            .map_err(|_| SceneError::Missing)?;
        link.0 = Some(parent);
        Ok(())
    }

    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> Result<(), SceneError> {
        let mut transform = self
            .world
            .get::<&mut Transform>(entity)
            .map_err(|_| SceneError::Missing)?;
        transform.position = position;
        Ok(())
    }

    pub fn set_active(&mut self, entity: Entity, active: bool) -> Result<(), SceneError> {
        let mut flag = self
            .world
            .get::<&mut Active>(entity)
            .map_err(|_| SceneError::Missing)?;
        flag.0 = active;
        Ok(())
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.world
            .get::<&Active>(entity)
            .map(|a| a.0)
            .unwrap_or(false)
    }

    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.world.get::<&Parent>(entity).ok().and_then(|p| p.0)
    }

    pub fn class_of(&self, entity: Entity) -> Option<PartClass> {
        self.world.get::<&PartClass>(entity).ok().map(|c| *c)
    }

    pub fn hull_rig(&self, entity: Entity) -> Option<HullRig> {
        self.world.get::<&HullRig>(entity).ok().map(|r| *r)
    }

    pub fn transform_of(&self, entity: Entity) -> Option<Transform> {
        self.world.get::<&Transform>(entity).ok().map(|t| *t)
    }

    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.transform_of(entity).map(|t| t.position)
    }

    pub fn set_transform(&mut self, entity: Entity, transform: Transform) -> Result<(), SceneError> {
        let mut current = self
            .world
            .get::<&mut Transform>(entity)
            .map_err(|_| SceneError::Missing)?;
        *current = transform;
        Ok(())
    }

    pub fn set_scale(&mut self, entity: Entity, scale: Vec3) -> Result<(), SceneError> {
        let mut transform = self
            .world
            .get::<&mut Transform>(entity)
            .map_err(|_| SceneError::Missing)?;
        transform.scale = scale;
        Ok(())
    }

    /// Zero the object's position and yaw, keeping its scale.
    pub fn reset_pose(&mut self, entity: Entity) -> Result<(), SceneError> {
        let mut transform = self
            .world
            .get::<&mut Transform>(entity)
            .map_err(|_| SceneError::Missing)?;
        transform.position = Vec3::ZERO;
        transform.y_rotation = 0.0;
        Ok(())
    }

    pub fn child_count(&self, parent: Entity) -> usize {
        self.world
            .query::<&Parent>()
            .iter()
            .filter(|(_, p)| p.0 == Some(parent))
            .count()
    }

    pub fn children_of(&self, parent: Entity) -> Vec<Entity> {
        self.world
            .query::<&Parent>()
            .iter()
            .filter(|(_, p)| p.0 == Some(parent))
            .map(|(e, _)| e)
            .collect()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
