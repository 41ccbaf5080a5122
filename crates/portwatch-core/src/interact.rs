//! Interactable capability for scene objects.
//!
//! The inspection side of the game pokes at ship interiors through one
//! narrow interface: an object either still has an action available or
//! it does not. Containers carry a [`SealedCrate`] component; opening
//! one reveals the cargo entity stowed inside.

use hecs::Entity;

use crate::scene::SceneGraph;

/// One-shot (or repeatable) action surface on a scene object.
pub trait Interactable {
    fn is_active(&self) -> bool;
    fn do_action(&mut self);
}

/// Cargo container holding one content entity, hidden until opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SealedCrate {
    content: Entity,
    opened: bool,
}

impl SealedCrate {
    pub fn new(content: Entity) -> Self {
        Self {
            content,
            opened: false,
        }
    }

    pub fn content(&self) -> Entity {
        self.content
    }

    /// The stowed entity, once the crate has been opened.
    pub fn revealed_content(&self) -> Option<Entity> {
        self.opened.then_some(self.content)
    }
}

impl Interactable for SealedCrate {
    fn is_active(&self) -> bool {
        !self.opened
    }

    fn do_action(&mut self) {
        self.opened = true;
    }
}

/// Open the crate component on `container`, if it has one and it is
/// still sealed. Returns the revealed content entity.
pub fn open_crate(scene: &mut SceneGraph, container: Entity) -> Option<Entity> {
    let mut crate_ref = scene.world.get::<&mut SealedCrate>(container).ok()?;
    if !crate_ref.is_active() {
        return None;
    }
    crate_ref.do_action();
    Some(crate_ref.content())
}
