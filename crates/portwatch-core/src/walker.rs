//! Spline navigator: advances a ship slot along a route per tick.
//!
//! The walker owns only the progress scalar and the entrance offset;
//! it never touches the scene. Each [`SplineWalker::advance`] reports
//! the position the caller should write to the slot, and arrival fires
//! exactly once before the walker goes idle again.

use portwatch_logic::dimensions::ShipDimensions;
use portwatch_logic::spline::{Spline, Vec3};
use serde::{Deserialize, Serialize};

/// Docking footprint of the assembled ship, hull padding included.
/// Different-sized ships share one dock, so the approach route's
/// terminal point gets offset by half the padded length and the full
/// beam width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipProfile {
    pub length_count: usize,
    pub width_count: usize,
    pub body_length: f32,
    pub body_width: f32,
}

impl ShipProfile {
    /// Profile for a ship whose hull extends one tile past each end of
    /// the warehouse grid.
    pub fn padded(dimensions: &ShipDimensions) -> Self {
        Self {
            length_count: dimensions.length_count + 2,
            width_count: dimensions.width_count,
            body_length: dimensions.body_length,
            body_width: dimensions.body_width,
        }
    }
}

/// Result of one tick of advancement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalkerStep {
    /// Walker is not on a route.
    Idle,
    /// Still underway; the slot should move to this position.
    Moving(Vec3),
    /// Route complete. Fires once, then the walker is idle.
    Arrived(Vec3),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplineWalker {
    speed: f32,
    progress: f32,
    active: bool,
    entrance_offset: Vec3,
}

impl SplineWalker {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            progress: 0.0,
            active: false,
            entrance_offset: Vec3::ZERO,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn entrance_offset(&self) -> Vec3 {
        self.entrance_offset
    }

    /// Offset applied to every point of the route so this ship docks
    /// flush with the quay: half the padded length along the route,
    /// the route terminal's height, and one beam width sideways.
    pub fn entrance_for(spline: &Spline, origin: Vec3, profile: &ShipProfile) -> Vec3 {
        let docks_point = spline.control_point(spline.control_point_count() - 1);
        Vec3::new(
            origin.x + profile.length_count as f32 * 0.5 * profile.body_length,
            docks_point.y,
            origin.z + profile.width_count as f32 * profile.body_width,
        )
    }

    /// Bind an entrance offset and start walking from the route start.
    pub fn begin(&mut self, entrance_offset: Vec3) {
        self.entrance_offset = entrance_offset;
        self.progress = 0.0;
        self.active = true;
    }

    /// Step the walk by `dt` seconds along `spline`.
    pub fn advance(&mut self, spline: &Spline, dt: f32) -> WalkerStep {
        if !self.active {
            return WalkerStep::Idle;
        }

        self.progress += dt * self.speed;
        let position = spline.point_at(self.progress) + self.entrance_offset;

        if self.progress >= 1.0 {
            self.active = false;
            self.progress = 0.0;
            WalkerStep::Arrived(position)
        } else {
            WalkerStep::Moving(position)
        }
    }
}
