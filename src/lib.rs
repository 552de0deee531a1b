use nalgebra::{Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

mod error;
pub mod overfill;
pub mod report;

pub use error::{OverfillError, Result};
pub use overfill::{
    bounds, min_overfill_quad, nominal_viewport, overfill_rect, simulate, OverfillSimulation,
    MIN_PROJECTED_DEPTH,
};
pub use report::{EdgeOverfill, Overhead, OverfillReport, ReportLayers};

/// The position and orientation of a user's head
/// User's head looks down the positive Z axis, with Y up
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Head {
    /// Position
    pub pos: Point3<f32>,
    /// Orientation
    pub orient: UnitQuaternion<f32>,
}

impl Default for Head {
    fn default() -> Self {
        Self {
            pos: Point3::origin(),
            orient: UnitQuaternion::identity(),
        }
    }
}

impl Head {
    /// Rotation taking this (predicted) head orientation to `actual`, expressed in the predicted
    /// head's frame. This is the orientation error fed to [`min_overfill_quad`].
    pub fn orientation_error(&self, actual: &Head) -> UnitQuaternion<f32> {
        self.orient.inverse() * actual.orient
    }
}

/// Four ray directions from a common origin, all ending on the same projection plane.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub left_top: Vector3<f32>,
    pub right_top: Vector3<f32>,
    pub right_bottom: Vector3<f32>,
    pub left_bottom: Vector3<f32>,
}

impl Quad {
    pub fn new(
        left_top: Vector3<f32>,
        right_top: Vector3<f32>,
        right_bottom: Vector3<f32>,
        left_bottom: Vector3<f32>,
    ) -> Self {
        Self {
            left_top,
            right_top,
            right_bottom,
            left_bottom,
        }
    }

    /// Axis-aligned quad on the plane `z = 1`
    pub fn from_bounds(b: &Bounds) -> Self {
        Self::new(
            Vector3::new(b.left, b.top, 1.),
            Vector3::new(b.right, b.top, 1.),
            Vector3::new(b.right, b.bottom, 1.),
            Vector3::new(b.left, b.bottom, 1.),
        )
    }

    /// Corner directions, clockwise from the left top
    pub fn directions(&self) -> [Vector3<f32>; 4] {
        [
            self.left_top,
            self.right_top,
            self.right_bottom,
            self.left_bottom,
        ]
    }

    /// Corners as points relative to the ray origin
    pub fn corners(&self) -> [Point3<f32>; 4] {
        self.directions().map(Point3::from)
    }

    /// Corners placed in the world by the given origin and rotation
    pub fn placed(&self, origin: &Point3<f32>, rotation: &UnitQuaternion<f32>) -> [Point3<f32>; 4] {
        self.directions().map(|d| origin + rotation * d)
    }

    /// Line segments (start, end pairs) from `origin` along each corner ray.
    /// `length` scales the rays, so 2.0 reaches twice as far as the projection plane.
    pub fn rays(
        &self,
        origin: &Point3<f32>,
        rotation: &UnitQuaternion<f32>,
        length: f32,
    ) -> [Point3<f32>; 8] {
        let [lt, rt, rb, lb] = self.directions().map(|d| origin + rotation * d * length);
        [*origin, lt, *origin, rt, *origin, rb, *origin, lb]
    }
}

/// Axis-aligned extent of a quad in its own XY plane. Y grows upwards, so `top >= bottom`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Whether `other` lies entirely within these bounds (edges may touch)
    pub fn contains(&self, other: &Bounds) -> bool {
        self.left <= other.left
            && self.right >= other.right
            && self.top >= other.top
            && self.bottom <= other.bottom
    }
}
