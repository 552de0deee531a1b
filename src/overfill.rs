//! Overfill geometry for a symmetric HMD frustum.
//!
//! Everything here lives on the projection plane `z = 1`, looking down +Z with +Y up. Given the
//! rotation between the predicted head pose (used to render) and the actual pose (at display
//! time), we find how much larger than the nominal viewport the rendered region must be so the
//! displayed viewport never samples outside of it.

use log::{debug, warn};
use nalgebra::{UnitQuaternion, Vector3};

use crate::report::Overhead;
use crate::{Bounds, OverfillError, Quad, Result};

/// Smallest depth a rotated corner ray may have before back-projecting it onto the plane is
/// considered degenerate. Below this the min-overfill corner runs off towards infinity.
pub const MIN_PROJECTED_DEPTH: f32 = 1e-3;

const CORNER_NAMES: [&str; 4] = ["left top", "right top", "right bottom", "left bottom"];

/// All geometry produced for one (fov, orientation error) query
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OverfillSimulation {
    /// Full field of view in degrees
    pub fov: f32,
    pub orientation_error: UnitQuaternion<f32>,
    /// What the HMD actually displays
    pub viewport: Quad,
    /// Tightest quad still covering the viewport under the orientation error
    pub min_overfill: Quad,
    /// Square superset of `min_overfill`, what gets rendered
    pub overfill_rect: Quad,
    pub overhead: Overhead,
}

/// Nominal viewport for a symmetric `fov` (full angle, in degrees) at unit depth
pub fn nominal_viewport(fov: f32) -> Result<Quad> {
    if !(fov > 0. && fov < 180.) {
        return Err(OverfillError::InvalidFov(fov));
    }

    let half_width = (fov / 2.).to_radians().tan();

    Ok(Quad::from_bounds(&Bounds {
        left: -half_width,
        top: half_width,
        right: half_width,
        bottom: -half_width,
    }))
}

/// Back-projects each viewport corner so that, once the orientation error is applied, it lands
/// back on the original corner ray. The result is the smallest quad on the unrotated plane that
/// still covers the viewport.
pub fn min_overfill_quad(viewport: &Quad, orientation_error: &UnitQuaternion<f32>) -> Result<Quad> {
    let mut vertices = [Vector3::zeros(); 4];

    for ((vertex, direction), corner) in vertices
        .iter_mut()
        .zip(viewport.directions())
        .zip(CORNER_NAMES)
    {
        let depth = (orientation_error * direction).z;

        // Also rejects NaN
        if !(depth.is_finite() && depth > MIN_PROJECTED_DEPTH) {
            warn!("Degenerate orientation error {orientation_error:?} at {corner} (depth {depth})");
            return Err(OverfillError::DegenerateOrientation { corner, depth });
        }

        *vertex = orientation_error * (direction / depth);
    }

    let [left_top, right_top, right_bottom, left_bottom] = vertices;
    Ok(Quad::new(left_top, right_top, right_bottom, left_bottom))
}

/// Axis-aligned bounds of the quad's corners, ignoring z
pub fn bounds(quad: &Quad) -> Bounds {
    let corners = quad.directions();
    let xs = corners.map(|c| c.x);
    let ys = corners.map(|c| c.y);

    Bounds {
        left: xs.into_iter().fold(f32::INFINITY, f32::min),
        top: ys.into_iter().fold(f32::NEG_INFINITY, f32::max),
        right: xs.into_iter().fold(f32::NEG_INFINITY, f32::max),
        bottom: ys.into_iter().fold(f32::INFINITY, f32::min),
    }
}

/// Smallest square containing the bounds of `min_overfill`, and the fraction of extra area it
/// costs compared to `viewport`.
///
/// The shorter side is grown equally in both directions; the bounds are never cropped.
pub fn overfill_rect(min_overfill: &Quad, viewport: &Quad) -> (Quad, Overhead) {
    let b = bounds(min_overfill);
    let width = b.width();
    let height = b.height();
    let half_diff = (width - height).abs() / 2.;

    let square = if width > height {
        Bounds {
            top: b.top + half_diff,
            bottom: b.bottom - half_diff,
            ..b
        }
    } else {
        Bounds {
            left: b.left - half_diff,
            right: b.right + half_diff,
            ..b
        }
    };

    // The nominal viewport is square, so its width is 2 * tan(fov / 2)
    let nominal = bounds(viewport).width();
    let overhead = Overhead::new(width.max(height).powi(2) / nominal.powi(2) - 1.);

    (Quad::from_bounds(&square), overhead)
}

/// Runs the whole pipeline for one query
pub fn simulate(fov: f32, orientation_error: UnitQuaternion<f32>) -> Result<OverfillSimulation> {
    let viewport = nominal_viewport(fov)?;
    let min_overfill = min_overfill_quad(&viewport, &orientation_error)?;
    let (overfill_rect, overhead) = overfill_rect(&min_overfill, &viewport);

    debug!("fov {fov}, error {orientation_error:?}: overhead {overhead}");

    Ok(OverfillSimulation {
        fov,
        orientation_error,
        viewport,
        min_overfill,
        overfill_rect,
        overhead,
    })
}
