//! Presentation of overfill results: the overhead percentage, per-edge overfill in degrees and a
//! serializable snapshot for external viewers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{OverfillSimulation, Quad};

/// Fraction of extra pixels rendered compared to the nominal viewport, e.g. 0.25 for 25% more
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overhead(f32);

impl Overhead {
    pub fn new(ratio: f32) -> Self {
        Self(ratio)
    }

    pub fn ratio(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for Overhead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0 * 100.)
    }
}

/// Angular overfill beyond the nominal half fov for each edge of a rect, in degrees
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeOverfill {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl EdgeOverfill {
    /// Measures an axis-aligned rect on the `z = 1` plane against a symmetric `fov` in degrees
    pub fn from_rect(rect: &Quad, fov: f32) -> Self {
        let half_fov = fov / 2.;
        let beyond = |coord: f32| coord.abs().atan().to_degrees() - half_fov;

        Self {
            left: beyond(rect.left_top.x),
            top: beyond(rect.left_top.y),
            right: beyond(rect.right_bottom.x),
            bottom: beyond(rect.right_bottom.y),
        }
    }
}

impl fmt::Display for EdgeOverfill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}, {:.1}, {:.1})",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Which quads end up in a report
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLayers {
    pub viewport: bool,
    pub min_overfill: bool,
    pub overfill_rect: bool,
}

impl Default for ReportLayers {
    fn default() -> Self {
        Self {
            viewport: true,
            min_overfill: true,
            overfill_rect: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverfillReport {
    pub fov: f32,
    /// Orientation error as `[w, x, y, z]`
    pub orientation_error: [f32; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Quad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_overfill: Option<Quad>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overfill_rect: Option<Quad>,
    pub overhead: Overhead,
    pub edges: EdgeOverfill,
}

impl OverfillReport {
    pub fn new(sim: &OverfillSimulation, layers: ReportLayers) -> Self {
        let q = sim.orientation_error.quaternion();

        Self {
            fov: sim.fov,
            orientation_error: [q.w, q.i, q.j, q.k],
            viewport: layers.viewport.then_some(sim.viewport),
            min_overfill: layers.min_overfill.then_some(sim.min_overfill),
            overfill_rect: layers.overfill_rect.then_some(sim.overfill_rect),
            overhead: sim.overhead,
            edges: EdgeOverfill::from_rect(&sim.overfill_rect, sim.fov),
        }
    }

    /// One line summary, e.g. `12.34% (1.0, 2.0, 1.0, 2.0)`
    pub fn label(&self) -> String {
        format!("{} {}", self.overhead, self.edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};
    use test_log::test;

    #[test]
    fn overhead_formats_as_percentage() {
        assert_eq!(Overhead::new(0.123456).to_string(), "12.35%");
        assert_eq!(Overhead::default().to_string(), "0.00%");
    }

    #[test]
    fn no_error_means_no_edge_overfill() {
        let sim = simulate(100., UnitQuaternion::identity()).unwrap();
        let edges = EdgeOverfill::from_rect(&sim.overfill_rect, sim.fov);
        for deg in [edges.left, edges.top, edges.right, edges.bottom] {
            assert_relative_eq!(deg, 0., epsilon = 1e-4);
        }
    }

    #[test]
    fn yaw_overfills_towards_rotation() {
        let err = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 10f32.to_radians());
        let sim = simulate(90., err).unwrap();
        let edges = EdgeOverfill::from_rect(&sim.overfill_rect, sim.fov);

        // Vertical extent is set by the most oblique corners, 1 / (cos 10 - sin 10)
        let (c, s) = (10f32.to_radians().cos(), 10f32.to_radians().sin());
        let vertical = (1. / (c - s)).atan().to_degrees() - 45.;
        assert_relative_eq!(edges.top, vertical, epsilon = 1e-3);
        assert_relative_eq!(edges.bottom, vertical, epsilon = 1e-3);
        // The square is widened symmetrically, which still leaves the trailing edge inside the fov
        assert!(edges.right > 0.);
        assert!(edges.left < 0.);
    }

    #[test]
    fn label_combines_overhead_and_edges() {
        let report = OverfillReport {
            fov: 90.,
            orientation_error: [1., 0., 0., 0.],
            viewport: None,
            min_overfill: None,
            overfill_rect: None,
            overhead: Overhead::new(0.5),
            edges: EdgeOverfill {
                left: 1.,
                top: 2.,
                right: 3.,
                bottom: 4.,
            },
        };
        assert_eq!(report.label(), "50.00% (1.0, 2.0, 3.0, 4.0)");
    }

    #[test]
    fn layers_omit_quads() {
        let sim = simulate(90., UnitQuaternion::from_euler_angles(0.1, 0., 0.)).unwrap();
        let report = OverfillReport::new(
            &sim,
            ReportLayers {
                viewport: false,
                min_overfill: true,
                overfill_rect: false,
            },
        );
        assert_eq!(report.viewport, None);
        assert_eq!(report.min_overfill, Some(sim.min_overfill));
        assert_eq!(report.overfill_rect, None);
        assert_eq!(report.overhead, sim.overhead);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("viewport").is_none());
        assert!(json.get("min_overfill").is_some());
        assert_eq!(json["orientation_error"].as_array().unwrap().len(), 4);
        assert!(json["overhead"].is_number());
    }
}
