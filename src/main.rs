use anyhow::{Context, Result};
use clap::Parser;
use nalgebra::UnitQuaternion;

use overfill::{simulate, OverfillReport, Quad, ReportLayers};

/// Compute how much extra area an HMD must render to hide a head orientation error
#[derive(Parser, Debug)]
struct Args {
    /// Full field of view of the HMD, in degrees
    #[arg(long, default_value_t = 90.)]
    fov: f32,

    /// Orientation error about the up (Y) axis, in degrees
    #[arg(long, default_value_t = 0., allow_negative_numbers = true)]
    yaw: f32,

    /// Orientation error about the right (X) axis, in degrees
    #[arg(long, default_value_t = 0., allow_negative_numbers = true)]
    pitch: f32,

    /// Orientation error about the forward (Z) axis, in degrees
    #[arg(long, default_value_t = 0., allow_negative_numbers = true)]
    roll: f32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Leave out the nominal HMD viewport
    #[arg(long)]
    no_hmd: bool,

    /// Leave out the min-overfill quad
    #[arg(long)]
    no_min_overfill: bool,

    /// Leave out the overfill rect
    #[arg(long)]
    no_overfill_rect: bool,
}

impl Args {
    /// Same angle order as a fly camera: pitch about X, yaw about Y, roll about Z
    fn orientation_error(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(
            self.pitch.to_radians(),
            self.yaw.to_radians(),
            self.roll.to_radians(),
        )
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let sim = simulate(args.fov, args.orientation_error()).with_context(|| {
        format!(
            "No overfill for fov {} with error (yaw {}, pitch {}, roll {})",
            args.fov, args.yaw, args.pitch, args.roll
        )
    })?;

    let layers = ReportLayers {
        viewport: !args.no_hmd,
        min_overfill: !args.no_min_overfill,
        overfill_rect: !args.no_overfill_rect,
    };
    let report = OverfillReport::new(&sim, layers);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (name, quad) in [
        ("HMD viewport", &report.viewport),
        ("Min overfill", &report.min_overfill),
        ("Overfill rect", &report.overfill_rect),
    ] {
        if let Some(quad) = quad {
            print_quad(name, quad);
        }
    }
    println!("{}", report.label());

    Ok(())
}

fn print_quad(name: &str, quad: &Quad) {
    println!("{name}:");
    for (corner, d) in ["LT", "RT", "RB", "LB"].iter().zip(quad.directions()) {
        println!("  {corner} ({:>8.4}, {:>8.4}, {:>8.4})", d.x, d.y, d.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use test_log::test;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("overfill").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_no_error() {
        let args = parse(&[]);
        assert_eq!(args.fov, 90.);
        assert_relative_eq!(args.orientation_error(), UnitQuaternion::identity());
    }

    #[test]
    fn yaw_rotates_about_up_axis() {
        let args = parse(&["--yaw", "-10"]);
        let expected = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), (-10f32).to_radians());
        assert_relative_eq!(args.orientation_error(), expected, epsilon = 1e-6);
    }

    #[test]
    fn pitch_and_roll_map_to_x_and_z() {
        let pitch = parse(&["--pitch", "5"]).orientation_error();
        assert_relative_eq!(
            pitch,
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 5f32.to_radians()),
            epsilon = 1e-6
        );

        let roll = parse(&["--roll", "20"]).orientation_error();
        assert_relative_eq!(
            roll,
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 20f32.to_radians()),
            epsilon = 1e-6
        );
    }

    #[test]
    fn layer_flags_parse() {
        let args = parse(&["--no-hmd", "--json"]);
        assert!(args.no_hmd && args.json);
        assert!(!args.no_min_overfill && !args.no_overfill_rect);
    }
}
