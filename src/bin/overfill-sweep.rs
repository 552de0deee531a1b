use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use nalgebra::{Unit, UnitQuaternion, Vector3};

use overfill::{simulate, EdgeOverfill, OverfillError};

/// Print overfill overhead for growing orientation errors about one axis
#[derive(Parser, Debug)]
struct Args {
    /// Full field of view of the HMD, in degrees
    #[arg(long, default_value_t = 90.)]
    fov: f32,

    /// Axis the orientation error rotates about
    #[arg(long, value_enum, default_value_t = Axis::Yaw)]
    axis: Axis,

    /// Largest error angle, in degrees
    #[arg(long, default_value_t = 30.)]
    max: f32,

    /// Angle increment, in degrees
    #[arg(long, default_value_t = 1.)]
    step: f32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Axis {
    Yaw,
    Pitch,
    Roll,
}

impl Axis {
    fn unit(self) -> Unit<Vector3<f32>> {
        match self {
            Axis::Yaw => Vector3::y_axis(),
            Axis::Pitch => Vector3::x_axis(),
            Axis::Roll => Vector3::z_axis(),
        }
    }
}

/// Upper bound on printed rows, so a tiny step can't spin forever
const MAX_ROWS: usize = 100_000;

/// Error angles to visit, in degrees, from 0 up to `max` inclusive
fn sweep_angles(max: f32, step: f32) -> Result<Vec<f32>> {
    ensure!(step > 0., "Step must be positive, got {}", step);
    ensure!(
        max.is_finite() && max >= 0.,
        "Max angle must be finite and non-negative, got {}",
        max
    );

    let steps = (max / step).floor();
    ensure!(
        steps < MAX_ROWS as f32,
        "Sweeping to {} in steps of {} would print more than {} rows",
        max,
        step,
        MAX_ROWS
    );

    Ok((0..=steps as usize).map(|i| i as f32 * step).collect())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let angles = sweep_angles(args.max, args.step)?;

    println!("{:>8} {:>10}  edges (l, t, r, b)", "angle", "overhead");

    for angle in angles {
        let err = UnitQuaternion::from_axis_angle(&args.axis.unit(), angle.to_radians());

        match simulate(args.fov, err) {
            Ok(sim) => {
                let edges = EdgeOverfill::from_rect(&sim.overfill_rect, sim.fov);
                println!("{angle:>8.1} {:>10}  {edges}", sim.overhead.to_string());
            }
            Err(e @ OverfillError::DegenerateOrientation { .. }) => {
                println!("{angle:>8.1} {:>10}  {e}", "degenerate");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
