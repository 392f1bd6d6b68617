use clap::Parser;
use pipeflat::{PipeSpec, generate};
use std::path::PathBuf;
use std::process::ExitCode;

/// Generate print-accurate flat pattern cutting templates for
/// exhaust-wrapped pipe bend segments.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Pipe outer diameter in mm (10-500)
    #[arg(long, default_value_t = 76.2)]
    outer_diameter: f64,

    /// Bend centerline radius as a multiple of the diameter (0.5-10)
    #[arg(long, default_value_t = 1.5)]
    bend_radius: f64,

    /// Total bend angle in degrees (0-360]
    #[arg(long, default_value_t = 90.0)]
    bend_angle: f64,

    /// Number of segments the bend is split into (1-20)
    #[arg(long, default_value_t = 5)]
    segments: u32,

    /// Wrap material thickness in mm (0.1-50)
    #[arg(long, default_value_t = 6.15)]
    wrap_thickness: f64,

    /// Overlap added at the seam tails in mm (0-50)
    #[arg(long, default_value_t = 10.0)]
    overlap: f64,

    /// Output directory for the PDF
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let spec = PipeSpec {
        outer_diameter: cli.outer_diameter,
        bend_radius_factor: cli.bend_radius,
        bend_angle_deg: cli.bend_angle,
        segment_count: cli.segments,
        wrap_thickness: cli.wrap_thickness,
        tail_overlap: cli.overlap,
    };
    match generate(&spec, &cli.out) {
        Ok(path) => {
            println!("wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
