use std::io::{self, Write};

use boids_lib::{
    flock::Snapshot,
    options::Parameters,
    stats::{mean_dist, mean_speed, Statistics},
};

const HEADER: &str = "  Mean distance     |    Mean speed";

fn line(distance: Statistics, speed: Statistics) -> String {
    format!(
        "{:>8.3} \u{b1} {:>7.3}{:>8}{:>13.3} \u{b1} {:>7.3}",
        distance.mean, distance.std_dev, '|', speed.mean, speed.std_dev
    )
}

/// Writes one line of statistics per snapshot, followed by the parameters of
/// the run.
pub fn write_report<W: Write>(
    out: &mut W,
    snapshots: &[Snapshot],
    pars: &Parameters,
    seed: u64,
) -> io::Result<()> {
    writeln!(out, "{HEADER}")?;
    for state in snapshots {
        writeln!(out, "{}", line(mean_dist(state), mean_speed(state)))?;
    }

    writeln!(out)?;
    writeln!(out, "Parameters used:")?;
    writeln!(out, "{pars}")?;
    writeln!(out, "{:<28}{}", "seed:", seed)
}
