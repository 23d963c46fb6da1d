use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use boids_lib::options::Parameters;
use clap_serde_derive::clap::Parser;
use tracing::info;

mod cliargs;
mod report;

use cliargs::Args;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let mut args = Args::parse();
    let config = cliargs::load_config(&mut args)?;

    let pars = Parameters::new(config.parameter_input()).context("invalid simulation parameters")?;
    let seed = match config.seed {
        0 => rand::random(),
        seed => seed,
    };
    info!(
        seed,
        boids = pars.no_boids(),
        steps = pars.steps(),
        prescale = pars.prescale(),
        "starting simulation"
    );

    let snapshots = boids_lib::simulate(&pars, seed, &config.save_options())
        .context("failed to save the recorded snapshots")?;
    info!(snapshots = snapshots.len(), "simulation finished");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    report::write_report(&mut out, &snapshots, &pars, seed)?;
    out.flush()?;

    Ok(())
}
