use birdwatcher::{Birdwatcher, SaveOptions};
use error::BirdwatcherError;
use flock::{Flock, Snapshot};
use options::Parameters;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

pub mod boid;
pub mod flock;

pub mod birdwatcher;
pub mod error;
pub mod math_helpers;
pub mod options;
pub mod stats;
pub mod vector;

/// Populates a flock from `seed`, runs it to completion and hands back the
/// recorded snapshots, saving them first if `save_options` ask for it.
pub fn simulate(
    pars: &Parameters,
    seed: u64,
    save_options: &SaveOptions,
) -> Result<Vec<Snapshot>, BirdwatcherError> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut flock = Flock::populated(pars, &mut rng);
    let mut bird_watcher = Birdwatcher::new(pars.prescale() as u64);

    flock.run_watched(pars, &mut bird_watcher);

    bird_watcher.pop_data_save(save_options)
}
