use std::{fs::OpenOptions, mem, path::Path};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    error::BirdwatcherError,
    flock::{Flock, Snapshot},
};

/// One boid of one recorded snapshot, flattened for CSV export.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BoidData {
    pub snapshot: usize,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub speed: f64,
    pub is_predator: bool,
}

#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub save_locations: bool,
    pub save_locations_path: Option<String>,
    pub save_locations_timestamp: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions {
            save_locations: false,
            save_locations_path: Some("./".to_owned()),
            save_locations_timestamp: true,
        }
    }
}

/// Accumulates snapshots of a flock every `sample_rate` ticks.
pub struct Birdwatcher {
    snapshots: Vec<Snapshot>,
    ticker: u64,
    sample_rate: u64,
}

const PREFIX: &str = "boids-data";

impl Birdwatcher {
    pub fn new(sample_rate: u64) -> Self {
        assert!(sample_rate > 0, "sample rate must be positive");

        Birdwatcher {
            snapshots: Vec::new(),
            ticker: 0,
            sample_rate,
        }
    }

    /// Triggers data collection, the very first call always records.
    pub fn watch(&mut self, flock: &Flock) {
        if self.should_sample() {
            self.snapshots.push(flock.state().to_vec());
        }
    }

    pub fn restart(&mut self) {
        self.snapshots.clear();
        self.ticker = 0;
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn pop_data(&mut self) -> Vec<Snapshot> {
        mem::take(&mut self.snapshots)
    }

    /// Saves the recorded snapshots in CSV format, then returns them while
    /// emptying the birdwatcher's memory.
    ///
    /// Depending on save options, either overwrites `boids-data.csv` or writes
    /// a new timestamped file.
    pub fn pop_data_save(
        &mut self,
        save_options: &SaveOptions,
    ) -> Result<Vec<Snapshot>, BirdwatcherError> {
        let data = self.pop_data();

        if !save_options.save_locations {
            return Ok(data);
        }

        match &save_options.save_locations_path {
            Some(path) => {
                let file_path = Path::new(path)
                    .join(Birdwatcher::get_dataset_name(save_options, Utc::now()));
                Birdwatcher::save(&data, &file_path)?;
            }
            None => warn!("saving requested without a path, skipping"),
        }

        Ok(data)
    }

    /// Writes `data` as one CSV row per boid per snapshot.
    pub fn save(data: &[Snapshot], file_path: &Path) -> Result<(), BirdwatcherError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(file_path)
            .map_err(|source| BirdwatcherError::Io {
                path: file_path.display().to_string(),
                source,
            })?;
        let mut wtr = csv::Writer::from_writer(file);

        for row in Birdwatcher::flatten(data) {
            wtr.serialize(row)?;
        }
        wtr.flush().map_err(|source| BirdwatcherError::Io {
            path: file_path.display().to_string(),
            source,
        })?;

        debug!(path = %file_path.display(), snapshots = data.len(), "saved flock data");
        Ok(())
    }

    pub fn flatten(data: &[Snapshot]) -> impl Iterator<Item = BoidData> + '_ {
        data.iter().enumerate().flat_map(|(snapshot, boids)| {
            boids.iter().map(move |b| BoidData {
                snapshot,
                x: b.position.x(),
                y: b.position.y(),
                vx: b.velocity.x(),
                vy: b.velocity.y(),
                speed: b.speed(),
                is_predator: b.is_predator(),
            })
        })
    }

    fn get_dataset_name(save_options: &SaveOptions, now: DateTime<Utc>) -> String {
        match save_options.save_locations_timestamp {
            true => {
                let datetime_part = now.timestamp_millis();
                format!(
                    "{prefix}_{datetime}.csv",
                    prefix = PREFIX,
                    datetime = datetime_part
                )
            }
            false => format!("{prefix}.csv", prefix = PREFIX),
        }
    }

    fn should_sample(&mut self) -> bool {
        let sample = self.ticker % self.sample_rate == 0;
        self.ticker += 1;
        sample
    }
}
