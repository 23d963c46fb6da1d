use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use boids_lib::{
    birdwatcher::SaveOptions,
    options::{ParameterInput, RuleSet, WorldBounds},
};
use clap_serde_derive::{
    clap::{self, Parser},
    serde::Serialize,
    ClapSerde,
};
use tracing::debug;

#[derive(Parser)]
#[command(author, about, long_about = None)]
/// Batch simulation of a flock of boids (Reynolds '87) with predators.
pub struct Args {
    /// Config file, YAML unless it has a `.toml` extension
    #[arg(long = "config", default_value = "config.yaml")]
    pub config_path: PathBuf,

    /// Rest of arguments
    #[command(flatten)]
    pub config: <Config as ClapSerde>::Opt,
}

#[derive(ClapSerde, Serialize)]
/// Run configuration
///
/// Uses defaults, which can be overwritten by a config file and then by the
/// command line.
pub struct Config {
    #[default(300.)]
    #[arg(short = 'A', long = "angle_of_view")]
    /// field of view in degrees, centered on the velocity
    pub angle_of_view: f64,

    #[default(35.)]
    #[arg(short = 'D', long = "neighbour_distance")]
    pub neighbour_distance: f64,

    #[default(3.5)]
    #[arg(short = 'd', long = "separation_distance")]
    pub separation_distance: f64,

    #[default(1.5)]
    #[arg(short = 's', long = "separation_factor")]
    pub separation_factor: f64,

    #[default(0.1)]
    #[arg(short = 'c', long = "cohesion_factor")]
    pub cohesion_factor: f64,

    #[default(1.6)]
    #[arg(short = 'a', long = "alignment_factor")]
    pub alignment_factor: f64,

    #[default(80.)]
    #[arg(short = 'V', long = "maximum_speed")]
    pub max_speed: f64,

    #[default(0.000005)]
    #[arg(short = 'v', long = "minimum_speed_fraction")]
    /// minimum speed as a fraction of the maximum speed
    pub min_speed_fraction: f64,

    #[default(30.)]
    #[arg(short = 't', long = "duration")]
    /// simulated seconds
    pub duration: f64,

    #[default(3000)]
    #[arg(short = 'S', long = "steps")]
    pub steps: u32,

    #[default(60)]
    #[arg(short = 'p', long = "prescale")]
    /// ratio of steps/samples, e.g. 60 = record every 60th step
    pub prescale: u32,

    #[default(120)]
    #[arg(short = 'b', long = "boids")]
    /// number of boids
    pub no_boids: u32,

    #[default(100.)]
    #[arg(long = "width")]
    pub world_width: f64,

    #[default(100.)]
    #[arg(long = "height")]
    pub world_height: f64,

    #[default(0)]
    #[arg(long = "seed")]
    /// seed for the initial flock, 0 picks one at random
    pub seed: u64,

    #[default(false)]
    #[arg(long = "no_separation")]
    pub no_separation: bool,
    #[default(false)]
    #[arg(long = "no_alignment")]
    pub no_alignment: bool,
    #[default(false)]
    #[arg(long = "no_cohesion")]
    pub no_cohesion: bool,
    #[default(false)]
    #[arg(long = "no_seek")]
    pub no_seek: bool,

    #[default(false)]
    #[arg(long = "save")]
    /// export the recorded snapshots as CSV
    pub save: bool,

    #[default(false)]
    #[arg(long = "save_timestamp")]
    pub save_timestamp: bool,

    #[default("./".to_owned())]
    #[arg(long = "save_path")]
    pub save_path: String,
}

impl Config {
    pub fn parameter_input(&self) -> ParameterInput {
        ParameterInput {
            angle_of_view: self.angle_of_view,
            neighbour_distance: self.neighbour_distance,
            separation_distance: self.separation_distance,
            separation_factor: self.separation_factor,
            cohesion_factor: self.cohesion_factor,
            alignment_factor: self.alignment_factor,
            max_speed: self.max_speed,
            min_speed_fraction: self.min_speed_fraction,
            duration: self.duration,
            steps: self.steps,
            prescale: self.prescale,
            no_boids: self.no_boids,
            bounds: WorldBounds::new(0., self.world_width, 0., self.world_height),
            rules: RuleSet {
                separation_on: !self.no_separation,
                alignment_on: !self.no_alignment,
                cohesion_on: !self.no_cohesion,
                seek_on: !self.no_seek,
            },
        }
    }

    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            save_locations: self.save,
            save_locations_path: Some(self.save_path.clone()),
            save_locations_timestamp: self.save_timestamp,
        }
    }
}

/// Merges the config file, if there is one, with the command line, the
/// latter taking precedence.
pub fn load_config(args: &mut Args) -> Result<Config> {
    let path = args.config_path.clone();
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(_) => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::from(&mut args.config));
        }
    };

    let from_file = parse_config_file(&path, BufReader::new(file))
        .with_context(|| format!("Error in configuration file {}", path.display()))?;
    debug!(path = %path.display(), "loaded config file");

    Ok(Config::from(from_file).merge(&mut args.config))
}

fn parse_config_file<R: Read>(path: &Path, mut reader: R) -> Result<<Config as ClapSerde>::Opt> {
    let is_toml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;
        Ok(toml::from_str(&contents)?)
    } else {
        Ok(serde_yaml::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use boids_lib::options::{ParameterInput, Parameters};
    use clap_serde_derive::{clap::Parser, ClapSerde};

    use super::{parse_config_file, Args, Config};

    fn parse(cli: &[&str], file: Option<(&str, &str)>) -> Config {
        let mut args = Args::parse_from(cli);
        match file {
            Some((name, contents)) => {
                let from_file = parse_config_file(Path::new(name), contents.as_bytes()).unwrap();
                Config::from(from_file).merge(&mut args.config)
            }
            None => Config::from(&mut args.config),
        }
    }

    #[test]
    fn defaults_match_library_defaults() {
        let config = parse(&["boids"], None);

        assert_eq!(config.parameter_input(), ParameterInput::default());
        assert!(!config.save);
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn short_flags() {
        let config = parse(
            &["boids", "-A", "180", "-b", "40", "-S", "500", "-p", "10", "-V", "20"],
            None,
        );

        assert_eq!(config.angle_of_view, 180.);
        assert_eq!(config.no_boids, 40);
        assert_eq!(config.steps, 500);
        assert_eq!(config.prescale, 10);
        assert_eq!(config.max_speed, 20.);
    }

    #[test]
    fn yaml_file_then_command_line() {
        let yaml = "neighbour_distance: 20.0\nno_boids: 64\nno_seek: true\n";
        let config = parse(&["boids", "-b", "32"], Some(("config.yaml", yaml)));

        assert_eq!(config.neighbour_distance, 20.);
        assert_eq!(config.no_boids, 32);
        let rules = config.parameter_input().rules;
        assert!(!rules.seek_on);
        assert!(rules.separation_on);
    }

    #[test]
    fn toml_file() {
        let toml = "cohesion_factor = 0.5\nworld_width = 200.0\n";
        let config = parse(&["boids"], Some(("run.toml", toml)));

        assert_eq!(config.cohesion_factor, 0.5);
        assert_eq!(config.parameter_input().bounds.width(), 200.);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let bad = "no_boids: [1, 2]\n";
        assert!(parse_config_file(Path::new("config.yaml"), bad.as_bytes()).is_err());
    }

    #[test]
    fn out_of_range_value_is_rejected_by_the_library() {
        let config = parse(&["boids", "-s", "7"], None);

        let err = Parameters::new(config.parameter_input()).unwrap_err();
        assert_eq!(err.name(), "separation-factor");
    }
}
