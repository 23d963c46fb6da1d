use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

/// Raw, unvalidated simulation settings as a user supplies them.
///
/// Turn it into [`Parameters`] with [`Parameters::new`] before running anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterInput {
    /// field of view in degrees, (0, 360)
    pub angle_of_view: f64,
    /// neighbour distance
    pub neighbour_distance: f64,
    /// separation distance
    pub separation_distance: f64,
    pub separation_factor: f64,
    pub cohesion_factor: f64,
    pub alignment_factor: f64,
    pub max_speed: f64,
    /// minimum speed expressed as a fraction of `max_speed`
    pub min_speed_fraction: f64,
    /// simulated time covered by a batch run
    pub duration: f64,
    /// number of evolutions in a batch run
    pub steps: u32,
    /// record a snapshot every `prescale` steps
    pub prescale: u32,
    pub no_boids: u32,
    pub bounds: WorldBounds,
    pub rules: RuleSet,
}

impl Default for ParameterInput {
    fn default() -> Self {
        ParameterInput {
            angle_of_view: 300.,
            neighbour_distance: 35.,
            separation_distance: 3.5,
            separation_factor: 1.5,
            cohesion_factor: 0.1,
            alignment_factor: 1.6,
            max_speed: 80.,
            min_speed_fraction: 0.000005,
            duration: 30.,
            steps: 3000,
            prescale: 60,
            no_boids: 120,
            bounds: Default::default(),
            rules: Default::default(),
        }
    }
}

/// Rectangular region the boids are encouraged to stay in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// lowest x value
    pub x_min: f64,
    /// highest x value
    pub x_max: f64,
    /// lowest y value
    pub y_min: f64,
    /// highest y value
    pub y_max: f64,
}

impl WorldBounds {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        WorldBounds {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        WorldBounds::new(0., 100., 0., 100.)
    }
}

/// Switches for the individual steering rules. A rule that is off contributes
/// a zero velocity delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub separation_on: bool,
    pub alignment_on: bool,
    pub cohesion_on: bool,
    pub seek_on: bool,
}

impl RuleSet {
    /// every rule switched off, boids just glide
    pub fn none() -> Self {
        RuleSet {
            separation_on: false,
            alignment_on: false,
            cohesion_on: false,
            seek_on: false,
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            separation_on: true,
            alignment_on: true,
            cohesion_on: true,
            seek_on: true,
        }
    }
}

/// Separation distance and factor towards predators are this many times the
/// regular ones.
pub const PREDATOR_SEPARATION_RATIO: f64 = 2.5;

/// Validated, immutable simulation settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    angle: f64,
    d: f64,
    d_s: f64,
    s: f64,
    c: f64,
    a: f64,
    max_speed: f64,
    min_speed: f64,
    duration: f64,
    steps: u32,
    prescale: u32,
    no_boids: u32,
    bounds: WorldBounds,
    rules: RuleSet,

    // derived
    d_s_pred: f64,
    s_pred: f64,
}

fn is_in_range<T>(val: T, val_min: T, val_max: T, name: &'static str) -> Result<(), ParameterError>
where
    T: PartialOrd + Copy + Into<f64>,
{
    // written so that NaN fails as well
    if val > val_min && val < val_max {
        Ok(())
    } else {
        Err(ParameterError::OutOfRange {
            name,
            value: val.into(),
            min: val_min.into(),
            max: val_max.into(),
        })
    }
}

fn is_greater_than<T>(val: T, val_min: T, name: &'static str) -> Result<(), ParameterError>
where
    T: PartialOrd + Copy + Into<f64>,
{
    if val > val_min {
        Ok(())
    } else {
        Err(ParameterError::NotGreaterThan {
            name,
            value: val.into(),
            min: val_min.into(),
        })
    }
}

fn is_ordered(min: f64, max: f64, axis: char) -> Result<(), ParameterError> {
    if min < max {
        Ok(())
    } else {
        Err(ParameterError::InvalidBounds { axis, min, max })
    }
}

impl Parameters {
    /// Validates every field of `input`, stopping at the first violation.
    pub fn new(input: ParameterInput) -> Result<Self, ParameterError> {
        let ParameterInput {
            angle_of_view,
            neighbour_distance,
            separation_distance,
            separation_factor,
            cohesion_factor,
            alignment_factor,
            max_speed,
            min_speed_fraction,
            duration,
            steps,
            prescale,
            no_boids,
            bounds,
            rules,
        } = input;

        is_ordered(bounds.x_min, bounds.x_max, 'x')?;
        is_ordered(bounds.y_min, bounds.y_max, 'y')?;

        is_in_range(angle_of_view, 0., 360., "angle-of-view")?;
        is_in_range(
            neighbour_distance,
            0.,
            bounds.width().min(bounds.height()),
            "neighbour-distance",
        )?;
        // d_s has to be well below d for a flock to form at all
        is_in_range(
            separation_distance,
            0.,
            0.5 * neighbour_distance,
            "separation-distance",
        )?;
        is_in_range(separation_factor, 0., 5., "separation-factor")?;
        is_in_range(cohesion_factor, 0., 5., "cohesion-factor")?;
        is_in_range(alignment_factor, 0., 5., "alignment-factor")?;
        is_greater_than(max_speed, 0., "maximum-speed")?;
        let min_speed = max_speed * min_speed_fraction;
        is_in_range(min_speed, 0., max_speed, "minimum-speed")?;
        is_greater_than(duration, 0., "duration-of-simulation")?;
        is_greater_than(steps, 1, "number-of-evolutions")?;
        // at least two snapshots get recorded
        is_in_range(prescale, 0, steps, "prescale")?;
        is_greater_than(no_boids, 1, "number-of-boids")?;

        Ok(Parameters {
            angle: angle_of_view,
            d: neighbour_distance,
            d_s: separation_distance,
            s: separation_factor,
            c: cohesion_factor,
            a: alignment_factor,
            max_speed,
            min_speed,
            duration,
            steps,
            prescale,
            no_boids,
            bounds,
            rules,
            d_s_pred: PREDATOR_SEPARATION_RATIO * separation_distance,
            s_pred: PREDATOR_SEPARATION_RATIO * separation_factor,
        })
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn d_s(&self) -> f64 {
        self.d_s
    }

    pub fn s(&self) -> f64 {
        self.s
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    pub fn min_speed(&self) -> f64 {
        self.min_speed
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn prescale(&self) -> u32 {
        self.prescale
    }

    pub fn no_boids(&self) -> u32 {
        self.no_boids
    }

    pub fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn d_s_pred(&self) -> f64 {
        self.d_s_pred
    }

    pub fn s_pred(&self) -> f64 {
        self.s_pred
    }

    /// Time step of one evolution in a batch run
    pub fn dt(&self) -> f64 {
        self.duration / self.steps as f64
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<28}{}", "angle-of-view:", self.angle)?;
        writeln!(f, "{:<28}{}", "neighbour-distance:", self.d)?;
        writeln!(f, "{:<28}{}", "separation-distance:", self.d_s)?;
        writeln!(f, "{:<28}{}", "separation-factor:", self.s)?;
        writeln!(f, "{:<28}{}", "cohesion-factor:", self.c)?;
        writeln!(f, "{:<28}{}", "alignment-factor:", self.a)?;
        writeln!(f, "{:<28}{}", "maximum-speed:", self.max_speed)?;
        writeln!(f, "{:<28}{}", "minimum-speed:", self.min_speed)?;
        writeln!(f, "{:<28}{}", "duration-of-simulation:", self.duration)?;
        writeln!(f, "{:<28}{}", "number-of-evolutions:", self.steps)?;
        writeln!(f, "{:<28}{}", "prescale:", self.prescale)?;
        write!(f, "{:<28}{}", "number-of-boids:", self.no_boids)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::{ParameterInput, Parameters, WorldBounds};
    use crate::error::ParameterError;

    fn with(edit: impl FnOnce(&mut ParameterInput)) -> Result<Parameters, ParameterError> {
        let mut input = ParameterInput::default();
        edit(&mut input);
        Parameters::new(input)
    }

    #[test]
    fn defaults_are_valid() {
        let pars = Parameters::new(Default::default()).unwrap();

        assert_relative_eq!(pars.min_speed(), 80. * 0.000005);
        assert_relative_eq!(pars.d_s_pred(), 2.5 * 3.5);
        assert_relative_eq!(pars.s_pred(), 2.5 * 1.5);
        assert_relative_eq!(pars.dt(), 0.01);
    }

    #[test]
    fn zero_angle_of_view_is_rejected() {
        let err = with(|i| i.angle_of_view = 0.).unwrap_err();

        assert_eq!(err.name(), "angle-of-view");
        assert!(matches!(err, ParameterError::OutOfRange { .. }));
    }

    #[rstest]
    #[case::full_circle("angle-of-view", |i: &mut ParameterInput| i.angle_of_view = 360.)]
    #[case::d_too_large("neighbour-distance", |i: &mut ParameterInput| i.neighbour_distance = 100.)]
    #[case::d_s_too_large("separation-distance", |i: &mut ParameterInput| i.separation_distance = 17.5)]
    #[case::s_zero("separation-factor", |i: &mut ParameterInput| i.separation_factor = 0.)]
    #[case::c_too_large("cohesion-factor", |i: &mut ParameterInput| i.cohesion_factor = 5.)]
    #[case::a_negative("alignment-factor", |i: &mut ParameterInput| i.alignment_factor = -1.)]
    #[case::max_speed_zero("maximum-speed", |i: &mut ParameterInput| i.max_speed = 0.)]
    #[case::min_speed_full("minimum-speed", |i: &mut ParameterInput| i.min_speed_fraction = 1.)]
    #[case::duration_zero("duration-of-simulation", |i: &mut ParameterInput| i.duration = 0.)]
    #[case::one_step("number-of-evolutions", |i: &mut ParameterInput| i.steps = 1)]
    #[case::prescale_zero("prescale", |i: &mut ParameterInput| i.prescale = 0)]
    #[case::prescale_steps("prescale", |i: &mut ParameterInput| i.prescale = 3000)]
    #[case::one_boid("number-of-boids", |i: &mut ParameterInput| i.no_boids = 1)]
    #[case::nan_angle("angle-of-view", |i: &mut ParameterInput| i.angle_of_view = f64::NAN)]
    fn invalid_parameter_is_named(
        #[case] expected: &str,
        #[case] edit: fn(&mut ParameterInput),
    ) {
        let err = with(edit).unwrap_err();
        assert_eq!(err.name(), expected);
    }

    #[test]
    fn neighbour_distance_is_bounded_by_shorter_side() {
        let bounds = WorldBounds::new(0., 200., -20., 20.);

        assert!(with(|i| {
            i.bounds = bounds;
            i.neighbour_distance = 39.;
        })
        .is_ok());

        let err = with(|i| {
            i.bounds = bounds;
            i.neighbour_distance = 40.;
        })
        .unwrap_err();
        assert_eq!(err.name(), "neighbour-distance");
    }

    #[test]
    fn empty_world_is_rejected() {
        let err = with(|i| i.bounds = WorldBounds::new(10., 10., 0., 100.)).unwrap_err();

        assert_eq!(
            err,
            ParameterError::InvalidBounds {
                axis: 'x',
                min: 10.,
                max: 10.
            }
        );
    }

    #[test]
    fn error_message_names_parameter() {
        let err = with(|i| i.cohesion_factor = 7.).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Parameter cohesion-factor (7) is not in the required range (0, 5)"
        );
    }
}
