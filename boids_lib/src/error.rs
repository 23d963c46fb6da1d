use thiserror::Error;

/// Raised while validating a [`ParameterInput`](crate::options::ParameterInput).
///
/// Every variant names the offending parameter with the same hyphenated name
/// the command line uses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Parameter {name} ({value}) is not in the required range ({min}, {max})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("Parameter {name} ({value}) must be greater than {min}")]
    NotGreaterThan {
        name: &'static str,
        value: f64,
        min: f64,
    },
    #[error("World bounds along {axis} are empty: min {min} is not below max {max}")]
    InvalidBounds { axis: char, min: f64, max: f64 },
}

impl ParameterError {
    /// Name of the parameter that failed validation
    pub fn name(&self) -> &'static str {
        match self {
            ParameterError::OutOfRange { name, .. } => name,
            ParameterError::NotGreaterThan { name, .. } => name,
            ParameterError::InvalidBounds { axis: 'x', .. } => "world-x-bounds",
            ParameterError::InvalidBounds { .. } => "world-y-bounds",
        }
    }
}

#[derive(Debug, Error)]
pub enum BirdwatcherError {
    #[error("can't open data file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("can't write data point")]
    Csv(#[from] csv::Error),
}
