use thiserror::Error;

/// Every way a simulation or sweep request can be rejected.
///
/// All variants are input-validation failures raised before any integration
/// step runs. Numerical blow-ups (NaN, infinity) are not errors; they show up
/// in the returned series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Unknown integration method: {0}")]
    UnknownMethod(String),
    #[error("Unknown equation: {0}")]
    UnknownEquation(String),
    #[error("Invalid simulation request: {0}")]
    InvalidRequest(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("N must be greater than 1, got {0}")]
    InvalidStepCount(i64),
    #[error("No varying parameter: expected one parameter given as a {{min, max, step}} range")]
    NoVaryingParameter,
    #[error("Invalid parameter range: min ({min}) must be less than max ({max})")]
    InvalidRange { min: f64, max: f64 },
    #[error("Invalid parameter step: step must be positive, got {0}")]
    InvalidStep(f64),
    #[error("Invalid parameter range: no values generated")]
    EmptyRange,
    #[error("Sweep would produce more than the limit of {limit} frames")]
    TooManyFrames { limit: usize },
}

impl SimError {
    /// Stable machine-readable identifier for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            SimError::UnknownMethod(_) => "unknown_method",
            SimError::UnknownEquation(_) => "unknown_equation",
            SimError::InvalidRequest(_) => "invalid_request",
            SimError::MissingField(_) => "missing_field",
            SimError::InvalidStepCount(_) => "invalid_step_count",
            SimError::NoVaryingParameter => "no_varying_parameter",
            SimError::InvalidRange { .. } => "invalid_range",
            SimError::InvalidStep(_) => "invalid_step",
            SimError::EmptyRange => "empty_range",
            SimError::TooManyFrames { .. } => "too_many_frames",
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
