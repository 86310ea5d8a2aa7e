use crate::equations::{Equation, EquationId, EquationParameters};
use crate::error::{Result, SimError};
use crate::integrators::Method;
use serde::{Deserialize, Serialize};

/// One fully-resolved simulation run.
///
/// Fields are private so that a constructed request always satisfies
/// `n >= 2` and `t_total > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    method: Method,
    equation: EquationId,
    params: EquationParameters,
    x0: f64,
    v0: f64,
    t_total: f64,
    n: usize,
}

impl SimulationRequest {
    pub fn new(
        method: Method,
        equation: EquationId,
        params: EquationParameters,
        x0: f64,
        v0: f64,
        t_total: f64,
        n: usize,
    ) -> Result<Self> {
        validate_grid(t_total, n)?;
        Ok(Self {
            method,
            equation,
            params,
            x0,
            v0,
            t_total,
            n,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn equation(&self) -> EquationId {
        self.equation
    }

    pub fn params(&self) -> &EquationParameters {
        &self.params
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn v0(&self) -> f64 {
        self.v0
    }

    pub fn t_total(&self) -> f64 {
        self.t_total
    }

    /// Number of samples, including the initial state.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Uniform step size `t_total / (n - 1)`.
    pub fn step_size(&self) -> f64 {
        self.t_total / (self.n - 1) as f64
    }

    /// The equation with caller parameters merged over its defaults.
    pub fn resolved_equation(&self) -> Equation {
        Equation::resolve(self.equation, &self.params)
    }
}

pub(crate) fn validate_grid(t_total: f64, n: usize) -> Result<()> {
    if n < 2 {
        return Err(SimError::InvalidRequest(format!(
            "N must be at least 2, got {n}"
        )));
    }
    if !(t_total.is_finite() && t_total > 0.0) {
        return Err(SimError::InvalidRequest(format!(
            "t_total must be positive and finite, got {t_total}"
        )));
    }
    Ok(())
}

/// Loosely-typed form of [`SimulationRequest`] as it arrives from a host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSimulationRequest {
    pub method: String,
    pub equation: String,
    #[serde(default)]
    pub params: EquationParameters,
    pub x0: f64,
    pub v0: f64,
    pub t_total: f64,
    #[serde(rename = "N")]
    pub n: i64,
}

impl RawSimulationRequest {
    /// Resolves names against the catalogs and validates the time grid.
    pub fn resolve(&self) -> Result<SimulationRequest> {
        let method: Method = self.method.parse()?;
        let equation: EquationId = self.equation.parse()?;
        let n = usize::try_from(self.n).map_err(|_| {
            SimError::InvalidRequest(format!("N must be at least 2, got {}", self.n))
        })?;
        SimulationRequest::new(
            method,
            equation,
            self.params.clone(),
            self.x0,
            self.v0,
            self.t_total,
            n,
        )
    }
}
