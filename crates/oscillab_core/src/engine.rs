use crate::error::Result;
use crate::request::SimulationRequest;
use crate::traits::state;
use serde::{Deserialize, Serialize};

/// Sampled trajectory of one run. All three vectors have the same length and
/// entry `i` of each describes the same instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub time: Vec<f64>,
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Final `(time, position, velocity)` sample, if any.
    pub fn last(&self) -> Option<(f64, f64, f64)> {
        let i = self.len().checked_sub(1)?;
        Some((self.time[i], self.position[i], self.velocity[i]))
    }
}

/// A series tagged with the method and equation that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSeries {
    pub label: String,
    pub series: TimeSeries,
}

/// Integrates `request` on a uniform grid of `n` samples from `0` to `t_total`.
pub fn run_simulation(request: &SimulationRequest) -> Result<TimeSeries> {
    crate::request::validate_grid(request.t_total(), request.n())?;

    let n = request.n();
    let dt = request.step_size();
    let method = request.method();
    let system = request.resolved_equation();

    log::debug!(
        "running {} with {} over t_total={} (N={}, dt={})",
        request.equation(),
        method,
        request.t_total(),
        n,
        dt
    );

    let mut time = Vec::with_capacity(n);
    time.extend((0..n).map(|i| i as f64 * dt));
    // Same convention as a closed linspace: the last sample lands exactly on t_total.
    time[n - 1] = request.t_total();

    let mut position = Vec::with_capacity(n);
    let mut velocity = Vec::with_capacity(n);
    let mut x = state(request.x0(), request.v0());
    position.push(x[0]);
    velocity.push(x[1]);

    for &t in &time[..n - 1] {
        x = method.step(&system, t, &x, dt);
        position.push(x[0]);
        velocity.push(x[1]);
    }

    if !(x[0].is_finite() && x[1].is_finite()) {
        log::warn!(
            "{} with {} diverged: final state ({}, {})",
            request.equation(),
            method,
            x[0],
            x[1]
        );
    }

    Ok(TimeSeries {
        time,
        position,
        velocity,
    })
}

/// Runs several configurations for side-by-side comparison.
///
/// Each series is labelled `"<method> - <equation>"`.
pub fn compare_simulations(requests: &[SimulationRequest]) -> Result<Vec<LabeledSeries>> {
    requests
        .iter()
        .map(|request| {
            Ok(LabeledSeries {
                label: format!("{} - {}", request.method(), request.equation()),
                series: run_simulation(request)?,
            })
        })
        .collect()
}
