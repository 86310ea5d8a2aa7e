use crate::error::{Result, SimError};
use crate::traits::{state, DynamicalSystem, State, Steppable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forward Euler
pub struct Euler;

impl Steppable for Euler {
    fn step(&self, system: &impl DynamicalSystem, t: f64, state: &State, dt: f64) -> State {
        state + system.apply(t, state) * dt
    }
}

/// Second-order Runge-Kutta (Heun form: slopes at both ends of the step).
pub struct RungeKutta2;

impl Steppable for RungeKutta2 {
    fn step(&self, system: &impl DynamicalSystem, t: f64, state: &State, dt: f64) -> State {
        let k1 = system.apply(t, state) * dt;
        let k2 = system.apply(t + dt, &(state + k1)) * dt;
        state + (k1 + k2) * 0.5
    }
}

/// Classic Runge-Kutta 4th Order Solver
pub struct RungeKutta4;

impl Steppable for RungeKutta4 {
    fn step(&self, system: &impl DynamicalSystem, t: f64, state: &State, dt: f64) -> State {
        let half = 0.5 * dt;

        // k1 = dt * f(t, y)
        let k1 = system.apply(t, state) * dt;
        // k2 = dt * f(t + dt/2, y + k1/2)
        let k2 = system.apply(t + half, &(state + k1 * 0.5)) * dt;
        // k3 = dt * f(t + dt/2, y + k2/2)
        let k3 = system.apply(t + half, &(state + k2 * 0.5)) * dt;
        // k4 = dt * f(t + dt, y + k3)
        let k4 = system.apply(t + dt, &(state + k3)) * dt;

        state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0
    }
}

/// Drift-kick-drift Verlet.
///
/// The acceleration is sampled once at the half step. Both drifts use the
/// starting velocity, so the map is symplectic only when the acceleration does
/// not depend on the state. For `sho` each step scales the phase-space area by
/// `1 + dt²/2`.
pub struct VelocityVerlet;

impl Steppable for VelocityVerlet {
    fn step(&self, system: &impl DynamicalSystem, t: f64, x: &State, dt: f64) -> State {
        let drift = x[1] * dt / 2.0;
        let half = state(x[0] + drift, x[1]);
        let acc = system.apply(t + dt / 2.0, &half)[1];
        state(half[0] + drift, half[1] + acc * dt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Euler,
    RungeKutta2,
    RungeKutta4,
    VelocityVerlet,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::Euler,
        Method::RungeKutta2,
        Method::RungeKutta4,
        Method::VelocityVerlet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::RungeKutta2 => "runge_kutta2",
            Method::RungeKutta4 => "runge_kutta4",
            Method::VelocityVerlet => "velocity_verlet",
        }
    }

    /// Advances `state` by one step of `dt` using this method.
    pub fn step(self, system: &impl DynamicalSystem, t: f64, state: &State, dt: f64) -> State {
        match self {
            Method::Euler => Euler.step(system, t, state, dt),
            Method::RungeKutta2 => RungeKutta2.step(system, t, state, dt),
            Method::RungeKutta4 => RungeKutta4.step(system, t, state, dt),
            Method::VelocityVerlet => VelocityVerlet.step(system, t, state, dt),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| SimError::UnknownMethod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// dx/dt = v, dv/dt = rate * x
    struct Linear {
        rate: f64,
    }

    impl DynamicalSystem for Linear {
        fn apply(&self, _t: f64, x: &State) -> State {
            state(x[1], self.rate * x[0])
        }
    }

    /// dx/dt = 0, dv/dt = t
    struct Ramp;

    impl DynamicalSystem for Ramp {
        fn apply(&self, t: f64, _x: &State) -> State {
            state(0.0, t)
        }
    }

    #[test]
    fn method_names_round_trip() {
        for method in Method::ALL {
            assert_eq!(method.name().parse::<Method>(), Ok(method));
        }
        assert_eq!(
            "bogus".parse::<Method>(),
            Err(SimError::UnknownMethod("bogus".to_string()))
        );
    }

    #[test]
    fn euler_takes_a_single_slope() {
        let next = Euler.step(&Linear { rate: -1.0 }, 0.0, &state(1.0, 2.0), 0.5);
        assert_eq!(next, state(2.0, 1.5));
    }

    #[test]
    fn runge_kutta2_averages_endpoint_slopes() {
        // k1 = (0, 0), k2 = (0, h * h)
        let next = RungeKutta2.step(&Ramp, 0.0, &state(0.0, 0.0), 0.2);
        assert!((next[1] - 0.5 * 0.2 * 0.2).abs() < 1e-15);
        assert_eq!(next[0], 0.0);
    }

    #[test]
    fn runge_kutta4_integrates_polynomials_in_time_exactly() {
        // dv/dt = t over one step from t = 1: exact increment is t*h + h^2/2.
        let h = 0.3;
        let next = RungeKutta4.step(&Ramp, 1.0, &state(0.0, 0.0), h);
        assert!((next[1] - (h + h * h / 2.0)).abs() < 1e-14);
    }

    #[test]
    fn runge_kutta4_matches_exponential_growth() {
        // x'' = x with x(0) = 1, v(0) = 1 has solution e^t.
        let system = Linear { rate: 1.0 };
        let mut x = state(1.0, 1.0);
        let dt = 0.01;
        for i in 0..100 {
            x = RungeKutta4.step(&system, i as f64 * dt, &x, dt);
        }
        assert!((x[0] - 1.0f64.exp()).abs() < 1e-8);
        assert!((x[1] - 1.0f64.exp()).abs() < 1e-8);
    }

    #[test]
    fn velocity_verlet_drifts_with_starting_velocity() {
        struct Gravity;
        impl DynamicalSystem for Gravity {
            fn apply(&self, _t: f64, x: &State) -> State {
                state(x[1], -10.0)
            }
        }
        let next = VelocityVerlet.step(&Gravity, 0.0, &state(0.0, 5.0), 0.5);
        // Both drifts use the starting velocity, so position moves by v0 * dt.
        assert!((next[0] - 2.5).abs() < 1e-15);
        assert!((next[1] - 0.0).abs() < 1e-15);
    }

    #[test]
    fn velocity_verlet_samples_oscillator_at_half_drift() {
        let system = Linear { rate: -1.0 };
        let next = VelocityVerlet.step(&system, 0.0, &state(1.0, 2.0), 0.1);
        // Half drift to 1.1, acceleration -1.1, full drift to 1.2.
        assert!((next[0] - 1.2).abs() < 1e-15);
        assert!((next[1] - 1.89).abs() < 1e-15);

        let mut x = state(1.0, 0.0);
        let dt = 0.05;
        for i in 0..2000 {
            x = VelocityVerlet.step(&system, i as f64 * dt, &x, dt);
        }
        let energy = 0.5 * (x[0] * x[0] + x[1] * x[1]);
        let bound = 0.5 * (1.0 + dt * dt / 2.0).powi(2000);
        assert!(energy.is_finite());
        assert!(energy > 0.5 && energy <= 2.0 * bound, "energy {energy}, bound {bound}");
    }

    #[test]
    fn enum_dispatch_matches_direct_steppers() {
        let system = Linear { rate: -2.0 };
        let x = state(0.3, -0.7);
        assert_eq!(Method::Euler.step(&system, 0.1, &x, 0.01), Euler.step(&system, 0.1, &x, 0.01));
        assert_eq!(
            Method::RungeKutta4.step(&system, 0.1, &x, 0.01),
            RungeKutta4.step(&system, 0.1, &x, 0.01)
        );
    }
}
