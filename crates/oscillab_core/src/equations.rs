//! Catalog of the second-order ODE models the engine can integrate.
//!
//! Each model has a parameter struct whose `Default` carries the declared
//! defaults. Caller-supplied values override them by name when the equation is
//! resolved; names a model does not declare are ignored.

use crate::error::{Result, SimError};
use crate::traits::{state, DynamicalSystem, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Named physical parameters supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquationParameters(HashMap<String, f64>);

impl EquationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(name.into(), value)
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn or(&self, name: &str, default: f64) -> f64 {
        self.get(name).unwrap_or(default)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for EquationParameters {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquationId {
    FreeFall,
    FluidResistance,
    Sho,
    Dho,
    Ddho,
    Pendulum,
    ComplexPendulum,
    MassSpringDamper,
}

impl EquationId {
    pub const ALL: [EquationId; 8] = [
        EquationId::FreeFall,
        EquationId::FluidResistance,
        EquationId::Sho,
        EquationId::Dho,
        EquationId::Ddho,
        EquationId::Pendulum,
        EquationId::ComplexPendulum,
        EquationId::MassSpringDamper,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EquationId::FreeFall => "free_fall",
            EquationId::FluidResistance => "fluid_resistance",
            EquationId::Sho => "sho",
            EquationId::Dho => "dho",
            EquationId::Ddho => "ddho",
            EquationId::Pendulum => "pendulum",
            EquationId::ComplexPendulum => "complex_pendulum",
            EquationId::MassSpringDamper => "mass_spring_damper",
        }
    }

    /// Declared parameter names and their defaults, in declaration order.
    pub fn default_parameters(self) -> Vec<(&'static str, f64)> {
        match self {
            EquationId::FreeFall => {
                let p = FreeFallParams::default();
                vec![("g", p.g)]
            }
            EquationId::FluidResistance => {
                let p = FluidResistanceParams::default();
                vec![("g", p.g), ("k", p.k), ("m", p.m)]
            }
            EquationId::Sho => {
                let p = ShoParams::default();
                vec![("k", p.k), ("m", p.m)]
            }
            EquationId::Dho => {
                let p = DhoParams::default();
                vec![("k", p.k), ("b", p.b), ("m", p.m)]
            }
            EquationId::Ddho => {
                let p = DdhoParams::default();
                vec![
                    ("k", p.k),
                    ("b", p.b),
                    ("m", p.m),
                    ("Fo", p.fo),
                    ("Wo", p.wo),
                ]
            }
            EquationId::Pendulum => {
                let p = PendulumParams::default();
                vec![("g", p.g), ("L", p.l)]
            }
            EquationId::ComplexPendulum => {
                let p = ComplexPendulumParams::default();
                vec![
                    ("g", p.g),
                    ("L", p.l),
                    ("m", p.m),
                    ("damping", p.damping),
                    ("driving_force", p.driving_force),
                    ("driving_freq", p.driving_freq),
                ]
            }
            EquationId::MassSpringDamper => {
                let p = MassSpringDamperParams::default();
                vec![
                    ("m", p.m),
                    ("k", p.k),
                    ("c", p.c),
                    ("F0", p.f0),
                    ("omega", p.omega),
                ]
            }
        }
    }
}

impl fmt::Display for EquationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EquationId {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        EquationId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| SimError::UnknownEquation(s.to_string()))
    }
}

/// Free fall under constant gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeFallParams {
    pub g: f64,
}

impl Default for FreeFallParams {
    fn default() -> Self {
        Self { g: -9.8 }
    }
}

/// Fall with exponentially decaying driving acceleration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluidResistanceParams {
    pub g: f64,
    pub k: f64,
    pub m: f64,
}

impl Default for FluidResistanceParams {
    fn default() -> Self {
        Self {
            g: 9.8,
            k: 0.1,
            m: 1.0,
        }
    }
}

/// Simple harmonic oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShoParams {
    pub k: f64,
    pub m: f64,
}

impl Default for ShoParams {
    fn default() -> Self {
        Self { k: 1.0, m: 1.0 }
    }
}

/// Damped harmonic oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DhoParams {
    pub k: f64,
    pub b: f64,
    pub m: f64,
}

impl Default for DhoParams {
    fn default() -> Self {
        Self {
            k: 1.0,
            b: 0.1,
            m: 1.0,
        }
    }
}

/// Damped, driven harmonic oscillator. `fo`/`wo` are the `Fo`/`Wo` parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DdhoParams {
    pub k: f64,
    pub b: f64,
    pub m: f64,
    pub fo: f64,
    pub wo: f64,
}

impl Default for DdhoParams {
    fn default() -> Self {
        Self {
            k: 1.0,
            b: 0.1,
            m: 1.0,
            fo: 1.0,
            wo: 1.0,
        }
    }
}

/// Nonlinear pendulum. `l` is the `L` parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendulumParams {
    pub g: f64,
    pub l: f64,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self { g: 9.8, l: 1.0 }
    }
}

/// Damped, driven nonlinear pendulum. `m` is accepted but does not enter the dynamics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexPendulumParams {
    pub g: f64,
    pub l: f64,
    pub m: f64,
    pub damping: f64,
    pub driving_force: f64,
    pub driving_freq: f64,
}

impl Default for ComplexPendulumParams {
    fn default() -> Self {
        Self {
            g: 9.8,
            l: 1.0,
            m: 1.0,
            damping: 0.1,
            driving_force: 0.5,
            driving_freq: 1.0,
        }
    }
}

/// Mass-spring-damper with cosine forcing. `f0` is the `F0` parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassSpringDamperParams {
    pub m: f64,
    pub k: f64,
    pub c: f64,
    pub f0: f64,
    pub omega: f64,
}

impl Default for MassSpringDamperParams {
    fn default() -> Self {
        Self {
            m: 1.0,
            k: 1.0,
            c: 0.2,
            f0: 0.0,
            omega: 0.0,
        }
    }
}

/// An equation from the catalog with its parameters fully resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Equation {
    FreeFall(FreeFallParams),
    FluidResistance(FluidResistanceParams),
    Sho(ShoParams),
    Dho(DhoParams),
    Ddho(DdhoParams),
    Pendulum(PendulumParams),
    ComplexPendulum(ComplexPendulumParams),
    MassSpringDamper(MassSpringDamperParams),
}

impl Equation {
    /// Merges `params` over the declared defaults of `id`.
    pub fn resolve(id: EquationId, params: &EquationParameters) -> Self {
        match id {
            EquationId::FreeFall => {
                let d = FreeFallParams::default();
                Equation::FreeFall(FreeFallParams {
                    g: params.or("g", d.g),
                })
            }
            EquationId::FluidResistance => {
                let d = FluidResistanceParams::default();
                Equation::FluidResistance(FluidResistanceParams {
                    g: params.or("g", d.g),
                    k: params.or("k", d.k),
                    m: params.or("m", d.m),
                })
            }
            EquationId::Sho => {
                let d = ShoParams::default();
                Equation::Sho(ShoParams {
                    k: params.or("k", d.k),
                    m: params.or("m", d.m),
                })
            }
            EquationId::Dho => {
                let d = DhoParams::default();
                Equation::Dho(DhoParams {
                    k: params.or("k", d.k),
                    b: params.or("b", d.b),
                    m: params.or("m", d.m),
                })
            }
            EquationId::Ddho => {
                let d = DdhoParams::default();
                Equation::Ddho(DdhoParams {
                    k: params.or("k", d.k),
                    b: params.or("b", d.b),
                    m: params.or("m", d.m),
                    fo: params.or("Fo", d.fo),
                    wo: params.or("Wo", d.wo),
                })
            }
            EquationId::Pendulum => {
                let d = PendulumParams::default();
                Equation::Pendulum(PendulumParams {
                    g: params.or("g", d.g),
                    l: params.or("L", d.l),
                })
            }
            EquationId::ComplexPendulum => {
                let d = ComplexPendulumParams::default();
                Equation::ComplexPendulum(ComplexPendulumParams {
                    g: params.or("g", d.g),
                    l: params.or("L", d.l),
                    m: params.or("m", d.m),
                    damping: params.or("damping", d.damping),
                    driving_force: params.or("driving_force", d.driving_force),
                    driving_freq: params.or("driving_freq", d.driving_freq),
                })
            }
            EquationId::MassSpringDamper => {
                let d = MassSpringDamperParams::default();
                Equation::MassSpringDamper(MassSpringDamperParams {
                    m: params.or("m", d.m),
                    k: params.or("k", d.k),
                    c: params.or("c", d.c),
                    f0: params.or("F0", d.f0),
                    omega: params.or("omega", d.omega),
                })
            }
        }
    }
}

impl DynamicalSystem for Equation {
    fn apply(&self, t: f64, x: &State) -> State {
        let (pos, vel) = (x[0], x[1]);
        let acc = match *self {
            Equation::FreeFall(p) => p.g,
            Equation::FluidResistance(p) => p.g * (-p.k * t / p.m).exp(),
            Equation::Sho(p) => -p.k / p.m * pos,
            Equation::Dho(p) => -(p.k * pos + p.b * vel) / p.m,
            Equation::Ddho(p) => -(p.k * pos + p.b * vel) / p.m - p.fo * (10.0 * p.wo * t).cos(),
            Equation::Pendulum(p) => -p.g / p.l * pos.sin(),
            Equation::ComplexPendulum(p) => {
                -p.g / p.l * pos.sin() - p.damping * vel
                    + p.driving_force * (p.driving_freq * t).cos()
            }
            Equation::MassSpringDamper(p) => {
                -p.k / p.m * pos - p.c / p.m * vel + p.f0 / p.m * (p.omega * t).cos()
            }
        };
        state(vel, acc)
    }
}
