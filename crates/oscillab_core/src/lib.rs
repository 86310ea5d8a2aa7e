pub mod engine;
pub mod equations;
pub mod error;
pub mod integrators;
pub mod request;
pub mod sweep;
/// The `oscillab_core` crate is the numerical engine behind oscillab.
/// It integrates one-dimensional second-order ODEs on a fixed time grid.
///
/// Key components:
/// - **Traits**: `DynamicalSystem` (vector field of a 2-state) and `Steppable` (integrators).
/// - **Equations**: closed catalog of oscillator, pendulum and fall models with per-model defaults.
/// - **Integrators**: Euler, RK2, RK4 and Verlet single-step methods.
/// - **Engine**: fixed-step loop producing time/position/velocity series.
/// - **Sweep**: reruns the engine across a range of one parameter.
pub mod traits;

pub use engine::{compare_simulations, run_simulation, LabeledSeries, TimeSeries};
pub use equations::{Equation, EquationId, EquationParameters};
pub use error::{Result, SimError};
pub use integrators::Method;
pub use request::{RawSimulationRequest, SimulationRequest};
pub use sweep::{
    plan_sweep, run_sweep, run_sweep_with_settings, ParamEntry, ParameterRange, RangeSpec,
    SweepFrame, SweepParams, SweepPlan, SweepProgress, SweepRunner, SweepSettings,
    SweepSpecification,
};
