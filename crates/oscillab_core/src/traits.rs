use nalgebra::Vector2;

/// State of a one-dimensional mechanical system: `(position, velocity)`.
pub type State = Vector2<f64>;

/// Builds a state from its position and velocity components.
pub fn state(position: f64, velocity: f64) -> State {
    Vector2::new(position, velocity)
}

/// A second-order ODE reduced to first-order form.
pub trait DynamicalSystem {
    /// Evaluates the vector field.
    /// t: current time
    /// x: current state
    /// Returns `(dx/dt, dv/dt)`.
    fn apply(&self, t: f64, x: &State) -> State;
}

/// A fixed-step integrator that advances a system by one step.
pub trait Steppable {
    /// Performs one step of size dt starting from `(t, state)` and returns the next state.
    fn step(&self, system: &impl DynamicalSystem, t: f64, state: &State, dt: f64) -> State;
}
