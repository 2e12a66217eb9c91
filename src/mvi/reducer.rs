//! Reducer trait for MVI architecture.

use super::state::ViewState;

/// Reducer transforms state based on a transition.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: `(&State, &Input) -> Result<State, Error>`.
/// Rejected inputs leave the caller's state untouched.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: ViewState;

    /// The input type this reducer consumes.
    type Input;

    /// The error returned for inputs inconsistent with the current state.
    type Error;

    /// Compute the next state.
    ///
    /// Must be deterministic: the same `(state, input)` pair always yields
    /// the same result.
    fn reduce(state: &Self::State, input: &Self::Input) -> Result<Self::State, Self::Error>;
}
