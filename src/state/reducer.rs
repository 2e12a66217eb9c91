use std::marker::PhantomData;

use thiserror::Error;

use crate::mvi::Reducer;

use super::{Payload, StateChange, StateTag, Transition, UiState};

/// A transition inconsistent with the state it was applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot apply '{change}' while {from}")]
    Illegal { from: StateTag, change: &'static str },

    #[error("Conflicting state changes in one transition: '{first}' and '{second}'")]
    Conflicting {
        first: &'static str,
        second: &'static str,
    },

    #[error("Cannot restore to a transient state")]
    RestoreToTransient,
}

/// Apply the state part of `transition` to `current`.
///
/// Pure and deterministic: no side effects, and the same inputs always give
/// the same result. Presentation and route changes are ignored here; the
/// feature model applies those against the arbiter and the route stack.
pub fn apply<T: Payload, E: Payload, R>(
    current: &UiState<T, E>,
    transition: &Transition<T, E, R>,
) -> Result<UiState<T, E>, TransitionError> {
    let change = match transition.state_changes() {
        [] => return Ok(current.clone()),
        [change] => change,
        [first, second, ..] => {
            return Err(TransitionError::Conflicting {
                first: first.name(),
                second: second.name(),
            })
        }
    };

    let from = current.tag();
    let illegal = || TransitionError::Illegal {
        from,
        change: change.name(),
    };

    match change {
        StateChange::Reset => Ok(UiState::Idle),
        StateChange::Loading => Ok(UiState::Loading),
        StateChange::Loaded(payload) => match from {
            StateTag::Loading | StateTag::Loaded | StateTag::Empty => {
                Ok(UiState::Loaded(payload.clone()))
            }
            _ => Err(illegal()),
        },
        StateChange::Empty => match from {
            StateTag::Loading | StateTag::Loaded | StateTag::Empty => Ok(UiState::Empty),
            _ => Err(illegal()),
        },
        StateChange::Failed(error) => Ok(UiState::Failed(error.clone())),
        StateChange::Restore(settled) => {
            if settled.is_loading() {
                return Err(TransitionError::RestoreToTransient);
            }
            match from {
                StateTag::Loading => Ok(settled.clone()),
                _ => Err(illegal()),
            }
        }
    }
}

/// [`Reducer`] over [`UiState`] driven by [`Transition`]s.
pub struct StateReducer<T, E, R>(PhantomData<fn() -> (T, E, R)>);

impl<T: Payload, E: Payload, R> Reducer for StateReducer<T, E, R> {
    type State = UiState<T, E>;
    type Input = Transition<T, E, R>;
    type Error = TransitionError;

    fn reduce(state: &Self::State, input: &Self::Input) -> Result<Self::State, Self::Error> {
        apply(state, input)
    }
}
