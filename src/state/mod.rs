//! Renderable screen state and the transitions that move it.
//!
//! `UiState` is a tagged variant: a screen is idle, loading, loaded, empty
//! or failed, and never two of those at once. The only way to change it is
//! to run a [`Transition`] through [`apply`].

mod reducer;
mod transition;

use std::fmt;

use crate::mvi::ViewState;

pub use reducer::{apply, StateReducer, TransitionError};
pub use transition::{StateChange, Transition};

/// Values that can travel through the runtime as payloads, failures or routes.
pub trait Payload: Clone + PartialEq + fmt::Debug + Send + 'static {}

impl<T> Payload for T where T: Clone + PartialEq + fmt::Debug + Send + 'static {}

/// Renderable state of one screen.
#[derive(Debug, Clone, PartialEq)]
pub enum UiState<T, E> {
    /// Nothing requested yet.
    Idle,

    /// A load is in flight.
    Loading,

    /// Content is available.
    Loaded(T),

    /// The load succeeded but produced nothing to show.
    Empty,

    /// The load failed with a typed, renderable error.
    Failed(E),
}

impl<T, E> Default for UiState<T, E> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T: Payload, E: Payload> ViewState for UiState<T, E> {}

/// Discriminant of a [`UiState`], used in logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateTag {
    Idle,
    Loading,
    Loaded,
    Empty,
    Failed,
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateTag::Idle => "idle",
            StateTag::Loading => "loading",
            StateTag::Loaded => "loaded",
            StateTag::Empty => "empty",
            StateTag::Failed => "failed",
        };
        f.write_str(name)
    }
}

impl<T, E> UiState<T, E> {
    pub fn tag(&self) -> StateTag {
        match self {
            Self::Idle => StateTag::Idle,
            Self::Loading => StateTag::Loading,
            Self::Loaded(_) => StateTag::Loaded,
            Self::Empty => StateTag::Empty,
            Self::Failed(_) => StateTag::Failed,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Any state other than `Loading`.
    ///
    /// A settled state is what the runtime falls back to when the effect
    /// that put the screen into `Loading` is cancelled.
    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Loaded(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = UiState<Vec<u32>, String>;

    #[test]
    fn idle_is_default() {
        assert_eq!(State::default(), UiState::Idle);
    }

    #[test]
    fn tag_matches_variant() {
        assert_eq!(State::Idle.tag(), StateTag::Idle);
        assert_eq!(State::Loading.tag(), StateTag::Loading);
        assert_eq!(State::Loaded(vec![1]).tag(), StateTag::Loaded);
        assert_eq!(State::Empty.tag(), StateTag::Empty);
        assert_eq!(State::Failed("boom".into()).tag(), StateTag::Failed);
    }

    #[test]
    fn payload_and_error_are_exclusive() {
        let loaded = State::Loaded(vec![1, 2]);
        assert_eq!(loaded.payload(), Some(&vec![1, 2]));
        assert_eq!(loaded.error(), None);

        let failed = State::Failed("offline".into());
        assert_eq!(failed.payload(), None);
        assert_eq!(failed.error().map(String::as_str), Some("offline"));
    }

    #[test]
    fn only_loading_is_unsettled() {
        assert!(State::Idle.is_settled());
        assert!(!State::Loading.is_settled());
        assert!(State::Empty.is_settled());
        assert!(State::Failed("x".into()).is_settled());
    }

    #[test]
    fn tag_display_is_lowercase() {
        assert_eq!(StateTag::Loaded.to_string(), "loaded");
    }
}
