use crate::navigation::RouteChange;
use crate::presentation::{PresentationChange, PresentationId, PresentationKind};

use super::UiState;

/// A requested change to a feature's [`UiState`].
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange<T, E> {
    /// Back to `Idle`.
    Reset,
    Loading,
    Loaded(T),
    Empty,
    Failed(E),
    /// Return to a settled state after the load that left it was cancelled.
    Restore(UiState<T, E>),
}

impl<T, E> StateChange<T, E> {
    pub fn name(&self) -> &'static str {
        match self {
            StateChange::Reset => "reset",
            StateChange::Loading => "loading",
            StateChange::Loaded(_) => "loaded",
            StateChange::Empty => "empty",
            StateChange::Failed(_) => "failed",
            StateChange::Restore(_) => "restore",
        }
    }
}

/// The delta one intent or effect applies to a feature.
///
/// A transition may touch the screen state, the modal arbiter and the route
/// stack at once; the runtime applies all of it or none of it, and observers
/// see a single notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<T, E, R> {
    state: Vec<StateChange<T, E>>,
    presentation: Vec<PresentationChange>,
    route: Vec<RouteChange<R>>,
}

impl<T, E, R> Default for Transition<T, E, R> {
    fn default() -> Self {
        Self {
            state: Vec::new(),
            presentation: Vec::new(),
            route: Vec::new(),
        }
    }
}

impl<T, E, R> Transition<T, E, R> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn state(change: StateChange<T, E>) -> Self {
        Self::none().with_state(change)
    }

    pub fn loading() -> Self {
        Self::state(StateChange::Loading)
    }

    pub fn loaded(payload: T) -> Self {
        Self::state(StateChange::Loaded(payload))
    }

    pub fn empty() -> Self {
        Self::state(StateChange::Empty)
    }

    pub fn failed(error: E) -> Self {
        Self::state(StateChange::Failed(error))
    }

    pub fn reset() -> Self {
        Self::state(StateChange::Reset)
    }

    pub fn restore(settled: UiState<T, E>) -> Self {
        Self::state(StateChange::Restore(settled))
    }

    pub fn with_state(mut self, change: StateChange<T, E>) -> Self {
        self.state.push(change);
        self
    }

    pub fn present(mut self, kind: PresentationKind, id: impl Into<PresentationId>) -> Self {
        self.presentation.push(PresentationChange::Present {
            kind,
            id: id.into(),
        });
        self
    }

    pub fn dismiss(mut self) -> Self {
        self.presentation.push(PresentationChange::Dismiss);
        self
    }

    pub fn push(mut self, route: R) -> Self {
        self.route.push(RouteChange::Push(route));
        self
    }

    pub fn pop(mut self) -> Self {
        self.route.push(RouteChange::Pop);
        self
    }

    pub fn pop_to_root(mut self) -> Self {
        self.route.push(RouteChange::PopToRoot);
        self
    }

    pub fn replace(mut self, route: R) -> Self {
        self.route.push(RouteChange::Replace(route));
        self
    }

    /// Merge `other` into this transition, keeping the order of changes.
    pub fn and(mut self, other: Self) -> Self {
        self.state.extend(other.state);
        self.presentation.extend(other.presentation);
        self.route.extend(other.route);
        self
    }

    pub fn state_changes(&self) -> &[StateChange<T, E>] {
        &self.state
    }

    pub fn presentation_changes(&self) -> &[PresentationChange] {
        &self.presentation
    }

    pub fn route_changes(&self) -> &[RouteChange<R>] {
        &self.route
    }

    pub fn has_state_change(&self) -> bool {
        !self.state.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.presentation.is_empty() && self.route.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = Transition<u32, String, &'static str>;

    #[test]
    fn none_is_empty() {
        assert!(T::none().is_empty());
        assert!(!T::none().has_state_change());
    }

    #[test]
    fn builders_accumulate_in_order() {
        let transition = T::loaded(3)
            .dismiss()
            .present(PresentationKind::Alert, "saved")
            .push("detail")
            .pop();

        assert_eq!(transition.state_changes(), &[StateChange::Loaded(3)]);
        assert_eq!(
            transition.presentation_changes(),
            &[
                PresentationChange::Dismiss,
                PresentationChange::Present {
                    kind: PresentationKind::Alert,
                    id: "saved".into(),
                },
            ]
        );
        assert_eq!(
            transition.route_changes(),
            &[RouteChange::Push("detail"), RouteChange::Pop]
        );
    }

    #[test]
    fn and_merges_both_sides() {
        let merged = T::loading().and(T::none().push("a")).and(T::failed("x".into()));
        assert_eq!(merged.state_changes().len(), 2);
        assert_eq!(merged.route_changes().len(), 1);
    }

    #[test]
    fn change_names_are_stable() {
        assert_eq!(StateChange::<u32, String>::Reset.name(), "reset");
        assert_eq!(StateChange::<u32, String>::Restore(UiState::Idle).name(), "restore");
    }
}
