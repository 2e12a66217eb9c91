use std::collections::VecDeque;

use super::{
    ModalState, PresentationChange, PresentationError, PresentationEvent, PresentationId,
    PresentationKind, PresentationPolicy,
};

/// Single owner of the feature's modal state.
///
/// Every change returns the events it produced, in order, so observers can
/// see a replace as a dismiss followed by a present.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationArbiter {
    current: ModalState,
    policy: PresentationPolicy,
    queue: VecDeque<ModalState>,
}

impl PresentationArbiter {
    pub fn new(policy: PresentationPolicy) -> Self {
        Self {
            current: ModalState::None,
            policy,
            queue: VecDeque::new(),
        }
    }

    pub fn current(&self) -> &ModalState {
        &self.current
    }

    pub fn policy(&self) -> PresentationPolicy {
        self.policy
    }

    /// Number of requests waiting behind the active modal.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Present `kind(id)`.
    ///
    /// Presenting the modal that is already active is a no-op.
    ///
    /// # Errors
    /// Returns [`PresentationError::Conflict`] when another modal is active
    /// and the policy is [`PresentationPolicy::Reject`]. State is unchanged
    /// on error.
    pub fn present(
        &mut self,
        kind: PresentationKind,
        id: PresentationId,
    ) -> Result<Vec<PresentationEvent>, PresentationError> {
        let requested = ModalState::new(kind, id);

        if self.current.is_none() {
            self.current = requested.clone();
            return Ok(vec![PresentationEvent::Presented(requested)]);
        }

        if self.current == requested {
            return Ok(Vec::new());
        }

        match self.policy {
            PresentationPolicy::Reject => Err(PresentationError::Conflict {
                active: self.current.clone(),
                requested,
            }),
            PresentationPolicy::Replace => {
                let prior = std::mem::replace(&mut self.current, requested.clone());
                Ok(vec![
                    PresentationEvent::Dismissed(prior),
                    PresentationEvent::Presented(requested),
                ])
            }
            PresentationPolicy::Queue => {
                if self.queue.contains(&requested) {
                    return Ok(Vec::new());
                }
                self.queue.push_back(requested.clone());
                Ok(vec![PresentationEvent::Queued(requested)])
            }
        }
    }

    /// Dismiss the active modal, then promote the next queued request.
    ///
    /// No-op when nothing is presented.
    pub fn dismiss(&mut self) -> Vec<PresentationEvent> {
        if self.current.is_none() {
            return Vec::new();
        }

        let prior = std::mem::take(&mut self.current);
        let mut events = vec![PresentationEvent::Dismissed(prior)];

        if let Some(next) = self.queue.pop_front() {
            self.current = next.clone();
            events.push(PresentationEvent::Presented(next));
        }

        events
    }

    pub fn apply(
        &mut self,
        change: &PresentationChange,
    ) -> Result<Vec<PresentationEvent>, PresentationError> {
        match change {
            PresentationChange::Present { kind, id } => self.present(*kind, id.clone()),
            PresentationChange::Dismiss => Ok(self.dismiss()),
        }
    }
}

impl Default for PresentationArbiter {
    fn default() -> Self {
        Self::new(PresentationPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(id: &str) -> ModalState {
        ModalState::Sheet(id.into())
    }

    fn alert(id: &str) -> ModalState {
        ModalState::Alert(id.into())
    }

    #[test]
    fn starts_with_nothing_presented() {
        let arbiter = PresentationArbiter::default();
        assert_eq!(arbiter.current(), &ModalState::None);
        assert_eq!(arbiter.policy(), PresentationPolicy::Reject);
    }

    #[test]
    fn present_from_none_activates() {
        let mut arbiter = PresentationArbiter::default();
        let events = arbiter
            .present(PresentationKind::Sheet, "A".into())
            .expect("present");
        assert_eq!(arbiter.current(), &sheet("A"));
        assert_eq!(events, vec![PresentationEvent::Presented(sheet("A"))]);
    }

    #[test]
    fn second_present_conflicts_under_reject() {
        let mut arbiter = PresentationArbiter::new(PresentationPolicy::Reject);
        arbiter
            .present(PresentationKind::Sheet, "A".into())
            .expect("present");

        let err = arbiter
            .present(PresentationKind::Alert, "B".into())
            .unwrap_err();

        assert_eq!(
            err,
            PresentationError::Conflict {
                active: sheet("A"),
                requested: alert("B"),
            }
        );
        assert_eq!(arbiter.current(), &sheet("A"));
    }

    #[test]
    fn replace_emits_dismiss_then_present() {
        let mut arbiter = PresentationArbiter::new(PresentationPolicy::Replace);
        arbiter
            .present(PresentationKind::Sheet, "A".into())
            .expect("present");

        let events = arbiter
            .present(PresentationKind::Alert, "B".into())
            .expect("replace");

        assert_eq!(
            events,
            vec![
                PresentationEvent::Dismissed(sheet("A")),
                PresentationEvent::Presented(alert("B")),
            ]
        );
        assert_eq!(arbiter.current(), &alert("B"));
    }

    #[test]
    fn queue_promotes_on_dismiss() {
        let mut arbiter = PresentationArbiter::new(PresentationPolicy::Queue);
        arbiter
            .present(PresentationKind::Sheet, "A".into())
            .expect("present");
        let events = arbiter
            .present(PresentationKind::Alert, "B".into())
            .expect("queue");
        assert_eq!(events, vec![PresentationEvent::Queued(alert("B"))]);
        assert_eq!(arbiter.current(), &sheet("A"));
        assert_eq!(arbiter.queued(), 1);

        let events = arbiter.dismiss();
        assert_eq!(
            events,
            vec![
                PresentationEvent::Dismissed(sheet("A")),
                PresentationEvent::Presented(alert("B")),
            ]
        );
        assert_eq!(arbiter.queued(), 0);
    }

    #[test]
    fn queue_ignores_repeated_request() {
        let mut arbiter = PresentationArbiter::new(PresentationPolicy::Queue);
        arbiter
            .present(PresentationKind::Sheet, "A".into())
            .expect("present");
        arbiter
            .present(PresentationKind::Alert, "B".into())
            .expect("queue");
        let events = arbiter
            .present(PresentationKind::Alert, "B".into())
            .expect("queue again");
        assert!(events.is_empty());
        assert_eq!(arbiter.queued(), 1);
    }

    #[test]
    fn presenting_active_modal_is_noop() {
        let mut arbiter = PresentationArbiter::default();
        arbiter
            .present(PresentationKind::Sheet, "A".into())
            .expect("present");
        let events = arbiter
            .present(PresentationKind::Sheet, "A".into())
            .expect("same modal");
        assert!(events.is_empty());
    }

    #[test]
    fn dismiss_on_none_is_noop() {
        let mut arbiter = PresentationArbiter::default();
        assert!(arbiter.dismiss().is_empty());
        assert_eq!(arbiter.current(), &ModalState::None);
    }

    #[test]
    fn dismiss_returns_to_none() {
        let mut arbiter = PresentationArbiter::default();
        arbiter
            .present(PresentationKind::FullScreen, "intro".into())
            .expect("present");
        let events = arbiter.dismiss();
        assert_eq!(
            events,
            vec![PresentationEvent::Dismissed(ModalState::FullScreen(
                "intro".into()
            ))]
        );
        assert!(arbiter.current().is_none());
    }

    #[test]
    fn apply_routes_changes() {
        let mut arbiter = PresentationArbiter::default();
        arbiter
            .apply(&PresentationChange::Present {
                kind: PresentationKind::Alert,
                id: "saved".into(),
            })
            .expect("present");
        assert_eq!(arbiter.current(), &alert("saved"));
        arbiter
            .apply(&PresentationChange::Dismiss)
            .expect("dismiss");
        assert!(arbiter.current().is_none());
    }

    #[test]
    fn conflict_message_names_both_modals() {
        let err = PresentationError::Conflict {
            active: sheet("A"),
            requested: alert("B"),
        };
        assert_eq!(
            err.to_string(),
            "Cannot present alert(B) while sheet(A) is active"
        );
    }
}
