mod common;

use common::direct::{direct_model, Apply, Page, Step};
use common::record;
use feature_runtime::presentation::{
    ModalState, PresentationEvent, PresentationKind, PresentationPolicy,
};
use feature_runtime::{RuntimeConfig, RuntimeError, UiState};

fn config(policy: PresentationPolicy) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.presentation.policy = policy;
    config
}

fn sheet(id: &str) -> ModalState {
    ModalState::Sheet(id.into())
}

fn alert(id: &str) -> ModalState {
    ModalState::Alert(id.into())
}

/// Test that a second present without override is rejected and the first modal stays.
#[tokio::test]
async fn test_conflict_keeps_first_modal() {
    let mut model = direct_model(&config(PresentationPolicy::Reject));

    model.dispatch(Apply(Step::none().present(PresentationKind::Sheet, "A")));
    model.dispatch(Apply(Step::none().present(PresentationKind::Alert, "B")));

    assert_eq!(model.modal(), &sheet("A"));
    let last = model.diagnostics().last().cloned().expect("conflict recorded");
    assert_eq!(last.kind(), "presentation_conflict");
    assert!(matches!(last, RuntimeError::Presentation(_)));
}

/// Test that a conflicting present is skipped while the rest of the transition applies.
#[tokio::test]
async fn test_conflict_skips_only_the_present() {
    let mut model = direct_model(&config(PresentationPolicy::Reject));
    model.dispatch(Apply(Step::none().present(PresentationKind::Sheet, "A")));

    model.dispatch(Apply(
        Step::loading()
            .present(PresentationKind::FullScreen, "B")
            .push(Page::Settings),
    ));

    assert_eq!(model.state(), &UiState::Loading);
    assert_eq!(model.modal(), &sheet("A"));
    assert_eq!(model.routes(), &[Page::Settings]);
    assert_eq!(model.diagnostics().len(), 1);
}

/// Test that the replace policy yields dismiss-then-present.
#[tokio::test]
async fn test_replace_policy_dismisses_then_presents() {
    let mut model = direct_model(&config(PresentationPolicy::Replace));
    let recorded = record(&mut model);

    model.dispatch(Apply(Step::none().present(PresentationKind::Sheet, "A")));
    model.dispatch(Apply(Step::none().present(PresentationKind::Alert, "B")));

    assert_eq!(model.modal(), &alert("B"));
    let last = recorded.lock().last().cloned().expect("snapshot");
    assert_eq!(
        last.events,
        vec![
            PresentationEvent::Dismissed(sheet("A")),
            PresentationEvent::Presented(alert("B")),
        ]
    );
    assert!(model.diagnostics().is_empty());
}

/// Test that the queue policy parks the request until the active modal is dismissed.
#[tokio::test]
async fn test_queue_policy_presents_after_dismiss() {
    let mut model = direct_model(&config(PresentationPolicy::Queue));
    let recorded = record(&mut model);

    model.dispatch(Apply(Step::none().present(PresentationKind::Sheet, "A")));
    model.dispatch(Apply(Step::none().present(PresentationKind::Alert, "B")));
    assert_eq!(model.modal(), &sheet("A"));
    assert_eq!(
        recorded.lock().last().map(|s| s.events.clone()),
        Some(vec![PresentationEvent::Queued(alert("B"))])
    );

    model.dispatch(Apply(Step::none().dismiss()));
    assert_eq!(model.modal(), &alert("B"));
    assert_eq!(
        recorded.lock().last().map(|s| s.events.clone()),
        Some(vec![
            PresentationEvent::Dismissed(sheet("A")),
            PresentationEvent::Presented(alert("B")),
        ])
    );

    model.dispatch(Apply(Step::none().dismiss()));
    assert!(model.modal().is_none());
}

/// Test that presenting the active modal again changes nothing.
#[tokio::test]
async fn test_present_same_modal_is_idempotent() {
    let mut model = direct_model(&config(PresentationPolicy::Reject));
    let recorded = record(&mut model);

    model.dispatch(Apply(Step::none().present(PresentationKind::Sheet, "A")));
    model.dispatch(Apply(Step::none().present(PresentationKind::Sheet, "A")));

    assert_eq!(recorded.lock().len(), 2);
    assert!(model.diagnostics().is_empty());
}

/// Test that state, modal and route changes in one transition notify once.
#[tokio::test]
async fn test_composite_transition_notifies_once() {
    let mut model = direct_model(&RuntimeConfig::default());
    let recorded = record(&mut model);

    model.dispatch(Apply(
        Step::loading()
            .present(PresentationKind::Sheet, "A")
            .push(Page::Detail(1)),
    ));

    let snapshots = recorded.lock();
    assert_eq!(snapshots.len(), 2);
    let last = &snapshots[1];
    assert_eq!(last.state, UiState::Loading);
    assert_eq!(last.modal, sheet("A"));
    assert_eq!(last.routes, vec![Page::Detail(1)]);
    assert_eq!(last.revision, 1);
}
