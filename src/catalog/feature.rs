use std::sync::Arc;

use crate::feature::{Effect, Feature, FeatureSnapshot, FeatureTransition, Reaction};
use crate::presentation::PresentationKind;
use crate::state::{Transition, UiState};
use crate::supervisor::RunPolicy;

use super::intent::CatalogIntent;
use super::route::CatalogRoute;
use super::service::{CatalogError, CatalogServices, Item, ItemForm, TrackEvent};

/// Resource names under the `catalog` feature.
pub const ITEMS: &str = "items";
pub const SAVE: &str = "save";
pub const TRACK: &str = "track";

/// Presentation ids.
pub const COMPOSE_SHEET: &str = "compose";
pub const FILTERS_SHEET: &str = "filters";
pub const INVALID_FORM_ALERT: &str = "invalid-form";
pub const SAVE_FAILED_ALERT: &str = "save-failed";

/// List screen with item details, a compose sheet and a filter sheet.
pub struct CatalogFeature {
    services: CatalogServices,
}

impl CatalogFeature {
    pub fn new(services: CatalogServices) -> Self {
        Self { services }
    }

    fn fetch(&self, policy: RunPolicy) -> Reaction<Self> {
        let source = Arc::clone(&self.services.source);
        let effect = Effect::<Self>::new(Self::key(ITEMS), move |_| async move {
            let items = source.fetch_items().await?;
            Ok(listing(items))
        })
        .policy(policy);

        Reaction::new(Transition::loading()).effect(effect)
    }

    fn submit(&self, form: ItemForm) -> Reaction<Self> {
        if !form.is_valid() {
            return Reaction::new(
                Transition::none()
                    .dismiss()
                    .present(PresentationKind::Alert, INVALID_FORM_ALERT),
            );
        }

        let store = Arc::clone(&self.services.store);
        let analytics = Arc::clone(&self.services.analytics);
        let effect = Effect::<Self>::new(Self::key(SAVE), move |token| async move {
            // A superseded save must not reach the store.
            if token.is_cancelled() {
                return Ok(Transition::none());
            }
            match store.save_item(form).await {
                Ok(item) => {
                    if let Err(error) = analytics.track(TrackEvent::ItemSaved { id: item.id }).await {
                        tracing::warn!(error = %error, "Failed to track save");
                    }
                    Ok(Transition::none().dismiss().push(CatalogRoute::Item(item.id)))
                }
                Err(error) => {
                    tracing::debug!(error = %error, "Save failed");
                    Ok(Transition::none()
                        .dismiss()
                        .present(PresentationKind::Alert, SAVE_FAILED_ALERT))
                }
            }
        })
        .policy(RunPolicy::RejectIfRunning);

        Reaction::none().effect(effect)
    }

    fn show_item(&self, id: u64) -> Reaction<Self> {
        let analytics = Arc::clone(&self.services.analytics);
        let effect = Effect::<Self>::new(Self::key(TRACK), move |_| async move {
            analytics.track(TrackEvent::ItemOpened { id }).await?;
            Ok(Transition::none())
        })
        .silent();

        Reaction::new(Transition::none().push(CatalogRoute::Item(id))).effect(effect)
    }
}

fn listing(items: Vec<Item>) -> FeatureTransition<CatalogFeature> {
    if items.is_empty() {
        Transition::empty()
    } else {
        Transition::loaded(items)
    }
}

impl Feature for CatalogFeature {
    type Payload = Vec<Item>;
    type Failure = CatalogError;
    type Route = CatalogRoute;
    type Intent = CatalogIntent;

    const NAME: &'static str = "catalog";

    fn handle(&self, intent: CatalogIntent, snapshot: &FeatureSnapshot<Self>) -> Reaction<Self> {
        match intent {
            CatalogIntent::Load => match snapshot.state {
                UiState::Loading | UiState::Loaded(_) => Reaction::none(),
                _ => self.fetch(RunPolicy::RejectIfRunning),
            },
            CatalogIntent::Refresh => self.fetch(RunPolicy::Supersede),
            CatalogIntent::CancelLoad => Reaction::none().cancel(Self::key(ITEMS)),
            CatalogIntent::Retry => match snapshot.state {
                UiState::Failed(_) => self.fetch(RunPolicy::RejectIfRunning),
                _ => Reaction::none(),
            },
            CatalogIntent::Compose => Reaction::new(
                Transition::none().present(PresentationKind::Sheet, COMPOSE_SHEET),
            ),
            CatalogIntent::Submit(form) => self.submit(form),
            CatalogIntent::ShowItem(id) => self.show_item(id),
            CatalogIntent::Back => Reaction::new(Transition::none().pop()),
            CatalogIntent::BackToRoot => Reaction::new(Transition::none().pop_to_root()),
            CatalogIntent::OpenFilters => Reaction::new(
                Transition::none().present(PresentationKind::Sheet, FILTERS_SHEET),
            ),
            CatalogIntent::DismissModal => Reaction::new(Transition::none().dismiss()),
        }
    }
}
