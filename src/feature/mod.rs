//! Features: the intent handlers a [`FeatureModel`] drives.
//!
//! A feature is a pure decision function. Given an intent and the current
//! [`Snapshot`], it returns a [`Reaction`]: the transition to apply now, the
//! effects to start, and the effect keys to cancel. It never mutates state
//! itself and never looks services up; services are fields of the feature
//! value, injected when it is built.

mod model;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::mvi::Intent;
use crate::navigation::Route;
use crate::presentation::{ModalState, PresentationEvent};
use crate::state::{Payload, Transition, UiState};
use crate::supervisor::{CancelToken, EffectKey, RunPolicy};

pub use model::{Ack, FeatureModel};

/// Intent handling for one screen.
pub trait Feature: Sized + Send + 'static {
    /// Content shown when loaded.
    type Payload: Payload;
    /// Typed domain failure, rendered as `UiState::Failed`.
    type Failure: Payload;
    /// Destinations this feature can push.
    type Route: Route;
    type Intent: Intent + fmt::Debug;

    /// Feature name, used as the first half of every [`EffectKey`].
    const NAME: &'static str;

    fn handle(&self, intent: Self::Intent, snapshot: &FeatureSnapshot<Self>) -> Reaction<Self>;

    /// Effect key for `resource` under this feature.
    fn key(resource: impl Into<String>) -> EffectKey {
        EffectKey::new(Self::NAME, resource)
    }
}

pub type FeatureState<F> = UiState<<F as Feature>::Payload, <F as Feature>::Failure>;

pub type FeatureTransition<F> =
    Transition<<F as Feature>::Payload, <F as Feature>::Failure, <F as Feature>::Route>;

pub type FeatureSnapshot<F> =
    Snapshot<<F as Feature>::Payload, <F as Feature>::Failure, <F as Feature>::Route>;

/// What observers receive after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T, E, R> {
    pub state: UiState<T, E>,
    pub modal: ModalState,
    /// Routes above the root screen, bottom first.
    pub routes: Vec<R>,
    /// Presentation events produced by the change that led here.
    pub events: Vec<PresentationEvent>,
    /// Incremented once per applied change.
    pub revision: u64,
}

impl<T, E, R> Snapshot<T, E, R> {
    pub fn top_route(&self) -> Option<&R> {
        self.routes.last()
    }
}

/// Boxed body of an effect.
pub type EffectFuture<F> = Pin<
    Box<dyn Future<Output = Result<FeatureTransition<F>, <F as Feature>::Failure>> + Send>,
>;

type EffectWork<F> = Box<dyn FnOnce(CancelToken) -> EffectFuture<F> + Send>;

/// Asynchronous work started on behalf of an intent.
///
/// On success the returned transition is applied. On failure the runtime
/// applies `Failed(error)`, unless the effect is [`silent`](Effect::silent),
/// in which case the failure is only logged. Cancelled effects put a
/// loading screen back to the last settled state.
pub struct Effect<F: Feature> {
    key: EffectKey,
    policy: Option<RunPolicy>,
    silent: bool,
    work: EffectWork<F>,
}

impl<F: Feature> Effect<F> {
    pub fn new<W, Fut>(key: EffectKey, work: W) -> Self
    where
        W: FnOnce(CancelToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<FeatureTransition<F>, F::Failure>> + Send + 'static,
    {
        Self {
            key,
            policy: None,
            silent: false,
            work: Box::new(move |token: CancelToken| -> EffectFuture<F> {
                Box::pin(work(token))
            }),
        }
    }

    /// Override the configured default run policy.
    pub fn policy(mut self, policy: RunPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Log failures instead of surfacing them as `Failed`.
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    pub fn key(&self) -> &EffectKey {
        &self.key
    }

    pub fn run_policy(&self) -> Option<RunPolicy> {
        self.policy
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

impl<F: Feature> fmt::Debug for Effect<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("key", &self.key)
            .field("policy", &self.policy)
            .field("silent", &self.silent)
            .finish_non_exhaustive()
    }
}

/// A feature's answer to one intent.
pub struct Reaction<F: Feature> {
    transition: FeatureTransition<F>,
    effects: Vec<Effect<F>>,
    cancels: Vec<EffectKey>,
}

impl<F: Feature> Reaction<F> {
    /// Ignore the intent.
    pub fn none() -> Self {
        Self::new(Transition::none())
    }

    pub fn new(transition: FeatureTransition<F>) -> Self {
        Self {
            transition,
            effects: Vec::new(),
            cancels: Vec::new(),
        }
    }

    pub fn effect(mut self, effect: Effect<F>) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn cancel(mut self, key: EffectKey) -> Self {
        self.cancels.push(key);
        self
    }

    pub fn transition(&self) -> &FeatureTransition<F> {
        &self.transition
    }

    pub fn effects(&self) -> &[Effect<F>] {
        &self.effects
    }

    pub fn cancels(&self) -> &[EffectKey] {
        &self.cancels
    }

    /// True when the reaction changes nothing and starts nothing.
    pub fn is_noop(&self) -> bool {
        self.transition.is_empty() && self.effects.is_empty() && self.cancels.is_empty()
    }

    fn into_parts(self) -> (FeatureTransition<F>, Vec<Effect<F>>, Vec<EffectKey>) {
        (self.transition, self.effects, self.cancels)
    }
}

impl<F: Feature> fmt::Debug for Reaction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reaction")
            .field("transition", &self.transition)
            .field("effects", &self.effects)
            .field("cancels", &self.cancels)
            .finish()
    }
}
