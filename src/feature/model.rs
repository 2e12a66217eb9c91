use std::collections::HashSet;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::{InvalidTransitionPolicy, RuntimeConfig};
use crate::error::{ErrorRegistry, RuntimeError};
use crate::mvi::Reducer;
use crate::navigation::{parse, DeepLink, EmptyPopPolicy, NavigationError, RouteStack};
use crate::observe::{ObserverRegistry, SubscriptionId};
use crate::presentation::{ModalState, PresentationArbiter, PresentationEvent};
use crate::state::{StateReducer, Transition, TransitionError, UiState};
use crate::supervisor::{
    Completion, CompletionReceiver, EffectKey, Outcome, SupervisorError, TaskSupervisor,
};

use super::{Effect, Feature, FeatureSnapshot, FeatureState, FeatureTransition, Reaction, Snapshot};

/// Acknowledgment returned by [`FeatureModel::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// The intent was handled; `revision` is the snapshot revision after
    /// its synchronous part was applied.
    Accepted { revision: u64 },
    /// The model was disposed; the intent was dropped.
    Disposed,
}

type FeatureCompletion<F> = Completion<FeatureTransition<F>, <F as Feature>::Failure>;
type FeatureReducer<F> =
    StateReducer<<F as Feature>::Payload, <F as Feature>::Failure, <F as Feature>::Route>;

/// Runtime for one feature instance.
///
/// Owns the screen state, the modal arbiter, the route stack and the task
/// supervisor. Whoever holds `&mut FeatureModel` is the feature's execution
/// context: every state change and every observer notification happens
/// there, including the ones produced by effect completions, which are
/// drained with [`process_completions`](Self::process_completions),
/// [`next_completion`](Self::next_completion) or [`settle`](Self::settle).
pub struct FeatureModel<F: Feature> {
    id: Uuid,
    feature: F,
    state: FeatureState<F>,
    /// Last non-loading state, target of `Restore` after a cancelled load.
    settled: FeatureState<F>,
    arbiter: PresentationArbiter,
    routes: RouteStack<F::Route>,
    events: Vec<PresentationEvent>,
    revision: u64,
    supervisor: TaskSupervisor<FeatureTransition<F>, F::Failure>,
    completions: CompletionReceiver<FeatureTransition<F>, F::Failure>,
    silent: HashSet<EffectKey>,
    observers: ObserverRegistry<FeatureSnapshot<F>>,
    watchers: Vec<mpsc::UnboundedSender<FeatureSnapshot<F>>>,
    errors: ErrorRegistry,
    config: RuntimeConfig,
    disposed: bool,
}

impl<F: Feature> FeatureModel<F> {
    /// Create a model whose effects run on the current tokio runtime.
    ///
    /// # Errors
    /// Returns [`RuntimeError::NoRuntime`] when called outside a runtime.
    pub fn new(feature: F, config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let runtime = Handle::try_current().map_err(|e| RuntimeError::NoRuntime(e.to_string()))?;
        Ok(Self::with_runtime(feature, config, runtime))
    }

    pub fn with_runtime(feature: F, config: &RuntimeConfig, runtime: Handle) -> Self {
        let (supervisor, completions) = TaskSupervisor::new(runtime);
        let id = Uuid::new_v4();
        tracing::debug!(feature = F::NAME, instance = %id, "Feature created");

        Self {
            id,
            feature,
            state: UiState::Idle,
            settled: UiState::Idle,
            arbiter: PresentationArbiter::new(config.presentation.policy),
            routes: RouteStack::new()
                .allowing_duplicates(config.navigation.allow_adjacent_duplicates),
            events: Vec::new(),
            revision: 0,
            supervisor,
            completions,
            silent: HashSet::new(),
            observers: ObserverRegistry::new(),
            watchers: Vec::new(),
            errors: ErrorRegistry::new(config.diagnostics.error_capacity),
            config: config.clone(),
            disposed: false,
        }
    }

    /// Start with `routes` already on the stack, e.g. resolved deep links.
    ///
    /// # Errors
    /// Fails on adjacent duplicates unless the config permits them.
    pub fn with_routes(
        mut self,
        routes: impl IntoIterator<Item = F::Route>,
    ) -> Result<Self, RuntimeError> {
        self.routes =
            RouteStack::seeded(routes, self.config.navigation.allow_adjacent_duplicates)?;
        Ok(self)
    }

    /// Unique id of this instance, used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn feature(&self) -> &F {
        &self.feature
    }

    /// Hand `intent` to the feature and apply its synchronous reaction.
    ///
    /// Returns immediately. Effects started here deliver their transitions
    /// through the completion queue.
    pub fn dispatch(&mut self, intent: F::Intent) -> Ack {
        if self.disposed {
            tracing::debug!(feature = F::NAME, intent = ?intent, "Intent dropped after dispose");
            return Ack::Disposed;
        }

        tracing::debug!(feature = F::NAME, intent = ?intent, "Dispatch");
        let snapshot = self.snapshot();
        let reaction = self.feature.handle(intent, &snapshot);
        self.react(reaction);

        Ack::Accepted {
            revision: self.revision,
        }
    }

    /// Resolve `url` and push the resulting route.
    ///
    /// # Errors
    /// Returns the parse error (also recorded in diagnostics) when the URL
    /// does not resolve to a route of this feature.
    pub fn open_url(&mut self, url: &str) -> Result<Ack, RuntimeError>
    where
        F::Route: DeepLink,
    {
        if self.disposed {
            return Ok(Ack::Disposed);
        }

        let route = match parse::<F::Route>(url) {
            Ok(route) => route,
            Err(error) => {
                let error = RuntimeError::from(error);
                tracing::warn!(feature = F::NAME, url, error = %error, "Deep link rejected");
                self.errors.record(error.clone());
                return Err(error);
            }
        };

        tracing::debug!(feature = F::NAME, url, route = ?route, "Opening deep link");
        self.commit(Transition::none().push(route));
        Ok(Ack::Accepted {
            revision: self.revision,
        })
    }

    /// Register `observer`. It is called with the current snapshot right
    /// away and again after every change.
    pub fn subscribe(
        &mut self,
        mut observer: impl FnMut(&FeatureSnapshot<F>) + Send + 'static,
    ) -> SubscriptionId {
        observer(&self.snapshot());
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Channel of snapshots for async views, starting with the current one.
    ///
    /// The channel closes when the model is disposed.
    pub fn watch(&mut self) -> mpsc::UnboundedReceiver<FeatureSnapshot<F>> {
        let (tx, rx) = mpsc::unbounded_channel();
        if !self.disposed && tx.send(self.snapshot()).is_ok() {
            self.watchers.push(tx);
        }
        rx
    }

    pub fn snapshot(&self) -> FeatureSnapshot<F> {
        Snapshot {
            state: self.state.clone(),
            modal: self.arbiter.current().clone(),
            routes: self.routes.entries().to_vec(),
            events: self.events.clone(),
            revision: self.revision,
        }
    }

    pub fn state(&self) -> &FeatureState<F> {
        &self.state
    }

    pub fn modal(&self) -> &ModalState {
        self.arbiter.current()
    }

    pub fn routes(&self) -> &[F::Route] {
        self.routes.entries()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply every completion already queued. Never waits.
    pub fn process_completions(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(completion) = self.completions.try_recv() {
            if !self.disposed {
                self.complete(completion);
            }
            handled += 1;
        }
        handled
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `false` without waiting when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.disposed || self.supervisor.is_idle() {
            return false;
        }

        match self.completions.recv().await {
            Some(completion) => {
                self.complete(completion);
                true
            }
            None => false,
        }
    }

    /// Apply completions until no effect is in flight.
    pub async fn settle(&mut self) -> usize {
        let mut handled = 0;
        while self.next_completion().await {
            handled += 1;
        }
        handled + self.process_completions()
    }

    /// Whether an effect is in flight under `resource` of this feature.
    pub fn is_running(&self, resource: &str) -> bool {
        self.supervisor.is_running(&F::key(resource))
    }

    pub fn in_flight(&self) -> usize {
        self.supervisor.in_flight()
    }

    /// Structural errors resolved by the runtime, oldest first.
    pub fn diagnostics(&self) -> &ErrorRegistry {
        &self.errors
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Cancel every effect and drop every observer.
    ///
    /// Returns `false` when the model was already disposed.
    pub fn dispose(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.disposed = true;

        let cancelled = self.supervisor.cancel_all();
        self.silent.clear();
        self.observers.clear();
        self.watchers.clear();

        tracing::info!(
            feature = F::NAME,
            instance = %self.id,
            cancelled,
            "Feature disposed"
        );
        true
    }

    fn react(&mut self, reaction: Reaction<F>) {
        let (mut transition, effects, cancels) = reaction.into_parts();

        let mut cancelled = false;
        for key in &cancels {
            if self.supervisor.cancel(key) {
                self.silent.remove(key);
                cancelled = true;
            }
        }
        if cancelled && !transition.has_state_change() {
            transition = transition.and(self.restore_transition());
        }

        if !self.commit(transition) {
            if !effects.is_empty() {
                tracing::debug!(
                    feature = F::NAME,
                    skipped = effects.len(),
                    "Effects dropped with rejected transition"
                );
            }
            return;
        }

        for effect in effects {
            self.start(effect);
        }
    }

    fn start(&mut self, effect: Effect<F>) {
        let Effect {
            key,
            policy,
            silent,
            work,
        } = effect;
        let policy = policy.unwrap_or(self.config.effects.default_policy);

        match self.supervisor.run(key.clone(), policy, work) {
            Ok(handle) => {
                if silent {
                    self.silent.insert(key);
                } else {
                    self.silent.remove(&key);
                }
                tracing::debug!(
                    feature = F::NAME,
                    key = %handle.key(),
                    task = %handle.id(),
                    policy = ?policy,
                    "Effect scheduled"
                );
            }
            Err(SupervisorError::DuplicateInFlight { key }) => {
                tracing::debug!(feature = F::NAME, key = %key, "Effect already in flight, skipped");
            }
        }
    }

    fn complete(&mut self, completion: FeatureCompletion<F>) {
        let key = completion.key.clone();
        let Some(outcome) = self.supervisor.accept(completion) else {
            return;
        };
        let silent = self.silent.remove(&key);

        let transition = match outcome {
            Outcome::Success(transition) => transition,
            Outcome::Failure(error) if silent => {
                tracing::warn!(feature = F::NAME, key = %key, error = ?error, "Silent effect failed");
                Transition::none()
            }
            Outcome::Failure(error) => {
                tracing::debug!(feature = F::NAME, key = %key, error = ?error, "Effect failed");
                Transition::failed(error)
            }
            Outcome::Cancelled => {
                tracing::debug!(feature = F::NAME, key = %key, "Effect cancelled");
                self.restore_transition()
            }
        };

        self.commit(transition);
    }

    /// Restore the last settled state if the screen is loading and nothing
    /// that could finish the load is still running.
    fn restore_transition(&self) -> FeatureTransition<F> {
        let load_pending = self
            .supervisor
            .running_keys()
            .iter()
            .any(|key| !self.silent.contains(key));

        if self.state.is_loading() && !load_pending {
            Transition::restore(self.settled.clone())
        } else {
            Transition::none()
        }
    }

    /// Apply `transition` to state, arbiter and routes as one change.
    ///
    /// Returns `false` when the transition was rejected; nothing changes and
    /// observers are not notified in that case.
    fn commit(&mut self, transition: FeatureTransition<F>) -> bool {
        if transition.is_empty() {
            return true;
        }

        let state = match <FeatureReducer<F> as Reducer>::reduce(&self.state, &transition) {
            Ok(state) => state,
            Err(error) => {
                self.invalid_transition(error);
                return false;
            }
        };

        // Recorded only if the transition is committed.
        let mut skipped = Vec::new();
        let mut arbiter = self.arbiter.clone();
        let mut events = Vec::new();
        for change in transition.presentation_changes() {
            match arbiter.apply(change) {
                Ok(emitted) => events.extend(emitted),
                Err(error) => {
                    skipped.push(RuntimeError::from(error));
                }
            }
        }

        let mut routes = self.routes.clone();
        for change in transition.route_changes() {
            match routes.apply(change) {
                Ok(()) => {}
                Err(NavigationError::EmptyStack)
                    if self.config.navigation.empty_pop == EmptyPopPolicy::Ignore =>
                {
                    tracing::debug!(feature = F::NAME, "Pop at root ignored");
                }
                Err(error @ NavigationError::EmptyStack) => {
                    tracing::warn!(feature = F::NAME, error = %error, "Transition rejected");
                    self.errors.record(error.into());
                    return false;
                }
                Err(error) => skipped.push(RuntimeError::from(error)),
            }
        }

        for error in skipped {
            tracing::warn!(feature = F::NAME, error = %error, "Change skipped");
            self.errors.record(error);
        }

        let changed = state != self.state
            || arbiter != self.arbiter
            || routes != self.routes
            || !events.is_empty();
        if !changed {
            return true;
        }

        if !state.is_loading() {
            self.settled = state.clone();
        }
        self.state = state;
        self.arbiter = arbiter;
        self.routes = routes;
        self.events = events;
        self.revision += 1;

        tracing::trace!(
            feature = F::NAME,
            revision = self.revision,
            state = %self.state.tag(),
            modal = %self.arbiter.current(),
            depth = self.routes.len(),
            "Committed"
        );
        self.publish();
        true
    }

    fn invalid_transition(&mut self, error: TransitionError) {
        let error = RuntimeError::from(error);
        match self.config.diagnostics.invalid_transition {
            InvalidTransitionPolicy::Panic => {
                panic!("{} (feature '{}', state {})", error, F::NAME, self.state.tag());
            }
            InvalidTransitionPolicy::Log => {
                tracing::error!(
                    feature = F::NAME,
                    state = %self.state.tag(),
                    error = %error,
                    "Invalid transition rejected"
                );
                self.errors.record(error);
            }
        }
    }

    fn publish(&mut self) {
        let snapshot = self.snapshot();
        self.observers.notify(&snapshot);
        self.watchers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

impl<F: Feature> Drop for FeatureModel<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}
