//! Feature whose intents are transitions, for driving the runtime directly.

use feature_runtime::mvi::Intent;
use feature_runtime::navigation::{DeepLink, LinkTarget, ParseError};
use feature_runtime::{Effect, Feature, FeatureModel, Reaction, RuntimeConfig, Transition};
use tokio::sync::oneshot;

use feature_runtime::feature::FeatureSnapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Detail(u32),
    Settings,
}

impl DeepLink for Page {
    const SCHEME: &'static str = "app";

    fn from_target(target: &LinkTarget) -> Result<Self, ParseError> {
        match target.segments().as_slice() {
            ["detail", id] => id.parse().map(Page::Detail).map_err(|_| {
                ParseError::InvalidParameter {
                    name: "id".to_string(),
                    value: id.to_string(),
                }
            }),
            ["settings"] => Ok(Page::Settings),
            _ => Err(target.unknown()),
        }
    }
}

pub type Step = Transition<String, String, Page>;

#[derive(Debug)]
pub struct Apply(pub Step);

impl Intent for Apply {}

pub struct Direct;

impl Feature for Direct {
    type Payload = String;
    type Failure = String;
    type Route = Page;
    type Intent = Apply;

    const NAME: &'static str = "direct";

    fn handle(&self, intent: Apply, _snapshot: &FeatureSnapshot<Self>) -> Reaction<Self> {
        Reaction::new(intent.0)
    }
}

pub fn direct_model(config: &RuntimeConfig) -> FeatureModel<Direct> {
    FeatureModel::new(Direct, config).expect("Failed to create model")
}

/// Intent for [`Jobs`]: apply a step now, or run an effect that resolves
/// to `result` once its gate is released.
#[derive(Debug)]
pub enum Job {
    Now(Step),
    Later {
        resource: &'static str,
        gate: oneshot::Receiver<()>,
        result: Result<Step, String>,
    },
}

impl Intent for Job {}

/// Gated effect job plus the sender that releases it.
pub fn later(
    resource: &'static str,
    result: Result<Step, String>,
) -> (Job, oneshot::Sender<()>) {
    let (tx, rx) = oneshot::channel();
    let job = Job::Later {
        resource,
        gate: rx,
        result,
    };
    (job, tx)
}

pub struct Jobs;

impl Feature for Jobs {
    type Payload = String;
    type Failure = String;
    type Route = Page;
    type Intent = Job;

    const NAME: &'static str = "jobs";

    fn handle(&self, intent: Job, _snapshot: &FeatureSnapshot<Self>) -> Reaction<Self> {
        match intent {
            Job::Now(step) => Reaction::new(step),
            Job::Later {
                resource,
                gate,
                result,
            } => Reaction::none().effect(Effect::<Self>::new(
                Self::key(resource),
                move |_| async move {
                    let _ = gate.await;
                    result
                },
            )),
        }
    }
}

pub fn jobs_model(config: &RuntimeConfig) -> FeatureModel<Jobs> {
    FeatureModel::new(Jobs, config).expect("Failed to create model")
}
