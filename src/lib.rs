//! Reusable runtime for UI features.
//!
//! A [`FeatureModel`] owns one screen's [`UiState`], its modal
//! [`PresentationArbiter`], its [`RouteStack`] and a [`TaskSupervisor`] for
//! the async work its intents start. Views dispatch intents and observe
//! snapshots; they never mutate anything directly.

pub mod catalog;
pub mod config;
pub mod error;
pub mod feature;
pub mod logging;
pub mod mvi;
pub mod navigation;
pub mod observe;
pub mod presentation;
pub mod state;
pub mod supervisor;

pub use config::RuntimeConfig;
pub use error::{ErrorRegistry, RuntimeError};
pub use feature::{Ack, Effect, Feature, FeatureModel, Reaction, Snapshot};
pub use navigation::{DeepLink, RouteStack};
pub use presentation::{ModalState, PresentationArbiter};
pub use state::{Transition, UiState};
pub use supervisor::{EffectKey, RunPolicy, TaskSupervisor};
