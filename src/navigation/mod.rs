//! Typed navigation path and deep-link resolution.

mod deeplink;
mod stack;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use deeplink::{parse, DeepLink, LinkTarget, ParseError};
pub use stack::RouteStack;

/// A destination a feature can navigate to.
pub trait Route: Clone + PartialEq + fmt::Debug + Send + 'static {}

impl<T> Route for T where T: Clone + PartialEq + fmt::Debug + Send + 'static {}

/// A navigation request carried by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteChange<R> {
    Push(R),
    Pop,
    PopToRoot,
    Replace(R),
}

/// How the runtime treats a pop when already at the root screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPopPolicy {
    /// Drop the pop and keep the rest of the transition.
    #[default]
    Ignore,
    /// Reject the whole transition and record the error.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("Cannot pop: route stack is already at root")]
    EmptyStack,

    #[error("Route {route} is already on top of the stack")]
    DuplicateRoute { route: String },
}
