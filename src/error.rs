//! Runtime-level error taxonomy and the diagnostics registry.
//!
//! Structural errors (invalid transitions, presentation conflicts, pops at
//! root) are resolved inside the runtime. They never reach the view; they
//! are logged and kept in an [`ErrorRegistry`] for inspection.

use std::collections::VecDeque;
use std::time::SystemTime;

use thiserror::Error;

use crate::navigation::{NavigationError, ParseError};
use crate::presentation::PresentationError;
use crate::state::TransitionError;
use crate::supervisor::SupervisorError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error(transparent)]
    Presentation(#[from] PresentationError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("Deep link rejected: {0}")]
    DeepLink(#[from] ParseError),

    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),
}

impl RuntimeError {
    /// Stable classifier for logs and diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::InvalidTransition(_) => "invalid_transition",
            RuntimeError::Supervisor(SupervisorError::DuplicateInFlight { .. }) => {
                "duplicate_in_flight"
            }
            RuntimeError::Presentation(PresentationError::Conflict { .. }) => {
                "presentation_conflict"
            }
            RuntimeError::Navigation(NavigationError::EmptyStack) => "empty_stack",
            RuntimeError::Navigation(NavigationError::DuplicateRoute { .. }) => "duplicate_route",
            RuntimeError::DeepLink(_) => "deep_link",
            RuntimeError::NoRuntime(_) => "no_runtime",
        }
    }
}

/// A structural error the runtime resolved on its own.
#[derive(Debug, Clone)]
pub struct RecordedError {
    pub at: SystemTime,
    pub error: RuntimeError,
}

/// Bounded ring of recently resolved errors; the oldest entry is evicted
/// first.
#[derive(Debug, Clone)]
pub struct ErrorRegistry {
    entries: VecDeque<RecordedError>,
    capacity: usize,
}

impl ErrorRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, error: RuntimeError) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(RecordedError {
            at: SystemTime::now(),
            error,
        });
    }

    pub fn entries(&self) -> impl Iterator<Item = &RecordedError> {
        self.entries.iter()
    }

    /// Errors only, oldest first.
    pub fn errors(&self) -> Vec<RuntimeError> {
        self.entries.iter().map(|entry| entry.error.clone()).collect()
    }

    pub fn last(&self) -> Option<&RuntimeError> {
        self.entries.back().map(|entry| &entry.error)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
