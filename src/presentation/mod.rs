//! Modal presentation: sheets, full-screen covers and alerts.
//!
//! A feature shows at most one modal at a time. The [`PresentationArbiter`]
//! is the single owner of that fact; everything else only asks it to present
//! or dismiss.

mod arbiter;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use arbiter::PresentationArbiter;

/// Kind of modal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentationKind {
    Sheet,
    FullScreen,
    Alert,
}

/// Identity of a presented surface, chosen by the feature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresentationId(String);

impl PresentationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PresentationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PresentationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PresentationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What is on screen above the feature's content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    None,
    Sheet(PresentationId),
    FullScreen(PresentationId),
    Alert(PresentationId),
}

impl ModalState {
    pub fn new(kind: PresentationKind, id: PresentationId) -> Self {
        match kind {
            PresentationKind::Sheet => Self::Sheet(id),
            PresentationKind::FullScreen => Self::FullScreen(id),
            PresentationKind::Alert => Self::Alert(id),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn kind(&self) -> Option<PresentationKind> {
        match self {
            Self::None => None,
            Self::Sheet(_) => Some(PresentationKind::Sheet),
            Self::FullScreen(_) => Some(PresentationKind::FullScreen),
            Self::Alert(_) => Some(PresentationKind::Alert),
        }
    }

    pub fn id(&self) -> Option<&PresentationId> {
        match self {
            Self::None => None,
            Self::Sheet(id) | Self::FullScreen(id) | Self::Alert(id) => Some(id),
        }
    }
}

impl fmt::Display for ModalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Sheet(id) => write!(f, "sheet({})", id),
            Self::FullScreen(id) => write!(f, "full_screen({})", id),
            Self::Alert(id) => write!(f, "alert({})", id),
        }
    }
}

/// Observable step taken by the arbiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationEvent {
    Presented(ModalState),
    Dismissed(ModalState),
    /// Request parked behind the active modal (queue policy only).
    Queued(ModalState),
}

/// What to do when a present request arrives while a modal is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationPolicy {
    /// Fail with [`PresentationError::Conflict`].
    #[default]
    Reject,
    /// Dismiss the active modal, then present the new one.
    Replace,
    /// Present the new one after the active modal is dismissed.
    Queue,
}

/// A presentation request carried by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationChange {
    Present {
        kind: PresentationKind,
        id: PresentationId,
    },
    Dismiss,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    #[error("Cannot present {requested} while {active} is active")]
    Conflict {
        active: ModalState,
        requested: ModalState,
    },
}
