use serde::{Deserialize, Serialize};

use crate::navigation::EmptyPopPolicy;
use crate::presentation::PresentationPolicy;
use crate::supervisor::RunPolicy;

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub presentation: PresentationConfig,
    pub navigation: NavigationConfig,
    pub effects: EffectsConfig,
    pub diagnostics: DiagnosticsConfig,
    pub logging: LoggingConfig,
}

/// Modal arbitration settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// What happens when a modal is requested while another is showing.
    pub policy: PresentationPolicy,
}

/// Route stack settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Permit pushing a route equal to the current top.
    pub allow_adjacent_duplicates: bool,
    /// Handling of a pop while already at root.
    pub empty_pop: EmptyPopPolicy,
}

/// Effect supervision settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Policy for effects that do not choose one themselves.
    pub default_policy: RunPolicy,
}

/// How the runtime reacts to a transition that does not fit the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidTransitionPolicy {
    /// Abort with a panic. Default in debug builds.
    Panic,
    /// Log, record in diagnostics, and leave state untouched. Default in
    /// release builds.
    Log,
}

impl Default for InvalidTransitionPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            InvalidTransitionPolicy::Panic
        } else {
            InvalidTransitionPolicy::Log
        }
    }
}

/// Diagnostics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub invalid_transition: InvalidTransitionPolicy,
    /// Number of resolved errors kept per feature (default: 100).
    pub error_capacity: usize,
}

/// Logging settings used by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset (default: "info").
    pub filter: String,
}

fn default_error_capacity() -> usize {
    100
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            invalid_transition: InvalidTransitionPolicy::default(),
            error_capacity: default_error_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}
