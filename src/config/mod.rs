//! Runtime configuration: modal, navigation, effect and diagnostics
//! policies, loaded from TOML.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{
    DiagnosticsConfig, EffectsConfig, InvalidTransitionPolicy, LoggingConfig, NavigationConfig,
    PresentationConfig, RuntimeConfig,
};
