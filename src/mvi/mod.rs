//! Model-View-Intent (MVI) architecture primitives.
//!
//! This module provides the base traits every feature is built from.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Feature ──→ Transition ──→ Reducer ──→ Snapshot ──→ View
//!    ↑                        ↑                                   │
//!    │                  Effect (async)                            │
//!    └────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **ViewState**: Immutable representation of renderable state
//! - **Intent**: User actions or system events
//! - **Reducer**: Pure, fallible function that applies a transition to state

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::ViewState;
