//! Base trait for intents (user/system actions) in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (button taps, pull-to-refresh)
/// - Navigation requests
/// - Host events forwarded by the view layer
///
/// An intent carries only the data a feature needs to decide what to do.
/// It never holds a reference back to the view.
pub trait Intent: Send + 'static {}
