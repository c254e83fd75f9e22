//! Action trait for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to a store
///
/// Actions represent things that happened and the state changes they imply.
/// They should be:
/// - Clone: Actions may be logged or forwarded to several stores
/// - Debug: For debugging and logging
/// - Send + 'static: Async tasks send them back over channels
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;

    /// Short payload summary for logs (an id, a count, an error message).
    ///
    /// Payloads can be large, so the default logs none.
    fn detail(&self) -> Option<String> {
        None
    }
}
