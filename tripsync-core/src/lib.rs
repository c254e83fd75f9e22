//! Core traits and types for tripsync
//!
//! A small Redux/Elm-style toolkit: state lives in a store, changes only
//! through a reducer, and async work reports back by sending actions over a
//! channel to the loop that owns the store.
//!
//! # Core Concepts
//!
//! - **Action**: Events that describe state changes
//! - **Store**: State container with reducer pattern and middleware hooks
//! - **EffectStore**: Store whose reducer also declares side effects
//! - **TaskManager**: One-shot async work with per-task cancellation flags
//! - **Subscriptions**: Long-lived action sources with graceful shutdown
//! - **Component**: Pure terminal views rendered from props
//!
//! # Async Pattern
//!
//! 1. Something starts work and dispatches an intent (`FetchStarted`)
//! 2. A task runs the I/O and emits the result (`FetchSucceeded`/`FetchFailed`)
//! 3. The owning loop receives the action and dispatches it to the store
//!
//! ```ignore
//! let (action_tx, mut action_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = TaskManager::new(action_tx);
//! let mut store = Store::new(State::default(), reducer);
//!
//! tasks.dispatch(Action::FetchStarted);
//! tasks.spawn("fetch", async move {
//!     match api.list().await {
//!         Ok(items) => Action::FetchSucceeded(items),
//!         Err(e) => Action::FetchFailed(e.to_string()),
//!     }
//! });
//!
//! while let Some(action) = action_rx.recv().await {
//!     store.dispatch(action);
//! }
//! ```

pub mod action;
pub mod bus;
pub mod component;
pub mod effect;
pub mod event;
pub mod store;
pub mod subscriptions;
pub mod tasks;
pub mod testing;

pub use action::Action;
pub use component::Component;

pub use bus::{process_raw_event, spawn_event_poller, RawEvent};
pub use event::EventKind;

pub use store::{LoggingMiddleware, Middleware, Reducer, Store, StoreWithMiddleware};

pub use effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};

pub use subscriptions::{SubKey, Subscriptions};
pub use tasks::{TaskHandle, TaskKey, TaskManager, TaskScope};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::Action;
    pub use crate::bus::{process_raw_event, spawn_event_poller, RawEvent};
    pub use crate::component::Component;
    pub use crate::effect::{DispatchResult, EffectStore, EffectStoreWithMiddleware};
    pub use crate::event::EventKind;
    pub use crate::store::{LoggingMiddleware, Middleware, Store, StoreWithMiddleware};
    pub use crate::subscriptions::{SubKey, Subscriptions};
    pub use crate::tasks::{TaskHandle, TaskKey, TaskManager, TaskScope};
}
