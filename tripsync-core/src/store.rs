//! Reducer-driven state container
//!
//! All mutation goes through [`Store::dispatch`]; the reducer reports
//! whether anything changed so callers know when to redraw or notify.
//! [`StoreWithMiddleware`] adds hooks around each dispatch, which is where
//! action logging lives.

use crate::Action;
use std::marker::PhantomData;

/// Applies one action to the state; `true` means the state changed.
pub type Reducer<S, A> = fn(&mut S, A) -> bool;

/// Owns a state value and the reducer allowed to change it.
///
/// ```ignore
/// fn reducer(state: &mut Inbox, action: InboxAction) -> bool {
///     match action {
///         InboxAction::Received(msg) => {
///             state.messages.insert(0, msg);
///             true
///         }
///         InboxAction::Dismissed(id) => {
///             let before = state.messages.len();
///             state.messages.retain(|m| m.id != id);
///             state.messages.len() != before
///         }
///     }
/// }
///
/// let mut store = Store::new(Inbox::default(), reducer);
/// if store.dispatch(InboxAction::Dismissed(3)) {
///     redraw(store.state());
/// }
/// ```
pub struct Store<S, A: Action> {
    state: S,
    reducer: Reducer<S, A>,
    _marker: PhantomData<A>,
}

impl<S, A: Action> Store<S, A> {
    pub fn new(state: S, reducer: Reducer<S, A>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Run the reducer; returns whether the state changed.
    pub fn dispatch(&mut self, action: A) -> bool {
        (self.reducer)(&mut self.state, action)
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

/// A [`Store`] whose dispatches pass through a [`Middleware`].
pub struct StoreWithMiddleware<S, A: Action, M: Middleware<A>> {
    store: Store<S, A>,
    middleware: M,
}

impl<S, A: Action, M: Middleware<A>> StoreWithMiddleware<S, A, M> {
    pub fn new(state: S, reducer: Reducer<S, A>, middleware: M) -> Self {
        Self {
            store: Store::new(state, reducer),
            middleware,
        }
    }

    /// `before` sees the action, the reducer consumes a clone, `after`
    /// sees it again together with the change flag.
    pub fn dispatch(&mut self, action: A) -> bool {
        self.middleware.before(&action);
        let changed = self.store.dispatch(action.clone());
        self.middleware.after(&action, changed);
        changed
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn middleware(&self) -> &M {
        &self.middleware
    }
}

/// Hooks run around every dispatch.
pub trait Middleware<A: Action> {
    fn before(&mut self, action: &A);

    fn after(&mut self, action: &A, state_changed: bool);
}

/// Logs every dispatched action through `tracing`.
///
/// Each action is logged once, after the reducer ran, with its
/// [`Action::detail`] when it has one. Names passed to
/// [`LoggingMiddleware::quiet`] are logged at trace level instead of debug,
/// for chatty actions such as keystrokes.
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    quiet: Vec<&'static str>,
    dispatched: u64,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demote these action names to trace level.
    pub fn quiet(mut self, names: &[&'static str]) -> Self {
        self.quiet.extend_from_slice(names);
        self
    }

    pub fn is_quiet(&self, name: &str) -> bool {
        self.quiet.iter().any(|quiet| *quiet == name)
    }

    /// Number of actions seen so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        self.dispatched += 1;
        tracing::trace!(action = %action.name(), seq = self.dispatched, "dispatching");
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        let name = action.name();
        let detail = action.detail().unwrap_or_default();
        if self.is_quiet(name) {
            tracing::trace!(action = %name, %detail, state_changed, "action applied");
        } else {
            tracing::debug!(
                action = %name,
                %detail,
                state_changed,
                seq = self.dispatched,
                "action applied"
            );
        }
    }
}
