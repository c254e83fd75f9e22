//! Long-lived action sources
//!
//! Subscriptions differ from one-shot tasks in how they end: a source runs
//! until its scope is torn down, and is expected to watch
//! [`TaskScope::cancelled`] so it can release what it holds (close a socket,
//! stop a watcher). [`Subscriptions::shutdown`] flips every flag and then
//! waits for the sources to return, so cleanup has finished by the time it
//! resolves.
//!
//! # Example
//!
//! ```ignore
//! let (action_tx, mut action_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut subs = Subscriptions::new(action_tx);
//!
//! subs.source("live", |scope| async move {
//!     let mut socket = connect().await?;
//!     loop {
//!         tokio::select! {
//!             _ = scope.cancelled() => break,
//!             frame = socket.next() => { scope.emit(Action::from(frame)); }
//!         }
//!     }
//!     socket.close().await;
//! });
//!
//! subs.shutdown().await;
//! ```

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::tasks::{TaskHandle, TaskKey, TaskScope};
use crate::Action;

/// Identifies a subscription for cancellation.
pub type SubKey = TaskKey;

struct Source {
    token: CancellationToken,
    join: JoinHandle<()>,
}

/// Manages subscriptions that keep emitting actions until torn down.
pub struct Subscriptions<A> {
    sources: HashMap<SubKey, Source>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> Subscriptions<A>
where
    A: Action,
{
    /// Create a new subscription manager sending actions into `action_tx`.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            sources: HashMap::new(),
            action_tx,
        }
    }

    /// Start a source. An existing source under the same key is cancelled.
    pub fn source<F, Fut>(&mut self, key: impl Into<SubKey>, source: F) -> TaskHandle
    where
        F: FnOnce(TaskScope<A>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let token = CancellationToken::new();
        let scope = TaskScope::new(token.clone(), self.action_tx.clone());
        let join = tokio::spawn(source(scope));

        tracing::debug!(subscription = %key.name(), "subscription started");
        self.sources.insert(
            key.clone(),
            Source {
                token: token.clone(),
                join,
            },
        );
        TaskHandle::new(key, token)
    }

    /// Cancel a subscription by key without waiting for it to wind down.
    pub fn cancel(&mut self, key: &SubKey) {
        if let Some(source) = self.sources.remove(key) {
            source.token.cancel();
        }
    }

    /// Cancel every subscription and wait until each source has returned.
    pub async fn shutdown(&mut self) {
        let sources: Vec<_> = self.sources.drain().collect();
        for (_, source) in &sources {
            source.token.cancel();
        }
        for (key, source) in sources {
            if let Err(err) = source.join.await {
                tracing::warn!(subscription = %key.name(), error = %err, "subscription ended abnormally");
            }
        }
    }

    /// Check if a subscription with the given key is active.
    pub fn is_active(&self, key: &SubKey) -> bool {
        self.sources
            .get(key)
            .is_some_and(|source| !source.join.is_finished())
    }

    /// Number of registered subscriptions.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if there are no registered subscriptions.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<A> Drop for Subscriptions<A> {
    fn drop(&mut self) {
        for (_, source) in self.sources.drain() {
            source.token.cancel();
        }
    }
}
