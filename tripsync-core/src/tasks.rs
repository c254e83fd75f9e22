//! Task manager for one-shot async operations
//!
//! Every spawned task gets its own cancellation flag. Cancelling a task
//! flips the flag: the task keeps running to completion (an in-flight
//! request is not interrupted) but anything it tries to emit afterwards
//! is discarded.
//!
//! # Example
//!
//! ```ignore
//! use tripsync_core::tasks::{TaskKey, TaskManager};
//!
//! let (action_tx, mut action_rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut tasks = TaskManager::new(action_tx);
//!
//! // Result action is emitted only if the task was not cancelled meanwhile
//! tasks.spawn("fetch", async {
//!     match api.list().await {
//!         Ok(items) => Action::FetchSucceeded(items),
//!         Err(e) => Action::FetchFailed(e.to_string()),
//!     }
//! });
//!
//! // Scoped tasks emit as many actions as they like
//! tasks.spawn_scoped("save-1", |scope| async move {
//!     scope.emit(Action::SaveStarted);
//!     // ...
//! });
//!
//! tasks.cancel(&TaskKey::new("fetch"));
//! ```

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use crate::Action;

/// Identifies a task for cancellation and replacement.
///
/// Spawning a task under a key that is already in use cancels the
/// previous task first.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    /// Create a new task key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Dispatch capability handed to a running task.
///
/// Emits go to the owner's action channel only while the task's
/// cancellation flag is unset.
#[derive(Clone, Debug)]
pub struct TaskScope<A> {
    token: CancellationToken,
    tx: mpsc::UnboundedSender<A>,
}

impl<A: Action> TaskScope<A> {
    pub(crate) fn new(token: CancellationToken, tx: mpsc::UnboundedSender<A>) -> Self {
        Self { token, tx }
    }

    /// Send an action unless the scope was torn down.
    ///
    /// Returns `false` when the action was discarded.
    pub fn emit(&self, action: impl Into<A>) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        self.tx.send(action.into()).is_ok()
    }

    /// Whether the owning scope has been torn down.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the owning scope is torn down.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Cancellation handle for a single spawned task.
///
/// Cancelling is idempotent; the flag only ever goes from unset to set.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    key: TaskKey,
    token: CancellationToken,
}

impl TaskHandle {
    pub(crate) fn new(key: TaskKey, token: CancellationToken) -> Self {
        Self { key, token }
    }

    /// Flip the task's cancellation flag.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the task's cancellation flag is set.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The key the task was spawned under.
    pub fn key(&self) -> &TaskKey {
        &self.key
    }
}

struct TaskEntry {
    token: CancellationToken,
    join: JoinHandle<()>,
}

/// Manages one-shot async tasks keyed by name.
///
/// # Type Parameters
///
/// - `A`: The action type that tasks produce
pub struct TaskManager<A> {
    tasks: HashMap<TaskKey, TaskEntry>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> TaskManager<A>
where
    A: Action,
{
    /// Create a new task manager sending actions into `action_tx`.
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            tasks: HashMap::new(),
            action_tx,
        }
    }

    /// Send an action immediately, outside of any task.
    pub fn dispatch(&self, action: impl Into<A>) -> bool {
        self.action_tx.send(action.into()).is_ok()
    }

    /// Spawn a task whose output is emitted as a single action.
    ///
    /// If the task is cancelled before the future resolves, the action
    /// is dropped.
    pub fn spawn<F>(&mut self, key: impl Into<TaskKey>, future: F) -> TaskHandle
    where
        F: Future<Output = A> + Send + 'static,
    {
        self.spawn_scoped(key, move |scope| async move {
            let action = future.await;
            if !scope.emit(action) {
                tracing::trace!("task result discarded");
            }
        })
    }

    /// Spawn a task that receives a [`TaskScope`] to emit actions itself.
    ///
    /// Any running task under the same key is cancelled first.
    pub fn spawn_scoped<F, Fut>(&mut self, key: impl Into<TaskKey>, task: F) -> TaskHandle
    where
        F: FnOnce(TaskScope<A>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);
        self.prune();

        let token = CancellationToken::new();
        let scope = TaskScope::new(token.clone(), self.action_tx.clone());
        let join = tokio::spawn(task(scope));

        tracing::trace!(task = %key.name(), "task spawned");
        self.tasks.insert(
            key.clone(),
            TaskEntry {
                token: token.clone(),
                join,
            },
        );
        TaskHandle::new(key, token)
    }

    /// Cancel a task by key.
    ///
    /// If no task exists with the given key, this is a no-op.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(entry) = self.tasks.remove(key) {
            entry.token.cancel();
        }
    }

    /// Cancel all tasks.
    pub fn cancel_all(&mut self) {
        for (_, entry) in self.tasks.drain() {
            entry.token.cancel();
        }
    }

    /// Check if a task with the given key is still running.
    pub fn is_running(&self, key: &TaskKey) -> bool {
        self.tasks
            .get(key)
            .is_some_and(|entry| !entry.join.is_finished())
    }

    /// Number of tasks that have not finished yet.
    pub fn len(&self) -> usize {
        self.tasks
            .values()
            .filter(|entry| !entry.join.is_finished())
            .count()
    }

    /// Check if there are no running tasks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&mut self) {
        self.tasks.retain(|_, entry| !entry.join.is_finished());
    }
}

impl<A> Drop for TaskManager<A> {
    fn drop(&mut self) {
        for (_, entry) in self.tasks.drain() {
            entry.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Done(usize),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            "Done"
        }
    }

    #[test]
    fn test_task_key() {
        let k1 = TaskKey::new("fetch");
        let k2 = TaskKey::from("fetch");
        let k3: TaskKey = String::from("fetch").into();

        assert_eq!(k1, k2);
        assert_eq!(k2, k3);
        assert_eq!(k1.name(), "fetch");
    }

    #[tokio::test]
    async fn test_spawn_sends_action() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TestAction>();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn("test", async { TestAction::Done(42) });

        let action = tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");

        assert_eq!(action, TestAction::Done(42));
    }

    #[tokio::test]
    async fn test_cancelled_task_runs_but_result_is_discarded() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TestAction>();
        let mut tasks = TaskManager::new(tx);
        let (release_tx, release_rx) = oneshot::channel::<()>();
        let (finished_tx, finished_rx) = oneshot::channel::<bool>();

        let handle = tasks.spawn_scoped("fetch", move |scope| async move {
            let _ = release_rx.await;
            let sent = scope.emit(TestAction::Done(1));
            let _ = finished_tx.send(sent);
        });

        handle.cancel();
        assert!(handle.is_cancelled());
        let _ = release_tx.send(());

        let sent = tokio::time::timeout(Duration::from_millis(500), finished_rx)
            .await
            .expect("task should still run to completion")
            .expect("task dropped");
        assert!(!sent);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_spawn_same_key_cancels_previous() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TestAction>();
        let mut tasks = TaskManager::new(tx);

        let first = tasks.spawn("test", async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            TestAction::Done(1)
        });
        tasks.spawn("test", async { TestAction::Done(2) });
        assert!(first.is_cancelled());

        let action = tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed");
        assert_eq!(action, TestAction::Done(2));

        let late = tokio::time::timeout(Duration::from_millis(150), rx.recv()).await;
        assert!(late.is_err(), "first task's result must be dropped");
    }

    #[tokio::test]
    async fn test_cancel_all_and_is_running() {
        let (tx, _rx) = mpsc::unbounded_channel::<TestAction>();
        let mut tasks = TaskManager::new(tx);

        tasks.spawn_scoped("a", |scope| async move { scope.cancelled().await });
        tasks.spawn_scoped("b", |scope| async move { scope.cancelled().await });

        assert!(tasks.is_running(&TaskKey::new("a")));
        assert_eq!(tasks.len(), 2);

        tasks.cancel_all();

        assert!(tasks.is_empty());
        assert!(!tasks.is_running(&TaskKey::new("a")));
    }

    #[tokio::test]
    async fn test_dispatch_is_immediate() {
        let (tx, mut rx) = mpsc::unbounded_channel::<TestAction>();
        let tasks = TaskManager::new(tx);

        assert!(tasks.dispatch(TestAction::Done(7)));
        assert_eq!(rx.try_recv().ok(), Some(TestAction::Done(7)));
    }
}
