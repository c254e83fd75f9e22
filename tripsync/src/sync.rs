//! Effects that keep the trip collection in sync with the server
//!
//! - [`start_fetch`]: one-shot initial load
//! - [`save_trip`]: create or update, reported back through the store
//! - [`start_live`]: push channel subscription for remote changes
//!
//! Each effect emits [`TripAction`]s through a [`TaskScope`], so once its
//! scope is torn down nothing it produces reaches the store. Requests that
//! are already in flight still complete; their results are dropped.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};
use tripsync_core::{Action, Subscriptions, TaskHandle, TaskKey, TaskManager, TaskScope};

use crate::action::TripAction;
use crate::api::TripApi;
use crate::channel::{decode_frame, ChannelState, LiveEvent, PushChannel, PushConnector};
use crate::error::{FetchError, SaveError};
use crate::model::{Trip, WireTrip};

pub const FETCH_TASK: &str = "fetch-trips";
pub const LIVE_SUBSCRIPTION: &str = "live-trips";

/// Reported when a create/update answers with an empty list.
pub const EMPTY_SAVE_RESPONSE: &str = "save response contained no trip";

// ============================================================================
// FetchSync
// ============================================================================

/// Load the whole collection.
///
/// Emits `FetchStarted` right away, then `FetchSucceeded` or `FetchFailed`
/// unless the returned handle (or the task manager) was cancelled first.
pub fn start_fetch<Api, A>(api: Arc<Api>, tasks: &mut TaskManager<A>) -> TaskHandle
where
    Api: TripApi,
    A: Action + From<TripAction>,
{
    debug!("fetch trips started");
    tasks.dispatch(TripAction::FetchStarted);

    tasks.spawn(FETCH_TASK, async move {
        let action = match api.list_trips().await {
            Ok(records) => {
                let trips: Vec<Trip> = records.into_iter().map(WireTrip::into_trip).collect();
                debug!(count = trips.len(), "fetch trips succeeded");
                TripAction::FetchSucceeded(trips)
            }
            Err(err) => {
                warn!(error = %err, "fetch trips failed");
                TripAction::FetchFailed(FetchError::from(err))
            }
        };
        action.into()
    })
}

// ============================================================================
// SaveSync
// ============================================================================

/// How a save ended. Failures are also in the store as `saving_error`.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveOutcome {
    Saved(Trip),
    Failed(SaveError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved(_))
    }
}

/// Resolves once a save's result action has been emitted.
#[derive(Debug)]
pub struct SaveCompletion {
    rx: oneshot::Receiver<SaveOutcome>,
}

impl SaveCompletion {
    pub async fn wait(self) -> SaveOutcome {
        self.rx
            .await
            .unwrap_or_else(|_| SaveOutcome::Failed(SaveError::new("save task ended unexpectedly")))
    }
}

/// Create (no id) or update (id present) a trip.
///
/// Emits `SaveStarted` right away, then `SaveSucceeded` with the normalized
/// server record or `SaveFailed`. Never fails itself.
pub fn save_trip<Api, A>(
    api: Arc<Api>,
    tasks: &mut TaskManager<A>,
    key: impl Into<TaskKey>,
    trip: Trip,
) -> SaveCompletion
where
    Api: TripApi,
    A: Action + From<TripAction>,
{
    debug!(id = ?trip.id, "save trip started");
    tasks.dispatch(TripAction::SaveStarted);

    let (done_tx, done_rx) = oneshot::channel();
    tasks.spawn_scoped(key, move |scope| async move {
        let outcome = match persist(api.as_ref(), &trip).await {
            Ok(saved) => {
                debug!(id = ?saved.id, "save trip succeeded");
                scope.emit(TripAction::SaveSucceeded(saved.clone()));
                SaveOutcome::Saved(saved)
            }
            Err(err) => {
                warn!(error = %err, "save trip failed");
                scope.emit(TripAction::SaveFailed(err.clone()));
                SaveOutcome::Failed(err)
            }
        };
        let _ = done_tx.send(outcome);
    });

    SaveCompletion { rx: done_rx }
}

async fn persist<Api: TripApi>(api: &Api, trip: &Trip) -> Result<Trip, SaveError> {
    let response = if trip.is_persisted() {
        api.update_trip(trip).await
    } else {
        api.create_trip(trip).await
    }?;

    response
        .into_first()
        .map(WireTrip::into_trip)
        .ok_or_else(|| SaveError::new(EMPTY_SAVE_RESPONSE))
}

// ============================================================================
// LiveSync
// ============================================================================

/// Subscribe to the push channel for as long as the subscription lives.
///
/// The returned receiver follows the channel through
/// `Disconnected → Connecting → Open → Closing → Disconnected`. There is
/// no reconnect: a transport error or a server close ends the subscription.
pub fn start_live<C, A>(
    connector: Arc<C>,
    subscriptions: &mut Subscriptions<A>,
) -> (TaskHandle, watch::Receiver<ChannelState>)
where
    C: PushConnector,
    A: Action + From<TripAction>,
{
    let (state_tx, state_rx) = watch::channel(ChannelState::Disconnected);
    let handle = subscriptions.source(LIVE_SUBSCRIPTION, move |scope| {
        run_live(connector, scope, state_tx)
    });
    (handle, state_rx)
}

async fn run_live<C, A>(connector: Arc<C>, scope: TaskScope<A>, state: watch::Sender<ChannelState>)
where
    C: PushConnector,
    A: Action + From<TripAction>,
{
    info!("live channel connecting");
    state.send_replace(ChannelState::Connecting);

    let connected = tokio::select! {
        _ = scope.cancelled() => None,
        result = connector.connect() => Some(result),
    };
    let mut channel = match connected {
        Some(Ok(channel)) => channel,
        Some(Err(err)) => {
            warn!(error = %err, "live channel failed to connect");
            state.send_replace(ChannelState::Disconnected);
            return;
        }
        None => {
            debug!("live channel torn down while connecting");
            state.send_replace(ChannelState::Disconnected);
            return;
        }
    };

    info!("live channel open");
    state.send_replace(ChannelState::Open);

    loop {
        let frame = tokio::select! {
            biased;
            _ = scope.cancelled() => break,
            frame = channel.next_frame() => frame,
        };
        match frame {
            Some(Ok(text)) => apply_frame(&scope, &text),
            Some(Err(err)) => {
                warn!(error = %err, "live channel error");
                break;
            }
            None => {
                info!("live channel closed by server");
                break;
            }
        }
    }

    state.send_replace(ChannelState::Closing);
    channel.close().await;
    state.send_replace(ChannelState::Disconnected);
    info!("live channel disconnected");
}

fn apply_frame<A>(scope: &TaskScope<A>, text: &str)
where
    A: Action + From<TripAction>,
{
    match decode_frame(text) {
        Ok(LiveEvent::Upserted(trip)) => {
            debug!(id = ?trip.id, "live trip upserted");
            scope.emit(TripAction::SaveSucceeded(trip));
        }
        Ok(LiveEvent::Deleted(id)) => {
            debug!(%id, "live trip deleted");
            scope.emit(TripAction::Deleted { id });
        }
        Err(err) => warn!(error = %err, "skipping live frame"),
    }
}
