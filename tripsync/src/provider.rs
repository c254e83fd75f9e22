//! Owns the trip store and the effects that feed it
//!
//! The provider is built once by the composition root and handed around by
//! reference. Effects never touch the store; they send [`TripAction`]s over
//! the action channel and the owner pulls them in with [`TripProvider::recv`]
//! or [`TripProvider::drain`].

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::debug;
use tripsync_core::{LoggingMiddleware, StoreWithMiddleware, Subscriptions, TaskManager};

use crate::action::TripAction;
use crate::api::TripApi;
use crate::channel::{ChannelState, PushConnector};
use crate::model::Trip;
use crate::reducer::reducer;
use crate::state::TripsState;
use crate::sync::{self, SaveCompletion};

/// An action taken off the channel and the store's verdict on it.
#[derive(Clone, Debug, PartialEq)]
pub struct Applied {
    pub action: TripAction,
    pub changed: bool,
}

pub struct TripProvider<Api, C> {
    store: StoreWithMiddleware<TripsState, TripAction, LoggingMiddleware>,
    action_rx: mpsc::UnboundedReceiver<TripAction>,
    tasks: TaskManager<TripAction>,
    subscriptions: Subscriptions<TripAction>,
    api: Arc<Api>,
    connector: Arc<C>,
    channel_state: Option<watch::Receiver<ChannelState>>,
    mounted: bool,
    next_save: u64,
}

impl<Api, C> TripProvider<Api, C>
where
    Api: TripApi,
    C: PushConnector,
{
    pub fn new(api: Api, connector: C) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            store: StoreWithMiddleware::new(
                TripsState::default(),
                reducer,
                LoggingMiddleware::new(),
            ),
            action_rx,
            tasks: TaskManager::new(action_tx.clone()),
            subscriptions: Subscriptions::new(action_tx),
            api: Arc::new(api),
            connector: Arc::new(connector),
            channel_state: None,
            mounted: false,
            next_save: 0,
        }
    }

    /// Start the initial load and the live subscription. Later calls do nothing.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        debug!("trip provider mounted");

        sync::start_fetch(self.api.clone(), &mut self.tasks);
        let (_, state_rx) = sync::start_live(self.connector.clone(), &mut self.subscriptions);
        self.channel_state = Some(state_rx);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Create or update `trip`. Every call gets its own task, so concurrent
    /// saves do not cancel each other.
    pub fn save_trip(&mut self, trip: Trip) -> SaveCompletion {
        self.next_save += 1;
        let key = format!("save-trip-{}", self.next_save);
        sync::save_trip(self.api.clone(), &mut self.tasks, key, trip)
    }

    pub fn state(&self) -> &TripsState {
        self.store.state()
    }

    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        self.store.state().trip_by_id(id)
    }

    /// Current push channel state; `Disconnected` before mount.
    pub fn channel_state(&self) -> ChannelState {
        self.channel_state
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or_default()
    }

    /// Watch handle for push channel state changes, available once mounted.
    pub fn watch_channel_state(&self) -> Option<watch::Receiver<ChannelState>> {
        self.channel_state.clone()
    }

    /// Wait for the next action and apply it.
    pub async fn recv(&mut self) -> Option<Applied> {
        let action = self.action_rx.recv().await?;
        Some(self.apply(action))
    }

    /// Apply every action already queued. Returns whether the state changed.
    pub fn drain(&mut self) -> bool {
        let mut changed = false;
        while let Ok(action) = self.action_rx.try_recv() {
            changed |= self.apply(action).changed;
        }
        changed
    }

    /// Tear down every effect and wait for the push channel to close.
    ///
    /// Results of requests still in flight are discarded. Dropping the
    /// provider cancels as well, but without waiting.
    pub async fn unmount(mut self) {
        debug!("trip provider unmounting");
        self.tasks.cancel_all();
        self.subscriptions.shutdown().await;
    }

    fn apply(&mut self, action: TripAction) -> Applied {
        let changed = self.store.dispatch(action.clone());
        Applied { action, changed }
    }
}
