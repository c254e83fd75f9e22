//! tripsync - trip list client kept in sync with a REST API and a push channel
//!
//! # Layers
//!
//! - [`model`]: the [`Trip`] record and its lenient wire form
//! - [`state`], [`action`], [`reducer`]: the trip store; every change to
//!   the collection goes through [`reducer::reducer`]
//! - [`api`], [`channel`]: REST client and WebSocket push channel behind
//!   the [`TripApi`] and [`PushConnector`] traits
//! - [`sync`]: fetch, save and live effects that feed the store
//! - [`provider`]: owns the store and runs the effects for its lifetime
//! - [`ui`], [`components`]: terminal front end
//!
//! ```ignore
//! let config = ServerConfig::parse("localhost:3000");
//! let mut provider = TripProvider::new(HttpTripApi::new(&config), WsConnector::new(&config));
//! provider.mount();
//!
//! while let Some(applied) = provider.recv().await {
//!     println!("{} trips", provider.state().trips().len());
//! }
//! ```

pub mod action;
pub mod api;
pub mod channel;
pub mod components;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod reducer;
pub mod state;
pub mod sync;
pub mod ui;

pub use action::TripAction;
pub use api::{HttpTripApi, TripApi};
pub use channel::{ChannelState, LiveEvent, PushChannel, PushConnector, WsChannel, WsConnector};
pub use config::{Args, Command, ServerConfig};
pub use error::{ApiError, ChannelError, FetchError, SaveError};
pub use model::{SaveResponse, Trip, WireTrip};
pub use provider::{Applied, TripProvider};
pub use state::TripsState;
pub use sync::{SaveCompletion, SaveOutcome};
