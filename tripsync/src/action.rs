//! Actions applied to the trip collection
//!
//! Naming follows the request lifecycle: `*Started` when a request goes
//! out, `*Succeeded`/`*Failed` when its result comes back. Live channel
//! upserts reuse `SaveSucceeded`; live deletes are `Deleted`.

use tripsync_core::Action;

use crate::error::{FetchError, SaveError};
use crate::model::Trip;

#[derive(Clone, Debug, PartialEq)]
pub enum TripAction {
    /// Initial load went out
    FetchStarted,
    /// Initial load returned the full collection
    FetchSucceeded(Vec<Trip>),
    /// Initial load failed
    FetchFailed(FetchError),
    /// A create/update went out
    SaveStarted,
    /// A trip was confirmed by the server (save response or live event)
    SaveSucceeded(Trip),
    /// A create/update failed
    SaveFailed(SaveError),
    /// A trip was deleted remotely
    Deleted { id: String },
}

impl Action for TripAction {
    fn name(&self) -> &'static str {
        match self {
            TripAction::FetchStarted => "FetchStarted",
            TripAction::FetchSucceeded(_) => "FetchSucceeded",
            TripAction::FetchFailed(_) => "FetchFailed",
            TripAction::SaveStarted => "SaveStarted",
            TripAction::SaveSucceeded(_) => "SaveSucceeded",
            TripAction::SaveFailed(_) => "SaveFailed",
            TripAction::Deleted { .. } => "Deleted",
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            TripAction::FetchStarted | TripAction::SaveStarted => None,
            TripAction::FetchSucceeded(trips) => Some(format!("{} trips", trips.len())),
            TripAction::FetchFailed(err) => Some(err.to_string()),
            TripAction::SaveSucceeded(trip) => {
                Some(trip.id.clone().unwrap_or_else(|| "unsaved".to_string()))
            }
            TripAction::SaveFailed(err) => Some(err.to_string()),
            TripAction::Deleted { id } => Some(id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_summarizes_payload() {
        let trips = vec![
            Trip::new("Paris", 1.0, None, false).with_id("1"),
            Trip::new("Rome", 2.0, None, false).with_id("2"),
        ];
        assert_eq!(
            TripAction::FetchSucceeded(trips).detail().as_deref(),
            Some("2 trips")
        );
        assert_eq!(
            TripAction::SaveSucceeded(Trip::new("Oslo", 0.0, None, true).with_id("9"))
                .detail()
                .as_deref(),
            Some("9")
        );
        assert_eq!(
            TripAction::Deleted { id: "4".into() }.detail().as_deref(),
            Some("4")
        );
        assert_eq!(
            TripAction::SaveFailed(SaveError::new("")).detail().as_deref(),
            Some("Failed to save trip")
        );
        assert_eq!(TripAction::FetchStarted.detail(), None);
    }
}
