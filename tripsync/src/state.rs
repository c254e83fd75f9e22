//! Trip collection state - single source of truth
//!
//! Views receive `&TripsState` and never mutate it; only
//! [`crate::reducer::reducer`] does.

use crate::error::{FetchError, SaveError};
use crate::model::Trip;

/// Client-side view of the trip collection and in-flight request status
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripsState {
    /// Known trips, newest insertions first (None = nothing loaded yet)
    pub trips: Option<Vec<Trip>>,

    /// Initial load in flight
    pub fetching: bool,

    /// Why the last load failed
    pub fetching_error: Option<FetchError>,

    /// A create/update in flight
    pub saving: bool,

    /// Why the last save failed
    pub saving_error: Option<SaveError>,
}

impl TripsState {
    /// Known trips, empty before the first load.
    pub fn trips(&self) -> &[Trip] {
        self.trips.as_deref().unwrap_or_default()
    }

    pub fn trip_by_id(&self, id: &str) -> Option<&Trip> {
        self.trips()
            .iter()
            .find(|trip| trip.id.as_deref() == Some(id))
    }

    pub fn is_loaded(&self) -> bool {
        self.trips.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_by_id() {
        let state = TripsState {
            trips: Some(vec![
                Trip::new("Paris", 500.0, None, false).with_id("1"),
                Trip::new("Rome", 300.0, None, true).with_id("2"),
            ]),
            ..Default::default()
        };

        assert_eq!(
            state.trip_by_id("2").map(|t| t.destination.as_str()),
            Some("Rome")
        );
        assert!(state.trip_by_id("3").is_none());
        assert!(state.is_loaded());
    }

    #[test]
    fn test_empty_before_load() {
        let state = TripsState::default();
        assert!(state.trips().is_empty());
        assert!(!state.is_loaded());
        assert!(state.trip_by_id("1").is_none());
    }
}
