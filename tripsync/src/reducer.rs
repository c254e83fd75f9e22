//! Reducer - the only code that mutates [`TripsState`]
//!
//! Returns `true` if the state changed. Remote and local updates meet here:
//! whichever `SaveSucceeded` for an id is applied last wins.

use crate::action::TripAction;
use crate::model::Trip;
use crate::state::TripsState;

pub fn reducer(state: &mut TripsState, action: TripAction) -> bool {
    match action {
        // ===== Initial load =====
        TripAction::FetchStarted => {
            state.fetching = true;
            state.fetching_error = None;
            true
        }

        TripAction::FetchSucceeded(trips) => {
            state.trips = Some(trips);
            state.fetching = false;
            true
        }

        TripAction::FetchFailed(error) => {
            // keep whatever was loaded before
            state.fetching_error = Some(error);
            state.fetching = false;
            true
        }

        // ===== Saves =====
        TripAction::SaveStarted => {
            state.saving = true;
            state.saving_error = None;
            true
        }

        TripAction::SaveSucceeded(trip) => {
            upsert(state.trips.get_or_insert_with(Vec::new), trip);
            state.saving = false;
            true
        }

        TripAction::SaveFailed(error) => {
            state.saving_error = Some(error);
            state.saving = false;
            true
        }

        // ===== Live deletes =====
        TripAction::Deleted { id } => {
            let Some(trips) = state.trips.as_mut() else {
                return false;
            };
            let before = trips.len();
            trips.retain(|trip| trip.id.as_deref() != Some(id.as_str()));
            trips.len() != before
        }
    }
}

/// Replace the trip with the same id in place, or insert at the front.
///
/// Trips without an id never match anything.
fn upsert(trips: &mut Vec<Trip>, trip: Trip) {
    let existing = trip
        .id
        .as_deref()
        .and_then(|id| trips.iter().position(|t| t.id.as_deref() == Some(id)));
    match existing {
        Some(index) => trips[index] = trip,
        None => trips.insert(0, trip),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, SaveError};
    use chrono::NaiveDate;

    fn trip(id: &str, destination: &str) -> Trip {
        Trip::new(destination, 100.0, None, false).with_id(id)
    }

    fn ids(state: &TripsState) -> Vec<&str> {
        state
            .trips()
            .iter()
            .filter_map(|t| t.id.as_deref())
            .collect()
    }

    #[test]
    fn test_fetch_started_sets_fetching_and_clears_error() {
        let mut state = TripsState {
            fetching_error: Some(FetchError::new("offline")),
            ..Default::default()
        };

        assert!(reducer(&mut state, TripAction::FetchStarted));

        assert!(state.fetching);
        assert!(state.fetching_error.is_none());
    }

    #[test]
    fn test_fetch_succeeded_replaces_trips() {
        let mut state = TripsState::default();
        reducer(&mut state, TripAction::FetchStarted);

        let paris = Trip {
            id: Some("1".into()),
            destination: "Paris".into(),
            budget: 500.0,
            date: NaiveDate::from_ymd_opt(2024, 6, 1),
            with_car: false,
        };
        assert!(reducer(&mut state, TripAction::FetchSucceeded(vec![paris])));

        assert!(!state.fetching);
        assert_eq!(state.trips().len(), 1);
        assert_eq!(ids(&state), vec!["1"]);
    }

    #[test]
    fn test_fetch_failed_keeps_existing_trips() {
        let mut state = TripsState {
            trips: Some(vec![trip("1", "Paris")]),
            ..Default::default()
        };
        let before = state.trips.clone();

        reducer(&mut state, TripAction::FetchStarted);
        assert!(reducer(
            &mut state,
            TripAction::FetchFailed(FetchError::new("timeout"))
        ));

        assert_eq!(state.trips, before);
        assert!(!state.fetching);
        assert_eq!(state.fetching_error, Some(FetchError::new("timeout")));
    }

    #[test]
    fn test_save_started_clears_error() {
        let mut state = TripsState {
            saving_error: Some(SaveError::new("boom")),
            ..Default::default()
        };

        reducer(&mut state, TripAction::SaveStarted);

        assert!(state.saving);
        assert!(state.saving_error.is_none());
    }

    #[test]
    fn test_save_succeeded_new_id_is_prepended() {
        let mut state = TripsState {
            trips: Some(vec![trip("1", "Paris")]),
            ..Default::default()
        };
        reducer(&mut state, TripAction::SaveStarted);

        assert!(reducer(
            &mut state,
            TripAction::SaveSucceeded(trip("2", "Rome"))
        ));

        assert_eq!(ids(&state), vec!["2", "1"]);
        assert!(!state.saving);
    }

    #[test]
    fn test_save_succeeded_existing_id_replaces_in_place() {
        let mut state = TripsState {
            trips: Some(vec![trip("3", "Oslo"), trip("2", "Rome"), trip("1", "Paris")]),
            ..Default::default()
        };

        reducer(&mut state, TripAction::SaveSucceeded(trip("2", "Naples")));

        assert_eq!(ids(&state), vec!["3", "2", "1"]);
        assert_eq!(state.trips()[1].destination, "Naples");
    }

    #[test]
    fn test_save_succeeded_before_any_load_creates_collection() {
        let mut state = TripsState::default();

        reducer(&mut state, TripAction::SaveSucceeded(trip("1", "Paris")));

        assert_eq!(ids(&state), vec!["1"]);
    }

    #[test]
    fn test_upserts_keep_ids_unique() {
        let mut state = TripsState::default();
        let sequence = ["1", "2", "1", "3", "2", "2", "1"];

        for (n, id) in sequence.iter().enumerate() {
            reducer(
                &mut state,
                TripAction::SaveSucceeded(trip(id, &format!("v{n}"))),
            );
        }

        let mut seen = ids(&state);
        seen.sort_unstable();
        assert_eq!(seen, vec!["1", "2", "3"]);
        assert_eq!(state.trip_by_id("1").map(|t| t.destination.as_str()), Some("v6"));
    }

    #[test]
    fn test_trips_without_id_never_merge() {
        let mut state = TripsState::default();
        reducer(
            &mut state,
            TripAction::SaveSucceeded(Trip::new("A", 0.0, None, false)),
        );
        reducer(
            &mut state,
            TripAction::SaveSucceeded(Trip::new("B", 0.0, None, false)),
        );

        assert_eq!(state.trips().len(), 2);
        assert_eq!(state.trips()[0].destination, "B");
    }

    #[test]
    fn test_save_failed_sets_error() {
        let mut state = TripsState::default();
        reducer(&mut state, TripAction::SaveStarted);

        reducer(&mut state, TripAction::SaveFailed(SaveError::new("409")));

        assert!(!state.saving);
        assert_eq!(state.saving_error.as_ref().map(|e| e.message()), Some("409"));
        assert!(state.trips.is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut state = TripsState {
            trips: Some(vec![trip("2", "Rome"), trip("1", "Paris")]),
            ..Default::default()
        };

        assert!(reducer(&mut state, TripAction::Deleted { id: "1".into() }));
        assert_eq!(ids(&state), vec!["2"]);

        let snapshot = state.clone();
        assert!(!reducer(&mut state, TripAction::Deleted { id: "1".into() }));
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_delete_before_load_is_noop() {
        let mut state = TripsState::default();
        assert!(!reducer(&mut state, TripAction::Deleted { id: "1".into() }));
        assert!(state.trips.is_none());
    }
}
