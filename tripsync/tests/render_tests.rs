//! Render tests using RenderHarness
//!
//! Screens are driven the way the main loop drives them: state comes out of
//! the reducers, the component renders it into a test buffer.

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tripsync::channel::ChannelState;
use tripsync::components::{Component, TripEdit, TripEditProps, TripList, TripListProps};
use tripsync::error::SaveError;
use tripsync::reducer::reducer;
use tripsync::ui::{self, Effect, Screen, UiAction, UiState};
use tripsync::{Trip, TripAction, TripsState};
use tripsync_core::testing::{char_key, code_key, key_event, RenderHarness};

fn loaded_state() -> TripsState {
    let mut state = TripsState::default();
    reducer(&mut state, TripAction::FetchStarted);
    reducer(
        &mut state,
        TripAction::FetchSucceeded(vec![Trip::new(
            "Paris",
            500.0,
            NaiveDate::from_ymd_opt(2024, 6, 1),
            false,
        )
        .with_id("1")]),
    );
    state
}

fn render_list(state: &TripsState, selected: usize) -> String {
    let mut render = RenderHarness::new(72, 12);
    render.render_to_string_plain(|frame| {
        let props = TripListProps {
            trips: state.trips(),
            fetching: state.fetching,
            fetching_error: state.fetching_error.as_ref().map(|err| err.message()),
            selected,
            channel: ChannelState::Open,
            is_focused: true,
        };
        TripList.render(frame, frame.area(), props);
    })
}

fn render_edit(ui: &UiState) -> String {
    let mut render = RenderHarness::new(60, 12);
    render.render_to_string_plain(|frame| {
        let props = TripEditProps {
            form: &ui.form,
            is_focused: true,
        };
        TripEdit.render(frame, frame.area(), props);
    })
}

#[test]
fn test_list_follows_live_upsert() {
    let mut state = loaded_state();
    let output = render_list(&state, 0);
    assert!(output.contains("> Paris"));
    assert!(!output.contains("Loading trips..."));

    reducer(
        &mut state,
        TripAction::SaveSucceeded(Trip::new("Rome", 300.0, None, true).with_id("2")),
    );
    let output = render_list(&state, 0);
    let rome = output.find("Rome").expect("Rome row");
    let paris = output.find("Paris").expect("Paris row");
    assert!(rome < paris, "new trips are listed first");
    assert!(output.contains("> Rome"));
}

#[test]
fn test_list_shows_empty_hint_after_delete() {
    let mut state = loaded_state();
    reducer(&mut state, TripAction::Deleted { id: "1".into() });

    let output = render_list(&state, 3);
    assert!(output.contains("No trips yet"));
}

#[test]
fn test_add_flow_through_reducer() {
    let state = loaded_state();
    let mut ui_state = UiState::default();

    let open: Vec<UiAction> = TripList
        .handle_event(
            &key_event(char_key('a')),
            TripListProps {
                trips: state.trips(),
                fetching: false,
                fetching_error: None,
                selected: 0,
                channel: ChannelState::Open,
                is_focused: true,
            },
        )
        .into_iter()
        .collect();
    for action in open {
        let _ = ui::reducer(&mut ui_state, action);
    }
    assert_eq!(ui_state.screen, Screen::Edit);
    assert!(render_edit(&ui_state).contains("Add New Trip"));

    for c in "Oslo".chars() {
        let _ = ui::reducer(&mut ui_state, UiAction::EditInput(c));
    }
    let submit: Vec<UiAction> = TripEdit
        .handle_event(
            &key_event(code_key(KeyCode::Enter)),
            TripEditProps {
                form: &ui_state.form,
                is_focused: true,
            },
        )
        .into_iter()
        .collect();
    assert_eq!(submit, vec![UiAction::EditSubmit]);

    let result = ui::reducer(&mut ui_state, UiAction::EditSubmit);
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::SaveTrip(form)] if form.destination == "Oslo"
    ));
    let output = render_edit(&ui_state);
    assert!(output.contains("Oslo"));
    assert!(output.contains("Saving..."));

    let _ = ui::reducer(
        &mut ui_state,
        UiAction::EditDidFail(SaveError::new("").message().to_string()),
    );
    let output = render_edit(&ui_state);
    assert!(output.contains("Failed to save trip"));
    assert!(!output.contains("Saving..."));
}
