//! UI reducer: (state, action) -> changed + effects
//!
//! Only `EditSubmit` produces an effect; everything else is plain state.

use tripsync_core::DispatchResult;

use super::action::UiAction;
use super::effect::Effect;
use super::state::{EditForm, FormField, Screen, UiState};

pub fn reducer(state: &mut UiState, action: UiAction) -> DispatchResult<Effect> {
    match action {
        // ===== List =====
        UiAction::ListSelect(index) => {
            if state.selected == index {
                return DispatchResult::unchanged();
            }
            state.selected = index;
            DispatchResult::changed()
        }

        UiAction::EditOpen(trip) => {
            state.form = trip
                .as_ref()
                .map(EditForm::from_trip)
                .unwrap_or_else(EditForm::blank);
            state.screen = Screen::Edit;
            DispatchResult::changed()
        }

        // ===== Form editing =====
        // Input is frozen while a save is in flight.
        UiAction::EditFocusNext | UiAction::EditFocusPrev if state.form.submitting => {
            DispatchResult::unchanged()
        }
        UiAction::EditFocusNext => {
            state.form.focus = state.form.focus.next();
            DispatchResult::changed()
        }
        UiAction::EditFocusPrev => {
            state.form.focus = state.form.focus.prev();
            DispatchResult::changed()
        }

        UiAction::EditInput(c) => {
            if state.form.submitting {
                return DispatchResult::unchanged();
            }
            let focus = state.form.focus;
            match state.form.field_mut(focus) {
                Some(text) => {
                    text.push(c);
                    DispatchResult::changed()
                }
                None => DispatchResult::unchanged(),
            }
        }

        UiAction::EditBackspace => {
            if state.form.submitting {
                return DispatchResult::unchanged();
            }
            let focus = state.form.focus;
            match state.form.field_mut(focus) {
                Some(text) => text.pop().is_some().into(),
                None => DispatchResult::unchanged(),
            }
        }

        UiAction::EditToggleCar => {
            if state.form.submitting || state.form.focus != FormField::WithCar {
                return DispatchResult::unchanged();
            }
            state.form.with_car = !state.form.with_car;
            DispatchResult::changed()
        }

        // ===== Save =====
        UiAction::EditSubmit => {
            if state.screen != Screen::Edit || state.form.submitting {
                return DispatchResult::unchanged();
            }
            state.form.submitting = true;
            state.form.error = None;
            DispatchResult::changed_with(Effect::SaveTrip(state.form.clone()))
        }

        UiAction::EditDidSave => {
            if state.screen != Screen::Edit {
                return DispatchResult::unchanged();
            }
            state.form = EditForm::blank();
            state.screen = Screen::List;
            DispatchResult::changed()
        }

        UiAction::EditDidFail(message) => {
            if state.screen != Screen::Edit {
                return DispatchResult::unchanged();
            }
            state.form.submitting = false;
            state.form.error = Some(message);
            DispatchResult::changed()
        }

        UiAction::EditCancel => {
            if state.screen != Screen::Edit {
                return DispatchResult::unchanged();
            }
            state.form = EditForm::blank();
            state.screen = Screen::List;
            DispatchResult::changed()
        }

        // Handled by the main loop
        UiAction::Quit => DispatchResult::unchanged(),
    }
}
