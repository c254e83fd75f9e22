//! UI actions
//!
//! `List*` and `Edit*` follow the screen they belong to; `EditDid*` report
//! back from the save effect.

use tripsync_core::Action;

use crate::model::Trip;

#[derive(Clone, Debug, PartialEq)]
pub enum UiAction {
    /// Move the list selection to this row
    ListSelect(usize),

    /// Open the form on an existing trip, or on a blank one
    EditOpen(Option<Trip>),
    EditFocusNext,
    EditFocusPrev,
    /// Typed character for the focused field
    EditInput(char),
    EditBackspace,
    EditToggleCar,
    EditSubmit,
    EditCancel,
    /// The save went through
    EditDidSave,
    /// The save failed with this message
    EditDidFail(String),

    Quit,
}

impl Action for UiAction {
    fn name(&self) -> &'static str {
        match self {
            UiAction::ListSelect(_) => "ListSelect",
            UiAction::EditOpen(_) => "EditOpen",
            UiAction::EditFocusNext => "EditFocusNext",
            UiAction::EditFocusPrev => "EditFocusPrev",
            UiAction::EditInput(_) => "EditInput",
            UiAction::EditBackspace => "EditBackspace",
            UiAction::EditToggleCar => "EditToggleCar",
            UiAction::EditSubmit => "EditSubmit",
            UiAction::EditCancel => "EditCancel",
            UiAction::EditDidSave => "EditDidSave",
            UiAction::EditDidFail(_) => "EditDidFail",
            UiAction::Quit => "Quit",
        }
    }
}
