//! Terminal front end state
//!
//! The UI keeps its own store, separate from the trip collection: which
//! screen is showing, the list selection and the edit form. Saving is an
//! [`Effect`] the main loop hands to the provider.

pub mod action;
pub mod effect;
pub mod reducer;
pub mod state;

pub use action::UiAction;
pub use effect::Effect;
pub use reducer::reducer;
pub use state::{EditForm, FormField, Screen, UiState};
