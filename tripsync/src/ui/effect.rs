//! Effects - side effects declared by the UI reducer

use super::state::EditForm;

/// Work the reducer asks the main loop to do
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Persist the submitted form
    SaveTrip(EditForm),
}
