pub mod help_bar;
pub mod trip_edit;
pub mod trip_list;

// Re-export core Component trait
pub use tripsync_core::Component;

pub use help_bar::{HelpBar, HelpBarProps, EDIT_HINTS, LIST_HINTS};
pub use trip_edit::{TripEdit, TripEditProps};
pub use trip_list::{TripList, TripListProps};
