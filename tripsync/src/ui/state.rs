//! UI state: screen, list selection and the edit form

use chrono::NaiveDate;

use crate::model::{parse_date, Trip};

/// Which screen is showing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    List,
    Edit,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiState {
    pub screen: Screen,
    /// Highlighted row on the list screen
    pub selected: usize,
    pub form: EditForm,
}

/// Form fields in focus order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Destination,
    Budget,
    Date,
    WithCar,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            FormField::Destination => FormField::Budget,
            FormField::Budget => FormField::Date,
            FormField::Date => FormField::WithCar,
            FormField::WithCar => FormField::Destination,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Destination => FormField::WithCar,
            FormField::Budget => FormField::Destination,
            FormField::Date => FormField::Budget,
            FormField::WithCar => FormField::Date,
        }
    }
}

/// Edit form contents, kept as typed text until submit
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditForm {
    /// Id of the trip being edited, `None` when adding
    pub trip_id: Option<String>,
    pub destination: String,
    pub budget: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub with_car: bool,
    pub focus: FormField,
    /// A save is in flight
    pub submitting: bool,
    /// Why the last save failed
    pub error: Option<String>,
}

impl EditForm {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id.clone(),
            destination: trip.destination.clone(),
            budget: trip.budget.to_string(),
            date: trip
                .date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            with_car: trip.with_car,
            ..Self::default()
        }
    }

    pub fn is_new(&self) -> bool {
        self.trip_id.is_none()
    }

    /// The text buffer behind a field, `None` for the car toggle.
    pub fn field_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Destination => Some(&mut self.destination),
            FormField::Budget => Some(&mut self.budget),
            FormField::Date => Some(&mut self.date),
            FormField::WithCar => None,
        }
    }

    /// Build the trip to save.
    ///
    /// A budget that does not parse becomes `0`; a missing or unparseable
    /// date becomes `today`.
    pub fn to_trip(&self, today: NaiveDate) -> Trip {
        let budget = self
            .budget
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|budget| budget.is_finite())
            .unwrap_or(0.0);
        let date = parse_date(&self.date).unwrap_or(today);

        let trip = Trip::new(self.destination.trim(), budget, Some(date), self.with_car);
        match &self.trip_id {
            Some(id) => trip.with_id(id.clone()),
            None => trip,
        }
    }
}
