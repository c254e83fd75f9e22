//! Trip records and their wire representation
//!
//! The server is lax about what it sends: any field may be missing, ids may
//! be strings or numbers, and dates arrive either as plain dates or as full
//! ISO-8601 timestamps. [`WireTrip`] accepts all of that and
//! [`WireTrip::into_trip`] turns it into a [`Trip`] with every field set.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Destination used when the server omits one.
pub const UNKNOWN_DESTINATION: &str = "Unknown";

/// A trip as the client keeps it.
///
/// `id` is `None` until the server has assigned one.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub destination: String,
    pub budget: f64,
    pub date: Option<NaiveDate>,
    pub with_car: bool,
}

impl Trip {
    /// A trip that has not been saved yet.
    pub fn new(
        destination: impl Into<String>,
        budget: f64,
        date: Option<NaiveDate>,
        with_car: bool,
    ) -> Self {
        Self {
            id: None,
            destination: destination.into(),
            budget,
            date,
            with_car,
        }
    }

    /// Same trip carrying a server-assigned id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// A trip record exactly as the server sent it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTrip {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub date: Option<serde_json::Value>,
    #[serde(default)]
    pub with_car: Option<bool>,
}

impl WireTrip {
    /// Normalize into a [`Trip`]: parse the date and default missing fields.
    pub fn into_trip(self) -> Trip {
        let date = match &self.date {
            Some(serde_json::Value::String(raw)) => parse_date(raw),
            _ => None,
        };
        Trip {
            id: self.id,
            destination: self
                .destination
                .unwrap_or_else(|| UNKNOWN_DESTINATION.to_string()),
            budget: self.budget.unwrap_or(0.0),
            date,
            with_car: self.with_car.unwrap_or(false),
        }
    }
}

/// Body of a create/update response: one record, or a list whose head is the saved trip.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SaveResponse {
    Many(Vec<WireTrip>),
    One(WireTrip),
}

impl SaveResponse {
    pub fn into_first(self) -> Option<WireTrip> {
        match self {
            SaveResponse::Many(records) => records.into_iter().next(),
            SaveResponse::One(record) => Some(record),
        }
    }
}

/// Parse a calendar date from `YYYY-MM-DD`, an RFC 3339 timestamp, or a
/// date-time without offset (`2024-06-01T10:00:00`).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|local| local.date())
        })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(id)) => Some(id),
        Some(RawId::Number(id)) => Some(id.to_string()),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(value: serde_json::Value) -> WireTrip {
        serde_json::from_value(value).expect("valid wire trip")
    }

    #[test]
    fn test_full_record_normalizes() {
        let trip = wire(json!({
            "id": "1",
            "destination": "Paris",
            "budget": 500,
            "date": "2024-06-01",
            "withCar": true
        }))
        .into_trip();

        assert_eq!(trip.id.as_deref(), Some("1"));
        assert_eq!(trip.destination, "Paris");
        assert_eq!(trip.budget, 500.0);
        assert_eq!(trip.date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert!(trip.with_car);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let trip = wire(json!({ "id": "7" })).into_trip();

        assert_eq!(trip.destination, UNKNOWN_DESTINATION);
        assert_eq!(trip.budget, 0.0);
        assert_eq!(trip.date, None);
        assert!(!trip.with_car);
    }

    #[test]
    fn test_date_forms() {
        assert_eq!(
            parse_date("2024-06-01T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_date(" 2025-01-31 "), NaiveDate::from_ymd_opt(2025, 1, 31));
        assert_eq!(
            parse_date("2024-06-01T10:00:00"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(
            parse_date("2024-06-01T23:59:59.250"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_date("2024-06-01T25:00:00"), None);
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(parse_date(""), None);

        let naive = wire(json!({ "id": "1", "date": "2024-06-01T10:00:00" })).into_trip();
        assert_eq!(naive.date, NaiveDate::from_ymd_opt(2024, 6, 1));

        let null_date = wire(json!({ "id": "1", "date": null })).into_trip();
        assert_eq!(null_date.date, None);

        let numeric_date = wire(json!({ "id": "1", "date": 1717200000 })).into_trip();
        assert_eq!(numeric_date.date, None);
    }

    #[test]
    fn test_numeric_id_is_accepted() {
        let trip = wire(json!({ "id": 42, "destination": "Oslo" })).into_trip();
        assert_eq!(trip.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_serialize_unsaved_trip_omits_id() {
        let trip = Trip::new("Rome", 120.5, NaiveDate::from_ymd_opt(2024, 9, 3), false);
        let value = serde_json::to_value(&trip).expect("serializable");

        assert_eq!(
            value,
            json!({
                "destination": "Rome",
                "budget": 120.5,
                "date": "2024-09-03",
                "withCar": false
            })
        );
    }

    #[test]
    fn test_serialize_saved_trip_without_date() {
        let trip = Trip::new("Rome", 0.0, None, true).with_id("9");
        let value = serde_json::to_value(&trip).expect("serializable");

        assert_eq!(value["id"], json!("9"));
        assert_eq!(value["date"], serde_json::Value::Null);
        assert!(trip.is_persisted());
    }

    #[test]
    fn test_save_response_shapes() {
        let one: SaveResponse =
            serde_json::from_value(json!({ "id": "1", "destination": "Lyon" })).expect("object");
        assert_eq!(one.into_first().and_then(|t| t.id), Some("1".to_string()));

        let many: SaveResponse =
            serde_json::from_value(json!([{ "id": "2" }, { "id": "3" }])).expect("array");
        assert_eq!(many.into_first().and_then(|t| t.id), Some("2".to_string()));

        let empty: SaveResponse = serde_json::from_value(json!([])).expect("empty array");
        assert_eq!(empty.into_first(), None);
    }
}
