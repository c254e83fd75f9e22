//! REST client for the trip collection
//!
//! [`TripApi`] is the seam the sync layer talks to; [`HttpTripApi`] is the
//! reqwest implementation. Each call logs its start and outcome.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::model::{SaveResponse, Trip, WireTrip};

/// Remote trip collection
pub trait TripApi: Send + Sync + 'static {
    /// `GET` the whole collection
    fn list_trips(&self) -> impl Future<Output = Result<Vec<WireTrip>, ApiError>> + Send;

    /// `POST` a trip that has no id yet
    fn create_trip(&self, trip: &Trip)
        -> impl Future<Output = Result<SaveResponse, ApiError>> + Send;

    /// `PUT` a trip by its id
    fn update_trip(&self, trip: &Trip)
        -> impl Future<Output = Result<SaveResponse, ApiError>> + Send;
}

/// [`TripApi`] over HTTP
#[derive(Clone, Debug)]
pub struct HttpTripApi {
    client: Client,
    trips_url: String,
}

impl HttpTripApi {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ServerConfig) -> Self {
        Self {
            client,
            trips_url: config.trips_url(),
        }
    }

    fn trip_url(&self, id: &str) -> String {
        format!("{}/{}", self.trips_url, id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        debug!(operation, "request started");

        let result: Result<T, ApiError> = async {
            let response = request
                .header(CONTENT_TYPE, "application/json")
                .send()
                .await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(ApiError::Status { status, body });
            }
            Ok(serde_json::from_str(&body)?)
        }
        .await;

        match &result {
            Ok(_) => debug!(operation, "request succeeded"),
            Err(err) => warn!(operation, error = %err, "request failed"),
        }
        result
    }
}

impl TripApi for HttpTripApi {
    async fn list_trips(&self) -> Result<Vec<WireTrip>, ApiError> {
        self.send("list_trips", self.client.get(&self.trips_url))
            .await
    }

    async fn create_trip(&self, trip: &Trip) -> Result<SaveResponse, ApiError> {
        self.send("create_trip", self.client.post(&self.trips_url).json(trip))
            .await
    }

    async fn update_trip(&self, trip: &Trip) -> Result<SaveResponse, ApiError> {
        // only called for persisted trips; an empty id still yields a request the server rejects
        let url = self.trip_url(trip.id.as_deref().unwrap_or_default());
        self.send("update_trip", self.client.put(url).json(trip)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_config() {
        let api = HttpTripApi::new(&ServerConfig::parse("localhost:3000"));
        assert_eq!(api.trips_url, "http://localhost:3000/trip");
        assert_eq!(api.trip_url("abc"), "http://localhost:3000/trip/abc");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        // port 9 (discard) on localhost is closed in test environments
        let api = HttpTripApi::new(&ServerConfig::parse("127.0.0.1:9"));
        let result = api.list_trips().await;
        assert!(matches!(result, Err(ApiError::Request(_))));
    }
}
