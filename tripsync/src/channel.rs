//! Push channel: server-to-client trip events over WebSocket
//!
//! Frames look like `{"event": "created"|"updated"|"deleted", "payload": {"trip": {...}}}`.
//! The client never sends anything.

use std::future::Future;

use futures_util::StreamExt;
use serde::Deserialize;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::config::ServerConfig;
use crate::error::ChannelError;
use crate::model::{Trip, WireTrip};

/// Lifecycle of the push channel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelState {
    #[default]
    Disconnected,
    Connecting,
    Open,
    Closing,
}

/// An open push channel
pub trait PushChannel: Send + 'static {
    /// Next text frame, or `None` once the server has closed the channel.
    fn next_frame(&mut self) -> impl Future<Output = Option<Result<String, ChannelError>>> + Send;

    /// Close the channel. Taking `self` makes a second close unrepresentable.
    fn close(self) -> impl Future<Output = ()> + Send;
}

/// Opens push channels
pub trait PushConnector: Send + Sync + 'static {
    type Channel: PushChannel;

    fn connect(&self) -> impl Future<Output = Result<Self::Channel, ChannelError>> + Send;
}

/// A decoded push event
#[derive(Clone, Debug, PartialEq)]
pub enum LiveEvent {
    /// `created` or `updated`
    Upserted(Trip),
    /// `deleted`, carrying the trip id
    Deleted(String),
}

#[derive(Deserialize)]
struct Frame {
    event: String,
    payload: FramePayload,
}

#[derive(Deserialize)]
struct FramePayload {
    trip: WireTrip,
}

/// Decode one text frame into a [`LiveEvent`].
pub fn decode_frame(text: &str) -> Result<LiveEvent, ChannelError> {
    let frame: Frame = serde_json::from_str(text)?;
    match frame.event.as_str() {
        "created" | "updated" => Ok(LiveEvent::Upserted(frame.payload.trip.into_trip())),
        "deleted" => frame
            .payload
            .trip
            .id
            .map(LiveEvent::Deleted)
            .ok_or(ChannelError::MissingId),
        _ => Err(ChannelError::UnknownEvent(frame.event)),
    }
}

/// [`PushConnector`] over tokio-tungstenite
#[derive(Clone, Debug)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            url: config.live_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PushConnector for WsConnector {
    type Channel = WsChannel;

    async fn connect(&self) -> Result<WsChannel, ChannelError> {
        let (stream, response) = tokio_tungstenite::connect_async(self.url.as_str()).await?;
        debug!(url = %self.url, status = %response.status(), "websocket handshake done");
        Ok(WsChannel { stream })
    }
}

/// An open WebSocket connection
pub struct WsChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl PushChannel for WsChannel {
    async fn next_frame(&mut self) -> Option<Result<String, ChannelError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Ok(text)),
                Ok(Message::Binary(bytes)) => match String::from_utf8(bytes) {
                    Ok(text) => return Some(Ok(text)),
                    Err(_) => debug!("skipping non-utf8 binary frame"),
                },
                Ok(Message::Close(frame)) => {
                    debug!(?frame, "server closed the websocket");
                    return None;
                }
                // ping/pong are answered by tungstenite itself
                Ok(_) => continue,
                Err(err) => return Some(Err(err.into())),
            }
        }
    }

    async fn close(mut self) {
        if let Err(err) = self.stream.close(None).await {
            debug!(error = %err, "websocket close did not complete cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_decode_created_and_updated() {
        let created = decode_frame(
            r#"{"event":"created","payload":{"trip":{"id":"5","destination":"Porto","budget":80,"date":"2024-07-14","withCar":true}}}"#,
        )
        .expect("valid frame");
        let LiveEvent::Upserted(trip) = created else {
            panic!("expected upsert, got {created:?}");
        };
        assert_eq!(trip.id.as_deref(), Some("5"));
        assert_eq!(trip.date, NaiveDate::from_ymd_opt(2024, 7, 14));
        assert!(trip.with_car);

        let updated =
            decode_frame(r#"{"event":"updated","payload":{"trip":{"id":"5"}}}"#).expect("valid");
        assert!(matches!(updated, LiveEvent::Upserted(t) if t.destination == "Unknown"));
    }

    #[test]
    fn test_decode_deleted() {
        let deleted =
            decode_frame(r#"{"event":"deleted","payload":{"trip":{"id":"1"}}}"#).expect("valid");
        assert_eq!(deleted, LiveEvent::Deleted("1".into()));
    }

    #[test]
    fn test_decode_rejects_bad_frames() {
        assert!(matches!(
            decode_frame(r#"{"event":"deleted","payload":{"trip":{}}}"#),
            Err(ChannelError::MissingId)
        ));
        assert!(matches!(
            decode_frame(r#"{"event":"archived","payload":{"trip":{"id":"1"}}}"#),
            Err(ChannelError::UnknownEvent(event)) if event == "archived"
        ));
        assert!(matches!(
            decode_frame("not json"),
            Err(ChannelError::Decode(_))
        ));
    }

    #[test]
    fn test_connector_url() {
        let connector = WsConnector::new(&ServerConfig::parse("localhost:3000"));
        assert_eq!(connector.url(), "ws://localhost:3000");
    }

    #[tokio::test]
    async fn test_secure_connector_attempts_tls() {
        use std::time::Duration;
        use tokio_tungstenite::tungstenite::{error::UrlError, Error as WsError};

        // Accepts the TCP connection and hangs up before any handshake.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                drop(stream);
            }
        });

        let connector = WsConnector::new(&ServerConfig::parse(&format!("https://{addr}")));
        assert!(connector.url().starts_with("wss://"));

        let result = tokio::time::timeout(Duration::from_secs(2), connector.connect()).await;
        if let Ok(Err(ChannelError::WebSocket(err))) = &result {
            assert!(
                !matches!(**err, WsError::Url(UrlError::TlsFeatureNotEnabled)),
                "wss urls must reach a TLS handshake"
            );
        }
        assert!(!matches!(result, Ok(Ok(_))));
    }
}
