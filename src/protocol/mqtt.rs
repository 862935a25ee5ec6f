// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport over rumqttc.
//!
//! The event loop is polled inline from the supervisor's task rather than
//! from a spawned handler, which keeps the whole controller on one thread of
//! control: client requests queue on the internal channel and flush as the
//! loop is polled each tick.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};

use crate::config::Settings;
use crate::error::ProtocolError;

use super::{InboundMessage, PollOutcome, Transport};

/// Keep-alive interval for the broker session.
const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Deadline for the initial CONNACK and for a single reconnect attempt.
const SESSION_DEADLINE: Duration = Duration::from_secs(10);

/// Request queue depth between client handle and event loop.
const REQUEST_CAPACITY: usize = 10;

/// MQTT transport for the lamp controller.
///
/// # Examples
///
/// ```no_run
/// use lampion::config::Settings;
/// use lampion::protocol::{MqttTransport, Transport};
///
/// # async fn example() -> lampion::Result<()> {
/// let settings = Settings::from_env()?;
/// let mut transport = MqttTransport::new(&settings);
/// transport.connect().await?;
/// # Ok(())
/// # }
/// ```
pub struct MqttTransport {
    client: AsyncClient,
    event_loop: EventLoop,
}

impl MqttTransport {
    /// Creates a transport for the configured broker.
    ///
    /// The client id combines the board id with the process id so a board
    /// restarted mid-session does not fight its own stale connection.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let client_id = format!("lampion_{}_{}", settings.board_id, std::process::id());
        Self::with_address(&settings.broker_host, settings.broker_port, &client_id)
    }

    /// Creates a transport from a broker URL such as `mqtt://host:1883`.
    ///
    /// Accepts `mqtt://` and `tcp://` schemes or a bare `host[:port]`; the
    /// port defaults to 1883.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidAddress`] if the port is not numeric.
    pub fn from_url(url: &str, client_id: &str) -> Result<Self, ProtocolError> {
        let (host, port) = parse_broker_url(url)?;
        Ok(Self::with_address(&host, port, client_id))
    }

    /// Creates a transport for an explicit host and port.
    #[must_use]
    pub fn with_address(host: &str, port: u16, client_id: &str) -> Self {
        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(KEEP_ALIVE);
        options.set_clean_session(true);

        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);
        Self { client, event_loop }
    }

    /// Polls the event loop until a CONNACK arrives or the deadline passes.
    async fn await_session(&mut self) -> Result<(), ProtocolError> {
        let deadline = SESSION_DEADLINE;
        let wait = async {
            loop {
                match self.event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                        tracing::debug!(?ack, "broker session established");
                        return Ok(());
                    }
                    Ok(event) => {
                        tracing::trace!(?event, "event before session");
                    }
                    Err(e) => {
                        return Err(ProtocolError::ConnectionFailed(e.to_string()));
                    }
                }
            }
        };

        // The deadline in milliseconds fits u64.
        #[allow(clippy::cast_possible_truncation)]
        let deadline_ms = deadline.as_millis() as u64;

        tokio::time::timeout(deadline, wait)
            .await
            .map_err(|_| ProtocolError::Timeout(deadline_ms))?
    }
}

/// Splits a broker URL into host and port.
fn parse_broker_url(url: &str) -> Result<(String, u16), ProtocolError> {
    let address = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    match address.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse()
                .map_err(|_| ProtocolError::InvalidAddress(format!("invalid port: {port}")))?;
            Ok((host.to_string(), port))
        }
        None => Ok((address.to_string(), 1883)),
    }
}

impl Transport for MqttTransport {
    async fn connect(&mut self) -> Result<(), ProtocolError> {
        self.await_session().await
    }

    async fn poll(&mut self, window: Duration) -> Result<PollOutcome, ProtocolError> {
        match tokio::time::timeout(window, self.event_loop.poll()).await {
            // Window elapsed quietly; the tick moves on.
            Err(_) => Ok(PollOutcome::Idle),
            Ok(Ok(Event::Incoming(Packet::Publish(publish)))) => {
                tracing::debug!(topic = %publish.topic, len = publish.payload.len(), "message received");
                Ok(PollOutcome::Message(InboundMessage {
                    topic: publish.topic,
                    payload: publish.payload.to_vec(),
                }))
            }
            // A CONNACK mid-loop means rumqttc re-established the session
            // behind our back; the clean session dropped our subscriptions.
            Ok(Ok(Event::Incoming(Packet::ConnAck(_)))) => Ok(PollOutcome::SessionRestored),
            Ok(Ok(event)) => {
                tracing::trace!(?event, "transport event");
                Ok(PollOutcome::Idle)
            }
            Ok(Err(e)) => Err(ProtocolError::ConnectionFailed(e.to_string())),
        }
    }

    async fn publish(
        &mut self,
        topic: &str,
        payload: Vec<u8>,
        retain: bool,
    ) -> Result<(), ProtocolError> {
        tracing::debug!(topic, retain, len = payload.len(), "publishing");
        self.client
            .publish(topic, QoS::AtLeastOnce, retain, payload)
            .await
            .map_err(ProtocolError::Mqtt)
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), ProtocolError> {
        tracing::debug!(topic, "subscribing");
        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)
    }

    async fn reconnect(&mut self) -> Result<(), ProtocolError> {
        // rumqttc retries the TCP connect on the next event-loop poll, so a
        // reconnect attempt is just waiting for the next CONNACK.
        self.await_session().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_url_with_scheme_and_port() {
        let (host, port) = parse_broker_url("mqtt://192.168.1.50:1883").unwrap();
        assert_eq!(host, "192.168.1.50");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_url_tcp_scheme() {
        let (host, port) = parse_broker_url("tcp://broker.local:8883").unwrap();
        assert_eq!(host, "broker.local");
        assert_eq!(port, 8883);
    }

    #[test]
    fn parse_url_bare_host_defaults_port() {
        let (host, port) = parse_broker_url("broker.local").unwrap();
        assert_eq!(host, "broker.local");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_url_invalid_port() {
        let result = parse_broker_url("mqtt://broker.local:not-a-port");
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }
}
