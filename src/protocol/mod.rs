// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Message transport abstraction.
//!
//! The supervisor drives its transport through an explicit polling seam:
//! each tick it asks for at most one event within a bounded window, and
//! consumes the result synchronously. There is no callback dispatch and no
//! hidden re-entrancy; decoded messages flow back to the caller as values.
//!
//! [`MqttTransport`] is the production implementation over rumqttc. Tests
//! substitute scripted transports.

mod mqtt;

use std::time::Duration;

use crate::error::ProtocolError;

pub use mqtt::MqttTransport;

/// An inbound message from the command topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// The topic the message arrived on.
    pub topic: String,
    /// The raw payload bytes.
    pub payload: Vec<u8>,
}

/// Outcome of one bounded transport poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A message arrived.
    Message(InboundMessage),
    /// The broker session was (re-)established; subscriptions are gone and
    /// must be re-made.
    SessionRestored,
    /// Nothing of interest happened within the window.
    Idle,
}

/// A broker transport the supervisor can drive from a single task.
///
/// The error type is deliberately coarse: the supervisor does not
/// distinguish failure causes, it only decides retry versus ignore.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Establishes the initial broker session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be established; this is fatal
    /// during startup.
    async fn connect(&mut self) -> Result<(), ProtocolError>;

    /// Waits up to `window` for the next transport event.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection failed; the supervisor answers
    /// with its recovery path.
    async fn poll(&mut self, window: Duration) -> Result<PollOutcome, ProtocolError>;

    /// Publishes a payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the publish could not be queued or sent.
    async fn publish(
        &mut self,
        topic: &str,
        payload: Vec<u8>,
        retain: bool,
    ) -> Result<(), ProtocolError>;

    /// Subscribes to a topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscription could not be queued or sent.
    async fn subscribe(&mut self, topic: &str) -> Result<(), ProtocolError>;

    /// Makes a single bounded attempt to re-establish the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the attempt fails; the supervisor retries on a
    /// later tick.
    async fn reconnect(&mut self) -> Result<(), ProtocolError>;
}
