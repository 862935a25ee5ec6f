// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection supervisor: the control loop that owns everything.
//!
//! The supervisor sequences startup (network join, broker session, discovery
//! publish, subscription, initial state publish), then runs the steady-state
//! tick forever: advance the indicator animation, poll the transport for at
//! most one event, publish state on the fixed interval, idle briefly. On a
//! transport failure it recovers in place: error color, fixed backoff, one
//! reconnect attempt, and on success a resubscribe plus state republish.
//! Recovery is retried every tick indefinitely; the device prefers looping a
//! five-second backoff forever over giving up during a prolonged outage.
//!
//! Failure policy per phase:
//!
//! - startup failures (join, broker connect, subscribe) propagate and
//!   terminate the process
//! - steady-state transport failures enter recovery
//! - publish failures are logged and ignored
//! - decode failures are logged and change nothing

use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::actuator::LampDriver;
use crate::command::{self, CommandSchema};
use crate::config::{Settings, Topics};
use crate::error::Error;
use crate::hardware::{PixelWriter, PwmOutput};
use crate::indicator::{Phase, StatusIndicator};
use crate::network::NetworkLink;
use crate::protocol::{PollOutcome, Transport};
use crate::state::LightState;
use crate::telemetry::{DiscoveryDocument, StateReport};
use crate::types::Brightness;

/// Timing knobs for the control loop.
///
/// Defaults match the deployed firmware; tests shrink them and run under a
/// paused clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorConfig {
    /// Interval between unsolicited state publishes.
    pub publish_interval: Duration,
    /// Upper bound on one transport poll.
    pub poll_window: Duration,
    /// Low-power wait at the end of each tick. Inbound commands during the
    /// wait are deferred to the next poll.
    pub idle_wait: Duration,
    /// Fixed backoff before a reconnect attempt.
    pub recovery_backoff: Duration,
    /// Settle delay after the initializing stage, so the color is visible.
    pub stage_settle: Duration,
    /// Settle delay after the ready color is shown.
    pub ready_settle: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            publish_interval: Duration::from_secs(60),
            poll_window: Duration::from_millis(500),
            idle_wait: Duration::from_secs(10),
            recovery_backoff: Duration::from_secs(5),
            stage_settle: Duration::from_millis(500),
            ready_settle: Duration::from_secs(1),
        }
    }
}

/// The connection supervisor.
///
/// Owns the lamp state, the transport, and both effectors; everything else
/// reacts to events it dispatches. See the crate-level example for wiring.
#[derive(Debug)]
pub struct Supervisor<T, N, O, P> {
    config: SupervisorConfig,
    topics: Topics,
    schema: CommandSchema,
    wifi_ssid: String,
    wifi_password: String,
    discovery: Option<DiscoveryDocument>,
    transport: T,
    network: N,
    lamp: LampDriver<O>,
    indicator: StatusIndicator<P>,
    state: LightState,
    last_publish: Instant,
}

impl<T, N, O, P> Supervisor<T, N, O, P>
where
    T: Transport,
    N: NetworkLink,
    O: PwmOutput,
    P: PixelWriter,
{
    /// Creates a supervisor from validated settings.
    ///
    /// The pixel is dropped when the settings disable the indicator; the
    /// bare-string schema has no state topic, so state reporting and
    /// discovery are active only for the JSON schema.
    pub fn new(
        settings: &Settings,
        config: SupervisorConfig,
        transport: T,
        network: N,
        output: O,
        pixel: Option<P>,
    ) -> Self {
        let pixel = if settings.indicator_enabled { pixel } else { None };
        let discovery = match settings.schema {
            CommandSchema::Json => Some(DiscoveryDocument::from_settings(settings)),
            CommandSchema::Plain => None,
        };

        Self {
            config,
            topics: settings.topics(),
            schema: settings.schema,
            wifi_ssid: settings.wifi_ssid.clone(),
            wifi_password: settings.wifi_password.clone(),
            discovery,
            transport,
            network,
            lamp: LampDriver::new(output),
            indicator: StatusIndicator::new(pixel),
            state: LightState::new(),
            last_publish: Instant::now(),
        }
    }

    /// Runs the supervisor for the lifetime of the process.
    ///
    /// # Errors
    ///
    /// Returns an error only for startup failures; once ready, every failure
    /// is absorbed and retried.
    pub async fn run(mut self) -> Result<(), Error> {
        self.start().await?;
        loop {
            self.tick().await;
        }
    }

    /// Executes the startup sequence up to the ready state.
    ///
    /// # Errors
    ///
    /// Propagates network join, broker connect, and subscribe failures.
    pub async fn start(&mut self) -> Result<(), Error> {
        tracing::info!("stage 1: initializing");
        self.indicator.set_phase(Phase::Initializing);
        sleep(self.config.stage_settle).await;

        tracing::info!(ssid = %self.wifi_ssid, "stage 2: connecting to network");
        self.indicator.set_phase(Phase::Connecting);
        let (ssid, password) = (self.wifi_ssid.clone(), self.wifi_password.clone());
        self.network.join(&ssid, &password).await?;

        tracing::info!("stage 3: setting up broker session");
        self.indicator.set_phase(Phase::BrokerSetup);
        self.transport.connect().await?;

        if let Some(doc) = &self.discovery {
            let payload = doc.to_payload();
            match self.transport.publish(&self.topics.discovery, payload, true).await {
                Ok(()) => tracing::info!(topic = %self.topics.discovery, "published discovery"),
                Err(e) => tracing::warn!(error = %e, "failed to publish discovery"),
            }
        }

        self.transport.subscribe(&self.topics.command).await?;
        tracing::info!(topic = %self.topics.command, "subscribed to command topic");

        // Known-safe default: lamp on at full brightness, then report it.
        self.lamp.set_level(&mut self.state, Brightness::MAX);
        self.publish_state().await;

        tracing::info!("stage 4: ready");
        self.indicator.set_phase(Phase::Ready);
        sleep(self.config.ready_settle).await;
        self.last_publish = Instant::now();
        Ok(())
    }

    /// Executes one steady-state tick, including recovery.
    pub async fn tick(&mut self) {
        self.indicator.animate_tick();

        match self.transport.poll(self.config.poll_window).await {
            Ok(PollOutcome::Message(msg)) => {
                if msg.topic == self.topics.command {
                    self.handle_command(&msg.payload).await;
                } else {
                    tracing::trace!(topic = %msg.topic, "message on unexpected topic");
                }
            }
            Ok(PollOutcome::SessionRestored) => {
                tracing::info!("broker session restored, resubscribing");
                if let Err(e) = self.transport.subscribe(&self.topics.command).await {
                    tracing::warn!(error = %e, "resubscribe failed");
                }
                self.publish_state().await;
            }
            Ok(PollOutcome::Idle) => {}
            Err(e) => {
                tracing::warn!(error = %e, "transport failure, entering recovery");
                self.recover().await;
            }
        }

        if self.reporting_enabled() && self.last_publish.elapsed() > self.config.publish_interval {
            self.publish_state().await;
            self.last_publish = Instant::now();
        }

        sleep(self.config.idle_wait).await;
    }

    /// Decodes and applies one inbound payload, then reports the new state.
    async fn handle_command(&mut self, payload: &[u8]) {
        let cmd = match command::decode(payload, self.schema) {
            Ok(cmd) => cmd,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed command");
                return;
            }
        };

        tracing::info!(?cmd, "applying command");
        command::apply(cmd, &mut self.state, &mut self.lamp);

        if self.reporting_enabled() {
            self.publish_state().await;
        }
    }

    /// Absorbs a transport failure: error color, backoff, one attempt.
    async fn recover(&mut self) {
        self.indicator.set_phase(Phase::Error);
        sleep(self.config.recovery_backoff).await;

        match self.transport.reconnect().await {
            Ok(()) => {
                tracing::info!("reconnected to broker");
                if let Err(e) = self.transport.subscribe(&self.topics.command).await {
                    tracing::warn!(error = %e, "resubscribe after recovery failed");
                }
                self.publish_state().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "reconnect failed, will retry next tick");
            }
        }
    }

    /// Publishes the current state; failures are logged and ignored.
    async fn publish_state(&mut self) {
        if !self.reporting_enabled() {
            return;
        }
        let payload = StateReport::from_state(&self.state).to_payload();
        match self.transport.publish(&self.topics.state, payload, false).await {
            Ok(()) => tracing::debug!(topic = %self.topics.state, "published state"),
            Err(e) => tracing::warn!(error = %e, "failed to publish state"),
        }
    }

    /// Whether this deployment reports state at all.
    ///
    /// The bare-string variant has no state topic, so nothing is published.
    fn reporting_enabled(&self) -> bool {
        self.schema == CommandSchema::Json
    }

    /// Returns the current lamp state.
    #[must_use]
    pub fn state(&self) -> &LightState {
        &self.state
    }

    /// Returns the status indicator.
    #[must_use]
    pub fn indicator(&self) -> &StatusIndicator<P> {
        &self.indicator
    }

    /// Returns the lamp driver.
    #[must_use]
    pub fn lamp(&self) -> &LampDriver<O> {
        &self.lamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_firmware_timing() {
        let config = SupervisorConfig::default();
        assert_eq!(config.publish_interval, Duration::from_secs(60));
        assert_eq!(config.idle_wait, Duration::from_secs(10));
        assert_eq!(config.recovery_backoff, Duration::from_secs(5));
    }
}
