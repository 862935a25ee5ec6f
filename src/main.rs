// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lamp controller entry point.
//!
//! Wires environment configuration, the MQTT transport, and logging hardware
//! stand-ins into the supervisor and runs it forever. Configuration errors
//! and startup connection failures terminate the process; everything after
//! the ready stage is absorbed by the supervisor.

use tracing_subscriber::EnvFilter;

use lampion::config::Settings;
use lampion::hardware::{LoggingPixel, LoggingPwm};
use lampion::network::HostNetwork;
use lampion::protocol::MqttTransport;
use lampion::supervisor::{Supervisor, SupervisorConfig};

#[tokio::main]
async fn main() -> lampion::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env()?;
    tracing::info!(
        board = %settings.board_id,
        broker = %settings.broker_host,
        port = settings.broker_port,
        "starting lamp controller"
    );

    let transport = MqttTransport::new(&settings);
    let supervisor = Supervisor::new(
        &settings,
        SupervisorConfig::default(),
        transport,
        HostNetwork,
        LoggingPwm::new(),
        Some(LoggingPixel::new()),
    );

    supervisor.run().await
}
