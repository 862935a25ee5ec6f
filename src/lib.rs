// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lampion - an MQTT-controlled smart lamp node.
//!
//! This crate implements the controller side of a small connected lamp: it
//! joins the network, connects to an MQTT broker, exposes a PWM-dimmable lamp
//! output as a Home Assistant light entity, and drives a single-pixel RGB
//! status indicator through the connection lifecycle.
//!
//! # Supported Features
//!
//! - **Power and brightness control**: JSON commands (`{"state":"ON",
//!   "brightness":128}`) or bare `on`/`off` tokens, selectable per deployment
//! - **State reporting**: JSON state publishes on startup, after every
//!   accepted command, and on a fixed interval
//! - **Auto-discovery**: a retained Home Assistant discovery document so the
//!   hub registers the lamp without manual configuration
//! - **Connection supervision**: a single-task control loop that keeps lamp
//!   state, broker session, and the indicator consistent across WiFi and
//!   broker transience, retrying forever instead of crashing
//!
//! # Quick Start
//!
//! ```no_run
//! use lampion::config::Settings;
//! use lampion::hardware::{LoggingPixel, LoggingPwm};
//! use lampion::network::HostNetwork;
//! use lampion::protocol::MqttTransport;
//! use lampion::supervisor::{Supervisor, SupervisorConfig};
//!
//! #[tokio::main]
//! async fn main() -> lampion::Result<()> {
//!     let settings = Settings::from_env()?;
//!     let transport = MqttTransport::new(&settings);
//!
//!     let supervisor = Supervisor::new(
//!         &settings,
//!         SupervisorConfig::default(),
//!         transport,
//!         HostNetwork,
//!         LoggingPwm::new(),
//!         Some(LoggingPixel::new()),
//!     );
//!
//!     supervisor.run().await
//! }
//! ```
//!
//! Real deployments replace [`LoggingPwm`](hardware::LoggingPwm) and
//! [`LoggingPixel`](hardware::LoggingPixel) with implementations backed by
//! the board's PWM peripheral and addressable LED.

pub mod actuator;
pub mod command;
pub mod config;
pub mod error;
pub mod hardware;
pub mod indicator;
pub mod network;
pub mod protocol;
pub mod state;
pub mod supervisor;
pub mod telemetry;
pub mod types;

pub use command::{Command, CommandSchema};
pub use config::{Settings, Topics};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result};
pub use indicator::{Phase, StatusIndicator};
pub use protocol::{InboundMessage, MqttTransport, PollOutcome, Transport};
pub use state::LightState;
pub use supervisor::{Supervisor, SupervisorConfig};
pub use types::{Brightness, PowerState, RgbColor};
