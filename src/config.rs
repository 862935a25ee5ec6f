// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Startup configuration loaded from the environment.
//!
//! All required values must be present before any network activity starts;
//! a missing value aborts startup with a [`ConfigError`]. Optional values
//! fall back to documented defaults (port 1883, topics derived from the
//! board id, `homeassistant` discovery prefix).

use std::env;
use std::str::FromStr;

use crate::command::CommandSchema;
use crate::error::ConfigError;

/// Environment variable names.
const WIFI_SSID: &str = "LAMPION_WIFI_SSID";
const WIFI_PASSWORD: &str = "LAMPION_WIFI_PASSWORD";
const BROKER_HOST: &str = "LAMPION_BROKER_HOST";
const BROKER_PORT: &str = "LAMPION_BROKER_PORT";
const BOARD_ID: &str = "LAMPION_BOARD_ID";
const COMMAND_TOPIC: &str = "LAMPION_COMMAND_TOPIC";
const STATE_TOPIC: &str = "LAMPION_STATE_TOPIC";
const DISCOVERY_PREFIX: &str = "LAMPION_DISCOVERY_PREFIX";
const USE_INDICATOR: &str = "LAMPION_USE_INDICATOR";
const COMMAND_SCHEMA: &str = "LAMPION_COMMAND_SCHEMA";

/// Default MQTT broker port.
const DEFAULT_BROKER_PORT: u16 = 1883;

/// Default Home Assistant discovery prefix.
const DEFAULT_DISCOVERY_PREFIX: &str = "homeassistant";

/// Validated startup configuration.
///
/// # Examples
///
/// ```no_run
/// use lampion::config::Settings;
///
/// let settings = Settings::from_env()?;
/// let topics = settings.topics();
/// println!("commands on {}", topics.command);
/// # Ok::<(), lampion::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    /// WiFi network name, handed to the network link layer.
    pub wifi_ssid: String,
    /// WiFi passphrase, handed to the network link layer.
    pub wifi_password: String,
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// Stable identifier distinguishing this board from others on the broker.
    pub board_id: String,
    /// Explicit command topic override, if any.
    pub command_topic: Option<String>,
    /// Explicit state topic override, if any.
    pub state_topic: Option<String>,
    /// Prefix for the discovery config topic.
    pub discovery_prefix: String,
    /// Whether the status indicator pixel is fitted and should be driven.
    pub indicator_enabled: bool,
    /// Which command payload schema this deployment speaks.
    pub schema: CommandSchema,
}

impl Settings {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSetting`] if a required variable is
    /// absent, or [`ConfigError::InvalidSetting`] if a value fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads settings through an arbitrary lookup function.
    ///
    /// `from_env` delegates here; tests supply a map-backed closure to avoid
    /// mutating the process environment.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Settings::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingSetting(name))
        };

        let broker_port = match lookup(BROKER_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidSetting {
                name: BROKER_PORT,
                message: e.to_string(),
            })?,
            None => DEFAULT_BROKER_PORT,
        };

        let schema = match lookup(COMMAND_SCHEMA) {
            Some(raw) => {
                CommandSchema::from_str(&raw).map_err(|()| ConfigError::InvalidSetting {
                    name: COMMAND_SCHEMA,
                    message: format!("expected `json` or `plain`, got `{raw}`"),
                })?
            }
            None => CommandSchema::Json,
        };

        Ok(Self {
            wifi_ssid: required(WIFI_SSID)?,
            wifi_password: required(WIFI_PASSWORD)?,
            broker_host: required(BROKER_HOST)?,
            broker_port,
            board_id: required(BOARD_ID)?,
            command_topic: lookup(COMMAND_TOPIC).filter(|v| !v.is_empty()),
            state_topic: lookup(STATE_TOPIC).filter(|v| !v.is_empty()),
            discovery_prefix: lookup(DISCOVERY_PREFIX)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_DISCOVERY_PREFIX.to_string()),
            indicator_enabled: lookup(USE_INDICATOR)
                .map_or(true, |v| parse_flag(&v)),
            schema,
        })
    }

    /// Returns the resolved topic set for this board.
    ///
    /// Overrides win; otherwise topics derive from the board id.
    #[must_use]
    pub fn topics(&self) -> Topics {
        let id = &self.board_id;
        Topics {
            command: self
                .command_topic
                .clone()
                .unwrap_or_else(|| format!("home/light/{id}/set")),
            state: self
                .state_topic
                .clone()
                .unwrap_or_else(|| format!("home/light/{id}/state")),
            discovery: format!("{}/light/{id}/config", self.discovery_prefix),
        }
    }
}

/// Resolved MQTT topic set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    /// Inbound command topic (subscribed).
    pub command: String,
    /// Outbound state topic (published).
    pub state: String,
    /// Retained discovery config topic (published once at startup).
    pub discovery: String,
}

/// Truthy parsing for boolean flags, matching common settings conventions.
fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
