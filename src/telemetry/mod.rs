// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound payloads: state reports and the discovery document.
//!
//! The state report mirrors the stored [`LightState`] onto the wire, so a
//! lamp that is `ON` at brightness 0 is reported exactly that way. The
//! discovery document is the retained descriptor a Home Assistant hub uses
//! to auto-register the lamp as a brightness-capable light entity.

use serde::Serialize;

use crate::config::Settings;
use crate::state::LightState;
use crate::types::PowerState;

/// JSON state report published to the state topic.
///
/// # Examples
///
/// ```
/// use lampion::state::LightState;
/// use lampion::telemetry::StateReport;
///
/// let report = StateReport::from_state(&LightState::new());
/// let json = serde_json::to_string(&report).unwrap();
/// assert_eq!(json, r#"{"state":"ON","brightness":255}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateReport {
    /// Semantic power state.
    pub state: PowerState,
    /// Stored brightness level (0-255).
    pub brightness: u8,
}

impl StateReport {
    /// Builds a report from the current lamp state.
    #[must_use]
    pub fn from_state(state: &LightState) -> Self {
        Self {
            state: state.power(),
            brightness: state.brightness().value(),
        }
    }

    /// Serializes the report to JSON bytes.
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        // Two scalar fields; serialization cannot fail.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

/// Home Assistant MQTT discovery descriptor for this lamp.
///
/// Published retained to `<prefix>/light/<board-id>/config` once at startup,
/// so a hub that joins later still receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveryDocument {
    /// Display name of the entity.
    pub name: String,
    /// Unique entity id: the board identifier.
    pub unique_id: String,
    /// Topic the hub publishes commands to.
    pub command_topic: String,
    /// Topic this lamp reports state on.
    pub state_topic: String,
    /// Payload schema; this lamp speaks the `json` light schema.
    pub schema: &'static str,
    /// The lamp supports brightness.
    pub brightness: bool,
    /// Brightness is on the 0-255 scale.
    pub brightness_scale: u16,
    /// The hub should wait for state reports rather than assume success.
    pub optimistic: bool,
    /// Nested physical-device descriptor.
    pub device: DeviceDescriptor,
}

/// Physical-device block of the discovery document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceDescriptor {
    /// Identifiers grouping entities onto one device.
    pub identifiers: Vec<String>,
    /// Device display name.
    pub name: String,
    /// Board model.
    pub model: String,
    /// Board manufacturer.
    pub manufacturer: String,
}

impl DiscoveryDocument {
    /// Board model reported in the device block.
    const MODEL: &'static str = "QT Py ESP32-S2";

    /// Board manufacturer reported in the device block.
    const MANUFACTURER: &'static str = "Adafruit";

    /// Builds the discovery document for the configured board.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let topics = settings.topics();
        let id = settings.board_id.clone();
        Self {
            name: "simple-smart-power-light".to_string(),
            unique_id: id.clone(),
            command_topic: topics.command,
            state_topic: topics.state,
            schema: "json",
            brightness: true,
            brightness_scale: 255,
            optimistic: false,
            device: DeviceDescriptor {
                identifiers: vec![id.clone()],
                name: format!("Smart Power {id}"),
                model: Self::MODEL.to_string(),
                manufacturer: Self::MANUFACTURER.to_string(),
            },
        }
    }

    /// Serializes the document to JSON bytes.
    #[must_use]
    pub fn to_payload(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandSchema;
    use crate::types::Brightness;

    fn settings() -> Settings {
        Settings {
            wifi_ssid: "shipnet".to_string(),
            wifi_password: "hunter2".to_string(),
            broker_host: "broker.local".to_string(),
            broker_port: 1883,
            board_id: "qtpy-a1".to_string(),
            command_topic: None,
            state_topic: None,
            discovery_prefix: "homeassistant".to_string(),
            indicator_enabled: true,
            schema: CommandSchema::Json,
        }
    }

    #[test]
    fn state_report_shape() {
        let mut state = LightState::new();
        state.set_power(PowerState::Off);
        state.set_brightness(Brightness::MIN);

        let json = String::from_utf8(StateReport::from_state(&state).to_payload()).unwrap();
        assert_eq!(json, r#"{"state":"OFF","brightness":0}"#);
    }

    #[test]
    fn state_report_preserves_on_at_zero() {
        let mut state = LightState::new();
        state.set_brightness(Brightness::MIN);

        let report = StateReport::from_state(&state);
        assert_eq!(report.state, PowerState::On);
        assert_eq!(report.brightness, 0);
    }

    #[test]
    fn discovery_document_fields() {
        let doc = DiscoveryDocument::from_settings(&settings());
        assert_eq!(doc.unique_id, "qtpy-a1");
        assert_eq!(doc.command_topic, "home/light/qtpy-a1/set");
        assert_eq!(doc.state_topic, "home/light/qtpy-a1/state");
        assert_eq!(doc.schema, "json");
        assert!(doc.brightness);
        assert_eq!(doc.brightness_scale, 255);
        assert!(!doc.optimistic);
        assert_eq!(doc.device.identifiers, vec!["qtpy-a1".to_string()]);
        assert_eq!(doc.device.name, "Smart Power qtpy-a1");
    }

    #[test]
    fn discovery_document_serializes() {
        let payload = DiscoveryDocument::from_settings(&settings()).to_payload();
        let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(value["schema"], "json");
        assert_eq!(value["brightness_scale"], 255);
        assert_eq!(value["device"]["manufacturer"], "Adafruit");
    }
}
