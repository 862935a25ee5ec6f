// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound command decoding and application.
//!
//! Payloads arrive on the command topic in one of two schemas, selected per
//! deployment: a JSON object with optional `state` and `brightness` keys, or
//! a bare `on`/`off` token. Decoding turns a payload into a [`Command`];
//! [`apply`] then mutates the [`LightState`] and drives the lamp. Decode
//! failures are reported to the caller, which logs and discards them; they
//! never mutate state and never trigger a publish.
//!
//! # Semantics
//!
//! The JSON schema follows the Home Assistant `light` JSON conventions:
//!
//! - `state: "OFF"` wins over any brightness field; the output goes dark and
//!   the stored level drops to 0 (the dimming memory survives).
//! - `state: "ON"` without a brightness restores the last nonzero level.
//! - `state: "ON"` with a brightness applies it, even zero. A zero level
//!   keeps `power = ON`, which is physically dark but reported as `ON` on
//!   the state topic; only an explicit `OFF` flips the power field.
//! - brightness alone applies the level and derives power from it.

use std::str::FromStr;

use serde::Deserialize;

use crate::actuator::LampDriver;
use crate::error::ParseError;
use crate::hardware::PwmOutput;
use crate::state::LightState;
use crate::types::{Brightness, PowerState};

/// Which payload schema the command topic speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSchema {
    /// JSON objects with `state` / `brightness` keys (the default).
    Json,
    /// Bare-string `on` / `off` tokens, no brightness concept.
    Plain,
}

impl FromStr for CommandSchema {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "plain" => Ok(Self::Plain),
            _ => Err(()),
        }
    }
}

/// A decoded state mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Set power, restoring the remembered level on `On`.
    SetPower(PowerState),
    /// Set an explicit level; power derives from it.
    SetLevel(Brightness),
    /// Set power and an explicit level together.
    SetPowerAndLevel(PowerState, Brightness),
}

/// Wire shape of the JSON command payload.
#[derive(Debug, Deserialize)]
struct JsonCommand {
    state: Option<String>,
    #[serde(alias = "level")]
    brightness: Option<serde_json::Value>,
}

/// Decodes a raw payload according to the given schema.
///
/// # Errors
///
/// Returns [`ParseError`] for malformed documents, unrecognized tokens,
/// out-of-range levels, and payloads carrying no recognized keys.
pub fn decode(payload: &[u8], schema: CommandSchema) -> Result<Command, ParseError> {
    match schema {
        CommandSchema::Json => decode_json(payload),
        CommandSchema::Plain => decode_plain(payload),
    }
}

fn decode_json(payload: &[u8]) -> Result<Command, ParseError> {
    let doc: JsonCommand = serde_json::from_slice(payload)?;

    let state = doc
        .state
        .as_deref()
        .map(PowerState::from_str)
        .transpose()?;
    let level = doc.brightness.as_ref().map(coerce_level).transpose()?;

    match (state, level) {
        (Some(PowerState::Off), _) => Ok(Command::SetPower(PowerState::Off)),
        (Some(PowerState::On), Some(level)) => {
            Ok(Command::SetPowerAndLevel(PowerState::On, level))
        }
        (Some(PowerState::On), None) => Ok(Command::SetPower(PowerState::On)),
        (None, Some(level)) => Ok(Command::SetLevel(level)),
        (None, None) => Err(ParseError::EmptyCommand),
    }
}

fn decode_plain(payload: &[u8]) -> Result<Command, ParseError> {
    let token = std::str::from_utf8(payload).map_err(|_| ParseError::NotUtf8)?;
    let state = token.trim().parse::<PowerState>()?;
    Ok(Command::SetPower(state))
}

/// Coerces a brightness field from a JSON number or numeric string.
fn coerce_level(value: &serde_json::Value) -> Result<Brightness, ParseError> {
    let raw = match value {
        serde_json::Value::Number(n) => n.as_i64().ok_or(ParseError::InvalidValue {
            field: "brightness",
            message: format!("not an integer: {n}"),
        })?,
        serde_json::Value::String(s) => {
            s.trim().parse::<i64>().map_err(|e| ParseError::InvalidValue {
                field: "brightness",
                message: e.to_string(),
            })?
        }
        other => {
            return Err(ParseError::InvalidValue {
                field: "brightness",
                message: format!("expected number or numeric string, got {other}"),
            });
        }
    };

    u8::try_from(raw)
        .map(Brightness::new)
        .map_err(|_| ParseError::InvalidValue {
            field: "brightness",
            message: format!("{raw} is out of range [0, 255]"),
        })
}

/// Applies a command to the lamp state and output.
///
/// Ordering matters for the state topic: the state is fully updated here,
/// before the caller publishes it.
pub fn apply<O: PwmOutput>(command: Command, state: &mut LightState, lamp: &mut LampDriver<O>) {
    match command {
        Command::SetPower(PowerState::Off) => {
            lamp.set_level(state, Brightness::MIN);
            state.set_power(PowerState::Off);
            state.set_brightness(Brightness::MIN);
        }
        Command::SetPower(PowerState::On) => {
            let level = state.last_nonzero();
            lamp.set_level(state, level);
            state.set_power(PowerState::On);
            state.set_brightness(level);
        }
        Command::SetLevel(level) => {
            lamp.set_level(state, level);
            state.set_power(PowerState::from(!level.is_off()));
            state.set_brightness(level);
        }
        Command::SetPowerAndLevel(power, level) => {
            // An explicit OFF forces the output dark regardless of the level.
            let level = if power.is_on() { level } else { Brightness::MIN };
            lamp.set_level(state, level);
            state.set_power(power);
            state.set_brightness(level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::LoggingPwm;

    fn fixture() -> (LightState, LampDriver<LoggingPwm>) {
        (LightState::new(), LampDriver::new(LoggingPwm::new()))
    }

    // ========== Decoding ==========

    #[test]
    fn decode_json_off_wins_over_brightness() {
        let cmd = decode(br#"{"state":"OFF","brightness":120}"#, CommandSchema::Json).unwrap();
        assert_eq!(cmd, Command::SetPower(PowerState::Off));
    }

    #[test]
    fn decode_json_on_without_level() {
        let cmd = decode(br#"{"state":"ON"}"#, CommandSchema::Json).unwrap();
        assert_eq!(cmd, Command::SetPower(PowerState::On));
    }

    #[test]
    fn decode_json_on_with_level() {
        let cmd = decode(br#"{"state":"ON","brightness":40}"#, CommandSchema::Json).unwrap();
        assert_eq!(
            cmd,
            Command::SetPowerAndLevel(PowerState::On, Brightness::new(40))
        );
    }

    #[test]
    fn decode_json_level_only() {
        let cmd = decode(br#"{"brightness":200}"#, CommandSchema::Json).unwrap();
        assert_eq!(cmd, Command::SetLevel(Brightness::new(200)));
    }

    #[test]
    fn decode_json_level_alias() {
        let cmd = decode(br#"{"level":10}"#, CommandSchema::Json).unwrap();
        assert_eq!(cmd, Command::SetLevel(Brightness::new(10)));
    }

    #[test]
    fn decode_json_numeric_string_level() {
        let cmd = decode(br#"{"brightness":"85"}"#, CommandSchema::Json).unwrap();
        assert_eq!(cmd, Command::SetLevel(Brightness::new(85)));
    }

    #[test]
    fn decode_json_level_out_of_range() {
        let result = decode(br#"{"brightness":300}"#, CommandSchema::Json);
        assert!(matches!(
            result,
            Err(ParseError::InvalidValue { field: "brightness", .. })
        ));
    }

    #[test]
    fn decode_json_negative_level() {
        let result = decode(br#"{"brightness":-1}"#, CommandSchema::Json);
        assert!(result.is_err());
    }

    #[test]
    fn decode_json_malformed_document() {
        let result = decode(b"{not json", CommandSchema::Json);
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn decode_json_no_recognized_keys() {
        let result = decode(br#"{"color":"red"}"#, CommandSchema::Json);
        assert!(matches!(result, Err(ParseError::EmptyCommand)));
    }

    #[test]
    fn decode_json_unknown_state_token() {
        let result = decode(br#"{"state":"TOGGLE"}"#, CommandSchema::Json);
        assert!(matches!(result, Err(ParseError::UnknownToken(_))));
    }

    #[test]
    fn decode_plain_tokens() {
        assert_eq!(
            decode(b"on", CommandSchema::Plain).unwrap(),
            Command::SetPower(PowerState::On)
        );
        assert_eq!(
            decode(b"OFF", CommandSchema::Plain).unwrap(),
            Command::SetPower(PowerState::Off)
        );
        assert_eq!(
            decode(b" On \n", CommandSchema::Plain).unwrap(),
            Command::SetPower(PowerState::On)
        );
    }

    #[test]
    fn decode_plain_unknown_token() {
        assert!(matches!(
            decode(b"dim", CommandSchema::Plain),
            Err(ParseError::UnknownToken(_))
        ));
    }

    // ========== Application ==========

    #[test]
    fn off_is_idempotent_and_keeps_memory() {
        let (mut state, mut lamp) = fixture();
        apply(
            Command::SetPowerAndLevel(PowerState::On, Brightness::new(180)),
            &mut state,
            &mut lamp,
        );

        for _ in 0..3 {
            apply(Command::SetPower(PowerState::Off), &mut state, &mut lamp);
            assert_eq!(state.power(), PowerState::Off);
            assert_eq!(state.brightness(), Brightness::MIN);
            assert_eq!(state.last_nonzero(), Brightness::new(180));
            assert_eq!(lamp.output().duty(), 0);
        }
    }

    #[test]
    fn brightness_memory_round_trip() {
        let (mut state, mut lamp) = fixture();
        apply(
            Command::SetPowerAndLevel(PowerState::On, Brightness::new(180)),
            &mut state,
            &mut lamp,
        );
        apply(Command::SetPower(PowerState::Off), &mut state, &mut lamp);
        apply(Command::SetPower(PowerState::On), &mut state, &mut lamp);

        assert_eq!(state.power(), PowerState::On);
        assert_eq!(state.brightness(), Brightness::new(180));
        assert_eq!(lamp.output().duty(), Brightness::new(180).as_duty());
    }

    #[test]
    fn explicit_level_overrides_memory() {
        let (mut state, mut lamp) = fixture();
        apply(
            Command::SetPowerAndLevel(PowerState::On, Brightness::new(180)),
            &mut state,
            &mut lamp,
        );
        apply(
            Command::SetPowerAndLevel(PowerState::On, Brightness::new(40)),
            &mut state,
            &mut lamp,
        );

        assert_eq!(state.brightness(), Brightness::new(40));
        assert_eq!(state.last_nonzero(), Brightness::new(40));
    }

    #[test]
    fn on_with_zero_level_stays_on() {
        // `{"state":"ON","brightness":0}` is dark but semantically ON; the
        // state topic reports it that way. Only an explicit OFF flips power.
        let (mut state, mut lamp) = fixture();
        apply(
            Command::SetPowerAndLevel(PowerState::On, Brightness::MIN),
            &mut state,
            &mut lamp,
        );

        assert_eq!(state.power(), PowerState::On);
        assert_eq!(state.brightness(), Brightness::MIN);
        assert_eq!(lamp.output().duty(), 0);
    }

    #[test]
    fn level_only_derives_power() {
        let (mut state, mut lamp) = fixture();
        apply(Command::SetLevel(Brightness::new(99)), &mut state, &mut lamp);
        assert_eq!(state.power(), PowerState::On);

        apply(Command::SetLevel(Brightness::MIN), &mut state, &mut lamp);
        assert_eq!(state.power(), PowerState::Off);
        assert_eq!(state.brightness(), Brightness::MIN);
    }

    #[test]
    fn off_with_level_forces_dark() {
        let (mut state, mut lamp) = fixture();
        apply(
            Command::SetPowerAndLevel(PowerState::Off, Brightness::new(120)),
            &mut state,
            &mut lamp,
        );
        assert_eq!(state.power(), PowerState::Off);
        assert_eq!(state.brightness(), Brightness::MIN);
        assert_eq!(lamp.output().duty(), 0);
    }
}
