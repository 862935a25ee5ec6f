// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state of the lamp output.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Represents the semantic power state of the lamp.
///
/// Note that the stored power state and the physical output can diverge in
/// one direction: `On` with a brightness of zero is dark but still reported
/// as `ON`. Only an explicit `OFF` command produces `Off`.
///
/// # Examples
///
/// ```
/// use lampion::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "ON");
/// assert_eq!("off".parse::<PowerState>().unwrap(), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerState {
    /// Power is on.
    On,
    /// Power is off.
    Off,
}

impl PowerState {
    /// Returns the wire representation used in command and state payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Returns `true` if the state is `On`.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ON" => Ok(Self::On),
            "OFF" => Ok(Self::Off),
            _ => Err(ParseError::UnknownToken(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_state_as_str() {
        assert_eq!(PowerState::On.as_str(), "ON");
        assert_eq!(PowerState::Off.as_str(), "OFF");
    }

    #[test]
    fn power_state_from_str_case_insensitive() {
        assert_eq!("ON".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("on".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("Off".parse::<PowerState>().unwrap(), PowerState::Off);
    }

    #[test]
    fn power_state_from_str_invalid() {
        let result = "toggle".parse::<PowerState>();
        assert!(matches!(result, Err(ParseError::UnknownToken(_))));
    }

    #[test]
    fn power_state_from_bool() {
        assert_eq!(PowerState::from(true), PowerState::On);
        assert_eq!(PowerState::from(false), PowerState::Off);
    }

    #[test]
    fn power_state_serde_uppercase() {
        let json = serde_json::to_string(&PowerState::On).unwrap();
        assert_eq!(json, "\"ON\"");
        let back: PowerState = serde_json::from_str("\"OFF\"").unwrap();
        assert_eq!(back, PowerState::Off);
    }
}
