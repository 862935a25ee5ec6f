// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical in-memory lamp state.

use crate::types::{Brightness, PowerState};

/// The single source of truth for the lamp output.
///
/// Owned by the supervisor and passed by reference to the command handler
/// and the state reporter; nothing else mutates it. There is no persistence:
/// a power cycle resets to the default of `{ON, 255}`.
///
/// Two invariants hold at all times:
///
/// - `power == Off` means the physical output is dark regardless of the
///   stored `brightness`, which is retained as dimming memory.
/// - `last_nonzero` always holds the most recent brightness greater than
///   zero, so a bare `ON` command can restore the previous dimming level.
///
/// # Examples
///
/// ```
/// use lampion::state::LightState;
/// use lampion::types::{Brightness, PowerState};
///
/// let state = LightState::new();
/// assert_eq!(state.power(), PowerState::On);
/// assert_eq!(state.brightness(), Brightness::MAX);
/// assert_eq!(state.last_nonzero(), Brightness::MAX);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightState {
    power: PowerState,
    brightness: Brightness,
    last_nonzero: Brightness,
}

impl LightState {
    /// Creates the startup state: on, full brightness.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            power: PowerState::On,
            brightness: Brightness::MAX,
            last_nonzero: Brightness::MAX,
        }
    }

    /// Returns the semantic power state.
    #[must_use]
    pub const fn power(&self) -> PowerState {
        self.power
    }

    /// Returns the stored brightness level.
    #[must_use]
    pub const fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Returns the most recent nonzero brightness.
    #[must_use]
    pub const fn last_nonzero(&self) -> Brightness {
        self.last_nonzero
    }

    /// Sets the semantic power state.
    pub fn set_power(&mut self, power: PowerState) {
        self.power = power;
    }

    /// Sets the stored brightness level.
    pub fn set_brightness(&mut self, level: Brightness) {
        self.brightness = level;
    }

    /// Records a level in the dimming memory.
    ///
    /// Zero is ignored so the memory always holds a level that produces
    /// light; turning the lamp off must not erase it.
    pub fn remember_level(&mut self, level: Brightness) {
        if !level.is_off() {
            self.last_nonzero = level;
        }
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_state_is_on_full() {
        let state = LightState::new();
        assert_eq!(state.power(), PowerState::On);
        assert_eq!(state.brightness(), Brightness::MAX);
        assert_eq!(state.last_nonzero(), Brightness::MAX);
    }

    #[test]
    fn remember_level_keeps_nonzero() {
        let mut state = LightState::new();
        state.remember_level(Brightness::new(180));
        assert_eq!(state.last_nonzero(), Brightness::new(180));
    }

    #[test]
    fn remember_level_ignores_zero() {
        let mut state = LightState::new();
        state.remember_level(Brightness::new(90));
        state.remember_level(Brightness::MIN);
        assert_eq!(state.last_nonzero(), Brightness::new(90));
    }

    #[test]
    fn off_retains_brightness_memory() {
        let mut state = LightState::new();
        state.remember_level(Brightness::new(42));
        state.set_power(PowerState::Off);
        state.set_brightness(Brightness::MIN);
        assert_eq!(state.last_nonzero(), Brightness::new(42));
    }
}
