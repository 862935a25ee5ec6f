// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lamp actuator driver.
//!
//! The driver enacts physical effects only: it converts a brightness level
//! to a PWM duty cycle and maintains the dimming memory. The semantic
//! `power`/`brightness` fields stay with the command handler, which decides
//! what the state means before asking the driver to make it real.

use crate::hardware::PwmOutput;
use crate::state::LightState;
use crate::types::Brightness;

/// Drives the dimmable lamp output.
///
/// # Examples
///
/// ```
/// use lampion::actuator::LampDriver;
/// use lampion::hardware::LoggingPwm;
/// use lampion::state::LightState;
/// use lampion::types::Brightness;
///
/// let mut lamp = LampDriver::new(LoggingPwm::new());
/// let mut state = LightState::new();
///
/// lamp.set_level(&mut state, Brightness::new(128));
/// assert_eq!(state.last_nonzero(), Brightness::new(128));
///
/// lamp.set_level(&mut state, Brightness::MIN);
/// // Turning the output off leaves the memory intact.
/// assert_eq!(state.last_nonzero(), Brightness::new(128));
/// ```
#[derive(Debug)]
pub struct LampDriver<O> {
    output: O,
}

impl<O: PwmOutput> LampDriver<O> {
    /// Creates a driver over the given output.
    pub const fn new(output: O) -> Self {
        Self { output }
    }

    /// Drives the output at the given level and updates the dimming memory.
    ///
    /// A nonzero level is scaled proportionally onto the 16-bit duty range
    /// and recorded as the last lit level; zero drives the output fully off
    /// and records nothing.
    pub fn set_level(&mut self, state: &mut LightState, level: Brightness) {
        self.output.set_duty(level.as_duty());
        state.remember_level(level);
    }

    /// Returns the underlying output.
    pub fn output(&self) -> &O {
        &self.output
    }
}
