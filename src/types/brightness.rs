// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for the dimmable lamp output.
//!
//! Brightness uses the Home Assistant light scale of 0-255, which happens to
//! cover the full `u8` range, so construction is infallible. Range checking
//! happens at the payload decoding boundary instead.

use std::fmt;

/// Brightness level on the 0-255 scale.
///
/// # Examples
///
/// ```
/// use lampion::types::Brightness;
///
/// let half = Brightness::new(128);
/// assert_eq!(half.value(), 128);
/// assert!(!half.is_off());
///
/// // Scales proportionally to the 16-bit PWM duty range
/// assert_eq!(Brightness::MAX.as_duty(), u16::MAX);
/// assert_eq!(Brightness::MIN.as_duty(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Fully off (0).
    pub const MIN: Self = Self(0);

    /// Full brightness (255).
    pub const MAX: Self = Self(255);

    /// Creates a new brightness value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw 0-255 value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` if this level produces no light.
    #[must_use]
    pub const fn is_off(&self) -> bool {
        self.0 == 0
    }

    /// Scales the level to a 16-bit PWM duty cycle.
    ///
    /// 255 maps to exactly `u16::MAX` so full brightness is a fully-on duty
    /// cycle, with intermediate values spread proportionally.
    #[must_use]
    pub const fn as_duty(&self) -> u16 {
        // 257 = 65535 / 255, so the scaling is exact at both endpoints.
        self.0 as u16 * 257
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/255", self.0)
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl From<Brightness> for u8 {
    fn from(value: Brightness) -> Self {
        value.0
    }
}
