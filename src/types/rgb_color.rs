// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type for the status indicator pixel.

use std::fmt;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use lampion::types::RgbColor;
///
/// let orange = RgbColor::new(255, 128, 0);
/// assert_eq!(orange.red(), 255);
/// assert_eq!(orange.to_string(), "#FF8000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Pure red.
    pub const RED: Self = Self::new(255, 0, 0);

    /// Pure green.
    pub const GREEN: Self = Self::new(0, 255, 0);

    /// Pure blue.
    pub const BLUE: Self = Self::new(0, 0, 255);

    /// Yellow (red + green).
    pub const YELLOW: Self = Self::new(255, 255, 0);

    /// Black (all channels off).
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}
