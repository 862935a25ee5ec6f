// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hardware seams for the lamp output and the indicator pixel.
//!
//! The controller never touches peripherals directly; it writes duty cycles
//! and colors through these traits. Writes are infallible at this layer:
//! a PWM register or LED strip write has no meaningful error path, and
//! treating it as fallible would only push dead error handling upward.
//!
//! [`LoggingPwm`] and [`LoggingPixel`] are host stand-ins that trace every
//! write, useful when running the controller against a real broker without
//! real hardware.

use crate::types::RgbColor;

/// A PWM-capable (or binary) lamp output.
///
/// Implementations map the 16-bit duty cycle onto whatever resolution the
/// hardware has; a binary output treats any nonzero duty as "on".
pub trait PwmOutput {
    /// Drives the output at the given duty cycle (0 = off, `u16::MAX` = full).
    fn set_duty(&mut self, duty: u16);
}

/// A single-pixel RGB output for the status indicator.
pub trait PixelWriter {
    /// Shows the given color on the pixel.
    fn write(&mut self, color: RgbColor);
}

/// Host stand-in for the lamp output: traces duty-cycle writes.
#[derive(Debug, Default)]
pub struct LoggingPwm {
    duty: u16,
}

impl LoggingPwm {
    /// Creates a new logging output, initially off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last duty cycle written.
    #[must_use]
    pub const fn duty(&self) -> u16 {
        self.duty
    }
}

impl PwmOutput for LoggingPwm {
    fn set_duty(&mut self, duty: u16) {
        self.duty = duty;
        tracing::debug!(duty, "lamp output");
    }
}

/// Host stand-in for the indicator pixel: traces color writes.
#[derive(Debug, Default)]
pub struct LoggingPixel {
    color: Option<RgbColor>,
}

impl LoggingPixel {
    /// Creates a new logging pixel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the last color written, if any.
    #[must_use]
    pub const fn color(&self) -> Option<RgbColor> {
        self.color
    }
}

impl PixelWriter for LoggingPixel {
    fn write(&mut self, color: RgbColor) {
        self.color = Some(color);
        tracing::trace!(%color, "indicator pixel");
    }
}
