// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status indicator pixel.
//!
//! The single pixel carries two kinds of output: a fixed color per lifecycle
//! phase during startup and recovery, and a continuous color-wheel animation
//! advanced once per loop tick while the controller is in the ready state.
//! Boards without the pixel run with the indicator disabled; every call is
//! then a no-op.

use crate::hardware::PixelWriter;
use crate::types::RgbColor;

/// Coarse lifecycle stage, each mapped to a fixed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Powering up, actuators at defaults.
    Initializing,
    /// Waiting for network association.
    Connecting,
    /// Establishing the broker session and subscriptions.
    BrokerSetup,
    /// Steady-state operation.
    Ready,
    /// A transport failure is being recovered.
    Error,
}

impl Phase {
    /// Returns the fixed indicator color for this phase.
    #[must_use]
    pub const fn color(&self) -> RgbColor {
        match self {
            Self::Initializing | Self::Error => RgbColor::RED,
            Self::Connecting => RgbColor::YELLOW,
            Self::BrokerSetup => RgbColor::BLUE,
            Self::Ready => RgbColor::GREEN,
        }
    }
}

/// Computes one step of the color-wheel animation.
///
/// The wheel rotates red -> green -> blue -> red across the 0-255 domain in
/// three 85-wide segments, interpolating linearly within each.
///
/// # Examples
///
/// ```
/// use lampion::indicator::wheel;
/// use lampion::types::RgbColor;
///
/// assert_eq!(wheel(0), RgbColor::new(255, 0, 0));
/// assert_eq!(wheel(85), RgbColor::new(0, 255, 0));
/// assert_eq!(wheel(170), RgbColor::new(0, 0, 255));
/// ```
#[must_use]
pub const fn wheel(position: u8) -> RgbColor {
    if position < 85 {
        RgbColor::new(255 - position * 3, position * 3, 0)
    } else if position < 170 {
        let p = position - 85;
        RgbColor::new(0, 255 - p * 3, p * 3)
    } else {
        let p = position - 170;
        RgbColor::new(p * 3, 0, 255 - p * 3)
    }
}

/// Drives the status pixel through phases and the ready animation.
///
/// # Examples
///
/// ```
/// use lampion::hardware::LoggingPixel;
/// use lampion::indicator::{Phase, StatusIndicator};
///
/// let mut indicator = StatusIndicator::new(Some(LoggingPixel::new()));
/// indicator.set_phase(Phase::Connecting);
/// indicator.animate_tick();
/// assert_eq!(indicator.position(), 1);
/// ```
#[derive(Debug)]
pub struct StatusIndicator<P> {
    pixel: Option<P>,
    position: u8,
}

impl<P: PixelWriter> StatusIndicator<P> {
    /// Creates an indicator; `None` disables all output.
    pub const fn new(pixel: Option<P>) -> Self {
        Self { pixel, position: 0 }
    }

    /// Shows the fixed color for a lifecycle phase.
    pub fn set_phase(&mut self, phase: Phase) {
        if let Some(pixel) = &mut self.pixel {
            pixel.write(phase.color());
        }
    }

    /// Advances the ready-state animation by one step.
    pub fn animate_tick(&mut self) {
        if let Some(pixel) = &mut self.pixel {
            pixel.write(wheel(self.position));
            self.position = self.position.wrapping_add(1);
        }
    }

    /// Returns the current animation position.
    #[must_use]
    pub const fn position(&self) -> u8 {
        self.position
    }

    /// Returns the pixel, if fitted.
    pub fn pixel(&self) -> Option<&P> {
        self.pixel.as_ref()
    }
}
