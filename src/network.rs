// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Network association seam.
//!
//! WiFi join is an external collaborator: the supervisor only needs a
//! blocking "associate with these credentials" call during startup. There is
//! deliberately no timeout or retry policy at this layer; wrong credentials
//! hang or fail the process on first boot, which is surfaced to the operator
//! by the indicator staying on the connecting color.

use crate::error::ProtocolError;

/// Associates the device with a network.
#[allow(async_fn_in_trait)]
pub trait NetworkLink {
    /// Joins the network with the given credentials, blocking until the
    /// association succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if association fails; this is fatal during startup.
    async fn join(&mut self, ssid: &str, password: &str) -> Result<(), ProtocolError>;
}

/// Network link for hosts whose OS already manages connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostNetwork;

impl NetworkLink for HostNetwork {
    async fn join(&mut self, ssid: &str, _password: &str) -> Result<(), ProtocolError> {
        tracing::info!(ssid, "network managed by host OS, skipping join");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn host_network_always_joins() {
        let mut link = HostNetwork;
        assert!(link.join("shipnet", "hunter2").await.is_ok());
    }
}
