// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT transport using mockforge-mqtt.

use std::time::Duration;

use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use tokio::time::sleep;

use lampion::protocol::{MqttTransport, Transport};

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind and be ready to accept connections.
    sleep(Duration::from_millis(500)).await;
}

#[tokio::test]
async fn connect_to_broker() {
    let port = get_test_port();
    start_mock_broker(port).await;

    let mut transport = MqttTransport::with_address("127.0.0.1", port, "lampion_test_connect");
    let result = transport.connect().await;

    assert!(result.is_ok(), "failed to connect: {:?}", result.err());
}

#[tokio::test]
async fn connect_via_broker_url() {
    let port = get_test_port();
    start_mock_broker(port).await;

    let url = format!("mqtt://127.0.0.1:{port}");
    let mut transport = MqttTransport::from_url(&url, "lampion_test_url").unwrap();
    let result = transport.connect().await;

    assert!(result.is_ok(), "failed to connect: {:?}", result.err());
}

#[tokio::test]
async fn connect_refused_without_broker() {
    // Nothing listens on this port; the session deadline must fire or the
    // connection must be refused, either way an error.
    let mut transport = MqttTransport::with_address("127.0.0.1", 18949, "lampion_test_refused");
    let result = transport.connect().await;

    assert!(result.is_err());
}

#[tokio::test]
async fn subscribe_and_publish_after_connect() {
    let port = get_test_port();
    start_mock_broker(port).await;

    let mut transport = MqttTransport::with_address("127.0.0.1", port, "lampion_test_pubsub");
    transport.connect().await.unwrap();

    transport
        .subscribe("home/light/test/set")
        .await
        .expect("subscribe should queue");
    transport
        .publish(
            "home/light/test/state",
            br#"{"state":"ON","brightness":255}"#.to_vec(),
            false,
        )
        .await
        .expect("publish should queue");

    // Pump the event loop so the queued requests actually reach the broker.
    for _ in 0..5 {
        let outcome = transport.poll(Duration::from_millis(200)).await;
        assert!(outcome.is_ok(), "poll failed: {:?}", outcome.err());
    }
}

#[tokio::test]
async fn retained_publish_is_accepted() {
    let port = get_test_port();
    start_mock_broker(port).await;

    let mut transport = MqttTransport::with_address("127.0.0.1", port, "lampion_test_retain");
    transport.connect().await.unwrap();

    transport
        .publish(
            "homeassistant/light/test/config",
            br#"{"schema":"json"}"#.to_vec(),
            true,
        )
        .await
        .expect("retained publish should queue");

    for _ in 0..5 {
        assert!(transport.poll(Duration::from_millis(200)).await.is_ok());
    }
}
