// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end test against an in-process Calaos websocket server.
//!
//! The fake server speaks just enough of the protocol to drive a full
//! session: login handshake, home snapshot, one event push, and one
//! user-initiated shutter command on the reverse path.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use calaos_bridge::{
    Accessory, AccessoryHandle, AccessoryHost, Position, Session, WsClient, hash_id,
};

#[derive(Debug, Default)]
struct CapturingHost {
    accessories: Arc<Mutex<Vec<AccessoryHandle>>>,
}

impl AccessoryHost for CapturingHost {
    fn register_accessories(
        &mut self,
        accessories: Vec<AccessoryHandle>,
    ) -> calaos_bridge::Result<()> {
        *self.accessories.lock() = accessories;
        Ok(())
    }
}

fn snapshot_json() -> serde_json::Value {
    json!({"msg": "get_home", "msg_id": "2", "data": {
        "home": [{"name": "Living room", "type": "room", "hits": "0", "items": [
            {"id": "input_1", "name": "Temp", "gui_type": "temp",
             "io_type": "WITemp", "state": "20.5", "visible": "true"},
            {"id": "output_3", "name": "Shutter", "gui_type": "shutter_smart",
             "io_type": "WOVoletSmart", "state": "stop 30", "visible": "true"}
        ]}],
        "cameras": [], "audio": []
    }})
}

/// Accepts one connection and walks it through the whole protocol,
/// forwarding any `set_state` frame it receives to the test.
async fn fake_calaos_server(listener: TcpListener, set_state_tx: mpsc::UnboundedSender<serde_json::Value>) {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

    let login = ws.next().await.unwrap().unwrap();
    let login: serde_json::Value = serde_json::from_str(login.to_text().unwrap()).unwrap();
    assert_eq!(login["msg"], "login");
    assert_eq!(login["data"]["cn_user"], "user");

    let ack = json!({"msg": "login", "msg_id": "1", "data": {"success": "true"}});
    ws.send(Message::Text(ack.to_string())).await.unwrap();

    let get_home = ws.next().await.unwrap().unwrap();
    let get_home: serde_json::Value = serde_json::from_str(get_home.to_text().unwrap()).unwrap();
    assert_eq!(get_home["msg"], "get_home");

    ws.send(Message::Text(snapshot_json().to_string()))
        .await
        .unwrap();

    let event = json!({"msg": "event", "data": {
        "event_raw": "io changed", "type": "1", "type_str": "io_changed",
        "data": {"id": "input_1", "state": "23.5"}
    }});
    ws.send(Message::Text(event.to_string())).await.unwrap();

    // Reverse path: wait for the shutter command.
    while let Some(Ok(message)) = ws.next().await {
        if !message.is_text() {
            continue;
        }
        let frame: serde_json::Value = serde_json::from_str(message.to_text().unwrap()).unwrap();
        if frame["msg"] == "set_state" {
            set_state_tx.send(frame).unwrap();
            break;
        }
    }
}

async fn wait_for<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn full_session_round_trip() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (set_state_tx, mut set_state_rx) = mpsc::unbounded_channel();
    let server = tokio::spawn(fake_calaos_server(listener, set_state_tx));

    let host = CapturingHost::default();
    let accessories = Arc::clone(&host.accessories);

    let (client, connected) = WsClient::dial(format!("ws://{addr}"));
    let (session, commands) = Session::new(client, host, "user", "secret");
    let session_task = tokio::spawn(session.run(connected, commands));

    // The first snapshot registers both accessories with the host.
    wait_for(|| accessories.lock().len() == 2).await;

    // The pushed event reaches the temperature adapter.
    let temperature = accessories
        .lock()
        .iter()
        .find(|handle| handle.lock().id() == "input_1")
        .cloned()
        .unwrap();
    wait_for(|| {
        let guard = temperature.lock();
        let Accessory::Temperature(sensor) = &*guard else {
            panic!("expected temperature accessory");
        };
        (sensor.current_temperature() - 23.5).abs() < f64::EPSILON
    })
    .await;

    // Reverse path: a target-position change becomes an inverted
    // set_state command on the wire.
    let shutter = accessories
        .lock()
        .iter()
        .find(|handle| handle.lock().id() == "output_3")
        .cloned()
        .unwrap();
    {
        let mut guard = shutter.lock();
        let Accessory::WindowCovering(shutter) = &mut *guard else {
            panic!("expected window covering");
        };
        assert_eq!(shutter.current_position().value(), 70);
        shutter
            .set_target_position(Position::new(80).unwrap())
            .unwrap();
    }

    let frame = tokio::time::timeout(Duration::from_secs(5), set_state_rx.recv())
        .await
        .expect("set_state not received in time")
        .unwrap();
    assert_eq!(frame["data"]["id"], "output_3");
    assert_eq!(frame["data"]["value"], "set 20");

    // Identity is stable: registry keys are re-derivable from the id.
    assert_eq!(hash_id("input_1"), hash_id("input_1"));

    server.await.unwrap();
    session_task.abort();
}
