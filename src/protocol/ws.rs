// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resilient websocket client for the Calaos server.
//!
//! The client owns exactly one connection at a time and retries forever
//! with a fixed delay between attempts; upstream sessions are not
//! resumable, so every successful (re)connect emits a notification that
//! restarts the login handshake from scratch. A failed send or receive
//! never propagates past the single failed call: the client closes the
//! broken connection and heals itself in the background.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::Transport;
use crate::error::TransportError;

/// Fixed delay between dial attempts. No backoff, no jitter: the
/// connection is essential and is retried forever.
const RECONNECT_DELAY: Duration = Duration::from_secs(10);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Writer = SplitSink<WsStream, Message>;
type Reader = SplitStream<WsStream>;

/// Websocket client with infinite fixed-delay reconnection.
///
/// Cloning is cheap and shares the underlying connection.
///
/// # Examples
///
/// ```no_run
/// use calaos_bridge::protocol::{Transport, WsClient};
///
/// # async fn example() -> Result<(), calaos_bridge::error::TransportError> {
/// let (client, mut connected) = WsClient::dial("ws://calaos.local:5454/api");
///
/// // One notification per successful (re)connect.
/// connected.recv().await;
/// client.send(r#"{"msg":"login","msg_id":"1","data":{}}"#.to_string()).await?;
/// let frame = client.receive().await?;
/// # let _ = frame;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WsClient {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    url: String,
    connected: AtomicBool,
    /// Guards against spawning a second reconnect loop while one is
    /// already dialing.
    reconnecting: AtomicBool,
    writer: Mutex<Option<Writer>>,
    reader: Mutex<Option<Reader>>,
    connected_tx: mpsc::UnboundedSender<()>,
}

impl WsClient {
    /// Starts dialing the given websocket URL in the background.
    ///
    /// Returns the client and a channel receiving one `()` per successful
    /// (re)connect. The first dial attempt happens asynchronously; until
    /// it succeeds, [`Transport::send`] and [`Transport::receive`] return
    /// `TransportError::NotConnected`.
    #[must_use]
    pub fn dial(url: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (connected_tx, connected_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            url: url.into(),
            connected: AtomicBool::new(false),
            reconnecting: AtomicBool::new(true),
            writer: Mutex::new(None),
            reader: Mutex::new(None),
            connected_tx,
        });

        tokio::spawn(connect_loop(Arc::clone(&shared)));

        (Self { shared }, connected_rx)
    }

    /// Closes the connection, sending a normal-closure frame first.
    ///
    /// Idempotent and safe to call multiple times. An explicit close does
    /// not trigger a reconnect; only send/receive failures do.
    pub async fn close(&self) {
        self.shared.connected.store(false, Ordering::SeqCst);
        if let Some(mut writer) = self.shared.writer.lock().await.take() {
            let close = Message::Close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "".into(),
            }));
            if let Err(error) = writer.send(close).await {
                tracing::debug!(%error, "close frame not delivered");
            }
        }
    }

    /// Closes the broken connection and restarts the dial loop in the
    /// background. No-op when a reconnect is already in flight.
    fn close_and_reconnect(&self) {
        if self.shared.reconnecting.swap(true, Ordering::SeqCst) {
            return;
        }
        let client = self.clone();
        tokio::spawn(async move {
            client.close().await;
            connect_loop(Arc::clone(&client.shared)).await;
        });
    }
}

impl Transport for WsClient {
    async fn send(&self, frame: String) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        let mut guard = self.shared.writer.lock().await;
        let Some(writer) = guard.as_mut() else {
            return Err(TransportError::NotConnected);
        };
        if let Err(error) = writer.send(Message::Text(frame)).await {
            *guard = None;
            drop(guard);
            tracing::warn!(%error, "websocket write failed, reconnecting");
            self.close_and_reconnect();
            return Err(TransportError::WebSocket(error));
        }
        Ok(())
    }

    async fn receive(&self) -> Result<String, TransportError> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected);
        }
        let mut guard = self.shared.reader.lock().await;
        let Some(reader) = guard.as_mut() else {
            return Err(TransportError::NotConnected);
        };
        loop {
            match reader.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Close(_))) | None => {
                    *guard = None;
                    drop(guard);
                    tracing::warn!("websocket closed by remote, reconnecting");
                    self.close_and_reconnect();
                    return Err(TransportError::ConnectionClosed);
                }
                // Ping/pong is answered by tungstenite itself; binary
                // frames are not part of the Calaos protocol.
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    *guard = None;
                    drop(guard);
                    tracing::warn!(%error, "websocket read failed, reconnecting");
                    self.close_and_reconnect();
                    return Err(TransportError::WebSocket(error));
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.shared.connected.load(Ordering::SeqCst)
    }
}

/// Dials until a connection is established, then publishes the halves and
/// notifies the session.
async fn connect_loop(shared: Arc<Shared>) {
    loop {
        match connect_async(shared.url.as_str()).await {
            Ok((stream, _response)) => {
                let (writer, reader) = stream.split();
                *shared.writer.lock().await = Some(writer);
                *shared.reader.lock().await = Some(reader);
                shared.connected.store(true, Ordering::SeqCst);
                shared.reconnecting.store(false, Ordering::SeqCst);
                tracing::info!(url = %shared.url, "websocket connected");
                if shared.connected_tx.send(()).is_err() {
                    tracing::debug!("connected notification dropped, session gone");
                }
                return;
            }
            Err(error) => {
                tracing::error!(%error, url = %shared.url, "websocket dial failed");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}
