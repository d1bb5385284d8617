// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Calaos websocket protocol: wire frames and the transport client.
//!
//! - [`messages`] defines the JSON frames exchanged with the Calaos server
//! - [`WsClient`] owns the websocket connection and its reconnect loop
//! - [`Transport`] is the seam the session uses to talk to the wire,
//!   allowing tests to substitute a recording transport

mod messages;
mod ws;

pub use messages::{
    EventMessage, Frame, GetHomeRequest, HomeResponse, LoginRequest, LoginResponse, MSG_EVENT,
    MSG_GET_HOME, MSG_ID_GET_HOME, MSG_ID_LOGIN, MSG_ID_USER_CMD, MSG_LOGIN, MSG_SET_STATE,
    SetStateRequest, to_wire,
};
pub use ws::WsClient;

use crate::error::TransportError;

/// Trait for transports carrying Calaos wire frames.
///
/// Implemented by [`WsClient`]; the session is generic over this trait so
/// its handshake and dispatch logic can be tested against an in-memory
/// transport.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Sends one text frame upstream.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::NotConnected` when no live connection
    /// exists; other errors report a failed write, after which the
    /// transport self-heals in the background.
    async fn send(&self, frame: String) -> Result<(), TransportError>;

    /// Blocks until the next inbound text frame arrives.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` when the connection is lost; the transport
    /// self-heals in the background and the caller should wait for the
    /// next connected notification.
    async fn receive(&self) -> Result<String, TransportError>;

    /// Reports the current connection state without blocking.
    fn is_connected(&self) -> bool;
}
