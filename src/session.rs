// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session state machine driving the Calaos handshake and dispatch.
//!
//! The session owns the home snapshot, the accessory registry, and the
//! send path. Inbound frames are processed strictly in arrival order on
//! one loop; user-initiated commands from the adapters arrive on the
//! command channel and are serialized onto the same loop, so shared state
//! is never mutated from two tasks.
//!
//! Lifecycle: on every (re)connect the login handshake restarts from
//! scratch (upstream sessions are not resumable). The registry, however,
//! is built only on the first non-empty snapshot of a hosting session;
//! later snapshots update the existing adapters in place because the
//! hosting layer must never see an accessory change identity while it is
//! serving.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::accessory::{Accessory, AccessoryHandle, CommandIntent, CommandReceiver, CommandSender};
use crate::error::{Error, Result};
use crate::home::HomeSnapshot;
use crate::host::AccessoryHost;
use crate::ident::hash_id;
use crate::protocol::{
    EventMessage, Frame, GetHomeRequest, HomeResponse, LoginRequest, LoginResponse,
    SetStateRequest, Transport, to_wire,
};

/// State of the upstream session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No live connection.
    Disconnected,
    /// The transport is dialing.
    Connecting,
    /// Login request sent, waiting for the acknowledgement.
    AwaitingLoginAck,
    /// Credentials accepted.
    LoggedIn,
    /// Home snapshot requested, waiting for the response.
    AwaitingHomeSnapshot,
    /// Registry populated and the hosting layer serving.
    Active,
}

/// The Calaos session: handshake, registry, and dispatch.
///
/// Generic over [`Transport`] so the protocol logic can be exercised
/// against an in-memory transport, and over [`AccessoryHost`] so the
/// pairing/serving layer stays an external collaborator.
pub struct Session<T, H> {
    transport: T,
    host: H,
    user: String,
    password: String,
    state: SessionState,
    logged_in: bool,
    serving: bool,
    home: HomeSnapshot,
    registry: HashMap<u64, AccessoryHandle>,
    commands_tx: CommandSender,
}

impl<T, H> Session<T, H>
where
    T: Transport + Clone,
    H: AccessoryHost,
{
    /// Creates a session with the given transport, hosting collaborator,
    /// and Calaos credentials.
    ///
    /// Returns the session and the command receiver to pass to
    /// [`Session::run`].
    pub fn new(
        transport: T,
        host: H,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> (Self, CommandReceiver) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let session = Self {
            transport,
            host,
            user: user.into(),
            password: password.into(),
            state: SessionState::Disconnected,
            logged_in: false,
            serving: false,
            home: HomeSnapshot::default(),
            registry: HashMap::new(),
            commands_tx,
        };
        (session, commands_rx)
    }

    /// Returns the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the number of registered accessories.
    #[must_use]
    pub fn accessory_count(&self) -> usize {
        self.registry.len()
    }

    /// Looks up a registered accessory by its numeric identifier.
    #[must_use]
    pub fn accessory(&self, id: u64) -> Option<AccessoryHandle> {
        self.registry.get(&id).cloned()
    }

    /// Drives the session until the transport's connected channel closes.
    ///
    /// `connected` delivers one `()` per successful (re)connect; each one
    /// restarts the login handshake. `commands` carries the adapters'
    /// user-initiated intents onto this loop.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures outside the retry policy, such
    /// as a request that cannot be serialized. Transport failures are
    /// absorbed: the session parks until the next reconnect.
    pub async fn run(
        mut self,
        mut connected: mpsc::UnboundedReceiver<()>,
        mut commands: CommandReceiver,
    ) -> Result<()> {
        let transport = self.transport.clone();
        while connected.recv().await.is_some() {
            if let Err(error) = self.on_connected().await {
                tracing::error!(%error, "login request failed, waiting for reconnect");
                self.state = SessionState::Disconnected;
                continue;
            }
            loop {
                tokio::select! {
                    frame = transport.receive() => match frame {
                        Ok(text) => self.handle_frame(&text).await,
                        Err(error) => {
                            tracing::debug!(%error, "read failed, waiting for reconnect");
                            self.logged_in = false;
                            self.state = SessionState::Disconnected;
                            break;
                        }
                    },
                    // commands_tx is held by the session itself, so this
                    // channel can never close while the loop runs.
                    Some(intent) = commands.recv() => self.send_command(intent).await,
                }
            }
        }
        Ok(())
    }

    /// Restarts the handshake after a (re)connect.
    async fn on_connected(&mut self) -> Result<()> {
        self.state = SessionState::Connecting;
        self.logged_in = false;
        let login = to_wire(&LoginRequest::new(&self.user, &self.password))?;
        self.transport
            .send(login)
            .await
            .map_err(Error::Transport)?;
        self.state = SessionState::AwaitingLoginAck;
        tracing::debug!("login request sent");
        Ok(())
    }

    /// Classifies and dispatches one inbound frame.
    ///
    /// Malformed frames are logged and dropped; they never change state.
    /// Snapshot and event frames are only interpreted while logged in.
    async fn handle_frame(&mut self, text: &str) {
        let frame = match Frame::parse(text) {
            Ok(frame) => frame,
            Err(error) => {
                tracing::warn!(%error, "dropping unparseable frame");
                return;
            }
        };

        match frame {
            Frame::Login(login) => self.handle_login(login).await,
            Frame::Home(home) if self.logged_in => self.handle_home(home),
            Frame::Event(event) if self.logged_in => self.handle_event(event),
            Frame::Home(_) | Frame::Event(_) => {
                tracing::debug!("dropping frame received while logged out");
            }
            Frame::Other(msg) => {
                tracing::debug!(msg, "ignoring unclassified frame");
            }
        }
    }

    /// Handles the login acknowledgement; on success immediately requests
    /// the home snapshot.
    async fn handle_login(&mut self, login: LoginResponse) {
        if !login.succeeded() {
            // Parked logged-out; the next reconnect retries the login.
            self.logged_in = false;
            tracing::warn!("login refused by upstream");
            return;
        }

        self.logged_in = true;
        self.state = SessionState::LoggedIn;
        tracing::info!("logged in");

        let request = match to_wire(&GetHomeRequest::new()) {
            Ok(request) => request,
            Err(error) => {
                tracing::error!(%error, "failed to encode get_home request");
                return;
            }
        };
        match self.transport.send(request).await {
            Ok(()) => self.state = SessionState::AwaitingHomeSnapshot,
            Err(error) => {
                tracing::warn!(%error, "get_home request not sent, transport will recover");
            }
        }
    }

    /// Handles a full home snapshot.
    ///
    /// The first non-empty snapshot of a hosting session builds the
    /// registry and starts the host; every later snapshot only updates
    /// existing adapters in place, keyed by re-hashing each device id.
    /// Devices absent from the registry are skipped silently: accessory
    /// identity must not change while a hosting session is live.
    fn handle_home(&mut self, home: HomeResponse) {
        let snapshot = HomeSnapshot::new(home.into_rooms());
        if snapshot.is_empty() {
            tracing::warn!("home snapshot has no rooms, ignoring");
            return;
        }
        self.home = snapshot;

        if self.serving {
            self.refresh_accessories();
            self.state = SessionState::Active;
            return;
        }

        self.build_registry();
        if self.registry.is_empty() {
            tracing::warn!("no supported accessories in snapshot");
            return;
        }

        let handles: Vec<AccessoryHandle> = self.registry.values().map(Arc::clone).collect();
        let count = handles.len();
        match self.host.register_accessories(handles) {
            Ok(()) => {
                self.serving = true;
                self.state = SessionState::Active;
                tracing::info!(count, "hosting layer serving accessories");
            }
            Err(error) => {
                // Retry with a clean build on the next snapshot.
                self.registry.clear();
                tracing::error!(%error, "hosting layer failed to start");
            }
        }
    }

    /// Builds one adapter per visible, supported device record.
    fn build_registry(&mut self) {
        self.registry.clear();
        for record in self.home.devices() {
            if !record.is_visible() {
                continue;
            }
            if let Some(accessory) = Accessory::from_record(record, &self.commands_tx) {
                self.registry
                    .insert(hash_id(&record.id), Arc::new(Mutex::new(accessory)));
            }
        }
    }

    /// Pushes the snapshot's states into the existing adapters.
    fn refresh_accessories(&mut self) {
        for record in self.home.devices() {
            let Some(handle) = self.registry.get(&hash_id(&record.id)) else {
                continue;
            };
            if let Err(error) = handle.lock().update(record) {
                tracing::debug!(id = %record.id, %error, "snapshot state not decodable");
            }
        }
    }

    /// Handles a single-device state change.
    ///
    /// Unknown device ids are ignored by design, not an error.
    fn handle_event(&mut self, event: EventMessage) {
        let (id, state) = event.into_parts();
        let Some(record) = self.home.device_by_id_mut(&id) else {
            tracing::debug!(%id, "event for unknown device, ignoring");
            return;
        };
        record.state = state;
        let record = record.clone();

        let Some(handle) = self.registry.get(&hash_id(&record.id)) else {
            return;
        };
        if let Err(error) = handle.lock().update(&record) {
            tracing::debug!(id = %record.id, %error, "event state not decodable");
        }
    }

    /// Sends one user-initiated command upstream.
    ///
    /// This is the only path by which the session initiates outbound
    /// traffic after the handshake.
    async fn send_command(&mut self, intent: CommandIntent) {
        let request = match to_wire(&SetStateRequest::new(&intent.id, &intent.value)) {
            Ok(request) => request,
            Err(error) => {
                tracing::error!(%error, "failed to encode set_state request");
                return;
            }
        };
        tracing::debug!(id = %intent.id, value = %intent.value, "sending set_state");
        if let Err(error) = self.transport.send(request).await {
            tracing::warn!(%error, "set_state not sent, transport will recover");
        }
    }
}
