// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Calaos Bridge - A Rust library bridging the Calaos home-automation
//! websocket API to smart-accessory adapters.
//!
//! The library keeps a set of accessory representations consistent with
//! the authoritative Calaos state, translates user-initiated accessory
//! changes back into Calaos wire commands, and survives transient network
//! loss without losing accessory identity.
//!
//! # What it does
//!
//! - **Resilient transport**: one websocket connection, retried forever
//!   with a fixed delay; every reconnect restarts the login handshake
//! - **Stable identity**: each Calaos device id maps to a stable 64-bit
//!   identifier, so pairing state survives process restarts
//! - **Per-kind adapters**: temperature, humidity, dimmable lights, and
//!   window coverings, each translating between Calaos' free-form state
//!   strings and typed, bounded values
//! - **Single-owner session**: the snapshot and the registry are owned by
//!   one session loop; adapters hand commands back over a channel
//!
//! # Supported device kinds
//!
//! | Calaos `gui_type` | Accessory |
//! |---|---|
//! | `temp` | temperature sensor (read-only) |
//! | `analog_in` + `io_style: humidity` | humidity sensor (read-only) |
//! | `light_dimmer` | dimmable light (brightness 0-100) |
//! | `light` (no style) | light switch (brightness derived 100/0) |
//! | `shutter_smart` | window covering (position + inversion) |
//!
//! # Quick Start
//!
//! The accessory-hosting layer (pairing, persistence, serving) stays
//! external; implement [`AccessoryHost`] to hand it the accessory list.
//!
//! ```no_run
//! use calaos_bridge::{AccessoryHandle, AccessoryHost, Configuration, Session, WsClient};
//!
//! struct PrintingHost;
//!
//! impl AccessoryHost for PrintingHost {
//!     fn register_accessories(
//!         &mut self,
//!         accessories: Vec<AccessoryHandle>,
//!     ) -> calaos_bridge::Result<()> {
//!         println!("serving {} accessories", accessories.len());
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> calaos_bridge::Result<()> {
//!     let config = Configuration::load("./config.json")?;
//!     let (client, connected) = WsClient::dial(config.websocket_uri());
//!     let (session, commands) = Session::new(
//!         client,
//!         PrintingHost,
//!         &config.websocket_server.user,
//!         &config.websocket_server.password,
//!     );
//!     session.run(connected, commands).await
//! }
//! ```

pub mod accessory;
mod config;
pub mod error;
pub mod home;
mod host;
pub mod ident;
pub mod protocol;
mod session;
pub mod types;

pub use accessory::{
    Accessory, AccessoryHandle, CommandIntent, DimmableLight, HumiditySensor, Shutter,
    TemperatureSensor,
};
pub use config::{Configuration, WebSocketConfig};
pub use error::{ConfigError, Error, ParseError, Result, TransportError, ValueError};
pub use home::{DeviceKind, DeviceRecord, DimmerMode, HomeSnapshot, Room};
pub use host::AccessoryHost;
pub use ident::hash_id;
pub use protocol::{Transport, WsClient};
pub use session::{Session, SessionState};
pub use types::{Brightness, Position, PositionState};
