// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory model of the Calaos home.
//!
//! A [`HomeSnapshot`] is the full set of rooms and device records last
//! received from upstream. It is replaced wholesale on each `get_home`
//! response and serves as the source of truth for reverse lookups by
//! device id; individual records are mutated in place when an event
//! targets them.

use serde::{Deserialize, Serialize};

/// Calaos GUI type for temperature sensors.
pub const GUI_TYPE_TEMP: &str = "temp";
/// Calaos GUI type for analog inputs.
pub const GUI_TYPE_ANALOG_IN: &str = "analog_in";
/// Calaos GUI type for dimmable lights.
pub const GUI_TYPE_LIGHT_DIMMER: &str = "light_dimmer";
/// Calaos GUI type for plain on/off lights.
pub const GUI_TYPE_LIGHT: &str = "light";
/// Calaos GUI type for position-aware shutters.
pub const GUI_TYPE_SHUTTER_SMART: &str = "shutter_smart";

/// Calaos IO style marking an analog input as a humidity sensor.
pub const IO_STYLE_HUMIDITY: &str = "humidity";

/// Calaos boolean-as-string for hidden devices.
const VISIBLE_FALSE: &str = "false";

/// The kind of accessory a device record maps to.
///
/// Derived from the record's `gui_type` and `io_style` discriminators.
/// Unsupported combinations classify as [`DeviceKind::Other`] and are
/// excluded from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    /// Read-only temperature sensor.
    Temperature,
    /// Read-only relative-humidity sensor.
    Humidity,
    /// Dimmable or switchable light.
    DimmableLight {
        /// How the light encodes its state on the wire.
        mode: DimmerMode,
    },
    /// Position-aware window covering.
    WindowCovering,
    /// Unsupported device kind.
    Other,
}

/// Wire encoding used by a dimmable light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerMode {
    /// State is an integer brightness 0-100.
    Brightness,
    /// State is a boolean string; brightness is derived as 100/0.
    Switch,
}

/// One addressable Calaos IO point as reported by `get_home`.
///
/// The `state` field is a free-form string whose interpretation is
/// kind-dependent; the accessory adapters own the decoding rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Opaque upstream device id, unique across the snapshot.
    pub id: String,
    /// Human-readable device name.
    #[serde(default)]
    pub name: String,
    /// Primary kind discriminator.
    #[serde(default)]
    pub gui_type: String,
    /// Upstream IO type (used as the accessory model string).
    #[serde(default)]
    pub io_type: String,
    /// Secondary kind discriminator.
    #[serde(default)]
    pub io_style: String,
    /// Free-form state encoding.
    #[serde(default)]
    pub state: String,
    /// Boolean-as-string; `"false"` excludes the device from the registry.
    #[serde(default)]
    pub visible: String,
    /// Upstream variable type.
    #[serde(default)]
    pub var_type: String,
    /// Upstream device type.
    #[serde(default, rename = "type")]
    pub device_type: String,
    /// Read/write capability flag.
    #[serde(default)]
    pub rw: String,
}

impl DeviceRecord {
    /// Returns `true` unless the record is explicitly marked not-visible.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible != VISIBLE_FALSE
    }

    /// Classifies the record into an accessory kind.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        match self.gui_type.as_str() {
            GUI_TYPE_TEMP => DeviceKind::Temperature,
            GUI_TYPE_ANALOG_IN if self.io_style == IO_STYLE_HUMIDITY => DeviceKind::Humidity,
            GUI_TYPE_LIGHT_DIMMER => DeviceKind::DimmableLight {
                mode: DimmerMode::Brightness,
            },
            GUI_TYPE_LIGHT if self.io_style.is_empty() => DeviceKind::DimmableLight {
                mode: DimmerMode::Switch,
            },
            GUI_TYPE_SHUTTER_SMART => DeviceKind::WindowCovering,
            _ => DeviceKind::Other,
        }
    }
}

/// One Calaos room: an ordered collection of device records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Room {
    /// Room name.
    #[serde(default)]
    pub name: String,
    /// Room type.
    #[serde(default, rename = "type")]
    pub room_type: String,
    /// Upstream sort hint.
    #[serde(default)]
    pub hits: String,
    /// Device records in this room.
    #[serde(default, rename = "items")]
    pub devices: Vec<DeviceRecord>,
}

/// The full home snapshot: an ordered collection of rooms.
///
/// Device ids are unique across the whole snapshot.
#[derive(Debug, Clone, Default)]
pub struct HomeSnapshot {
    rooms: Vec<Room>,
}

impl HomeSnapshot {
    /// Creates a snapshot from the rooms of a `get_home` response.
    #[must_use]
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// Returns `true` if the snapshot contains no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Returns the rooms of the snapshot.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Iterates over every device record in the snapshot, in room order.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceRecord> {
        self.rooms.iter().flat_map(|room| room.devices.iter())
    }

    /// Looks up a device record by upstream id.
    #[must_use]
    pub fn device_by_id(&self, id: &str) -> Option<&DeviceRecord> {
        self.devices().find(|device| device.id == id)
    }

    /// Looks up a device record by upstream id for in-place mutation.
    pub fn device_by_id_mut(&mut self, id: &str) -> Option<&mut DeviceRecord> {
        self.rooms
            .iter_mut()
            .flat_map(|room| room.devices.iter_mut())
            .find(|device| device.id == id)
    }

    /// Returns the name of a device, if present in the snapshot.
    #[must_use]
    pub fn device_name(&self, id: &str) -> Option<&str> {
        self.device_by_id(id).map(|device| device.name.as_str())
    }
}
