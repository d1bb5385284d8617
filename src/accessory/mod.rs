// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory adapters: per-device-kind translators between Calaos wire
//! state and normalized observable values.
//!
//! Each supported device kind has one adapter type; [`Accessory`] is the
//! tagged variant the registry stores, so adding a kind means adding one
//! variant and one arm in [`Accessory::from_record`]. Writable adapters
//! never talk to the transport directly: they emit a [`CommandIntent`]
//! over a channel and the session's command pump performs the send.

mod dimmer;
mod humidity;
mod shutter;
mod temperature;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

pub use dimmer::DimmableLight;
pub use humidity::HumiditySensor;
pub use shutter::Shutter;
pub use temperature::TemperatureSensor;

use crate::error::ValueError;
use crate::home::{DeviceKind, DeviceRecord};

/// A user-initiated device command: `(device id, wire value)`.
///
/// Emitted by writable adapters; applied and sent by a single owner so
/// that no device record is ever mutated from two tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandIntent {
    /// Upstream device id to command.
    pub id: String,
    /// Wire value for the `set_state` frame.
    pub value: String,
}

/// Sending half of the command-intent channel, cloned into each writable
/// adapter.
pub type CommandSender = mpsc::UnboundedSender<CommandIntent>;

/// Receiving half of the command-intent channel, drained by the session.
pub type CommandReceiver = mpsc::UnboundedReceiver<CommandIntent>;

/// A shared, lockable accessory.
///
/// The registry and the hosting layer hold clones of the same handle; the
/// mutex serializes inbound `update` calls against the hosting layer's
/// reads and reverse updates.
pub type AccessoryHandle = Arc<Mutex<Accessory>>;

/// One registered accessory of any supported kind.
#[derive(Debug)]
pub enum Accessory {
    /// Read-only temperature sensor.
    Temperature(TemperatureSensor),
    /// Read-only humidity sensor.
    Humidity(HumiditySensor),
    /// Dimmable or switchable light.
    Dimmer(DimmableLight),
    /// Position-aware window covering.
    WindowCovering(Shutter),
}

impl Accessory {
    /// Creates the adapter matching a device record's kind.
    ///
    /// Returns `None` for unsupported kinds; such devices never enter the
    /// registry.
    #[must_use]
    pub fn from_record(record: &DeviceRecord, commands: &CommandSender) -> Option<Self> {
        match record.kind() {
            DeviceKind::Temperature => Some(Self::Temperature(TemperatureSensor::new(record))),
            DeviceKind::Humidity => Some(Self::Humidity(HumiditySensor::new(record))),
            DeviceKind::DimmableLight { mode } => Some(Self::Dimmer(DimmableLight::new(
                record,
                mode,
                commands.clone(),
            ))),
            DeviceKind::WindowCovering => {
                Some(Self::WindowCovering(Shutter::new(record, commands.clone())))
            }
            DeviceKind::Other => None,
        }
    }

    /// Applies the latest device record state to the adapter.
    ///
    /// # Errors
    ///
    /// Returns the adapter's kind-specific decode error; see the per-kind
    /// modules for the edge policy.
    pub fn update(&mut self, record: &DeviceRecord) -> Result<(), ValueError> {
        match self {
            Self::Temperature(sensor) => sensor.update(record),
            Self::Humidity(sensor) => sensor.update(record),
            Self::Dimmer(light) => light.update(record),
            Self::WindowCovering(shutter) => shutter.update(record),
        }
    }

    /// Returns the upstream device id this accessory commands.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Temperature(sensor) => sensor.id(),
            Self::Humidity(sensor) => sensor.id(),
            Self::Dimmer(light) => light.id(),
            Self::WindowCovering(shutter) => shutter.id(),
        }
    }

    /// Returns the device name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Temperature(sensor) => sensor.name(),
            Self::Humidity(sensor) => sensor.name(),
            Self::Dimmer(light) => light.name(),
            Self::WindowCovering(shutter) => shutter.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(gui_type: &str, io_style: &str, state: &str) -> DeviceRecord {
        DeviceRecord {
            id: "io_1".to_string(),
            name: "Something".to_string(),
            gui_type: gui_type.to_string(),
            io_style: io_style.to_string(),
            state: state.to_string(),
            ..DeviceRecord::default()
        }
    }

    fn commands() -> CommandSender {
        mpsc::unbounded_channel().0
    }

    #[test]
    fn from_record_builds_supported_kinds() {
        let tx = commands();
        assert!(matches!(
            Accessory::from_record(&record("temp", "", "20"), &tx),
            Some(Accessory::Temperature(_))
        ));
        assert!(matches!(
            Accessory::from_record(&record("analog_in", "humidity", "50"), &tx),
            Some(Accessory::Humidity(_))
        ));
        assert!(matches!(
            Accessory::from_record(&record("light_dimmer", "", "50"), &tx),
            Some(Accessory::Dimmer(_))
        ));
        assert!(matches!(
            Accessory::from_record(&record("light", "", "true"), &tx),
            Some(Accessory::Dimmer(_))
        ));
        assert!(matches!(
            Accessory::from_record(&record("shutter_smart", "", "stop 50"), &tx),
            Some(Accessory::WindowCovering(_))
        ));
    }

    #[test]
    fn from_record_skips_unsupported_kinds() {
        let tx = commands();
        assert!(Accessory::from_record(&record("camera", "", ""), &tx).is_none());
        assert!(Accessory::from_record(&record("analog_in", "", "3"), &tx).is_none());
    }

    #[test]
    fn update_dispatches_to_variant() {
        let tx = commands();
        let mut accessory = Accessory::from_record(&record("temp", "", "20"), &tx).unwrap();
        accessory
            .update(&record("temp", "", "21.5"))
            .unwrap();
        let Accessory::Temperature(sensor) = &accessory else {
            panic!("expected temperature accessory");
        };
        assert!((sensor.current_temperature() - 21.5).abs() < f64::EPSILON);
        assert_eq!(accessory.id(), "io_1");
        assert_eq!(accessory.name(), "Something");
    }
}
