// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimmable-light adapter.
//!
//! Covers two Calaos encodings behind one accessory:
//!
//! - brightness mode (`light_dimmer`): state is an integer 0-100, on/off
//!   is derived as brightness != 0
//! - switch mode (plain `light`): state is a boolean string, brightness
//!   is forced to 100/0

use crate::error::{TransportError, ValueError};
use crate::home::{DeviceRecord, DimmerMode};
use crate::types::Brightness;

use super::{CommandIntent, CommandSender};

/// Dimmable or switchable light accessory.
#[derive(Debug)]
pub struct DimmableLight {
    id: String,
    name: String,
    model: String,
    mode: DimmerMode,
    on: bool,
    brightness: Brightness,
    commands: CommandSender,
}

impl DimmableLight {
    /// Creates the adapter from its device record, applying the initial
    /// state best-effort.
    #[must_use]
    pub fn new(record: &DeviceRecord, mode: DimmerMode, commands: CommandSender) -> Self {
        let mut light = Self {
            id: record.id.clone(),
            name: record.name.clone(),
            model: record.io_type.clone(),
            mode,
            on: false,
            brightness: Brightness::MIN,
            commands,
        };
        if let Err(error) = light.update(record) {
            tracing::debug!(id = %light.id, %error, "initial light state not decodable");
        }
        light
    }

    /// Applies the latest device record state.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the state does not decode for the light's
    /// mode; no value is changed on error.
    pub fn update(&mut self, record: &DeviceRecord) -> Result<(), ValueError> {
        match self.mode {
            DimmerMode::Brightness => {
                let brightness = Brightness::from_wire(&record.state)?;
                self.brightness = brightness;
                self.on = brightness.is_on();
            }
            DimmerMode::Switch => {
                let on = match record.state.as_str() {
                    "true" => true,
                    "false" => false,
                    other => return Err(ValueError::InvalidBoolean(other.to_string())),
                };
                self.on = on;
                self.brightness = if on { Brightness::MAX } else { Brightness::MIN };
            }
        }
        Ok(())
    }

    /// Requests the light be switched on or off.
    ///
    /// Emits a `(device id, "true"/"false")` command intent; the session's
    /// command pump performs the actual send.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ChannelClosed` if the session is gone.
    pub fn set_on(&self, on: bool) -> Result<(), TransportError> {
        let value = if on { "true" } else { "false" };
        tracing::debug!(id = %self.id, value, "light switch requested");
        self.emit(value.to_string())
    }

    /// Requests a brightness change.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ChannelClosed` if the session is gone.
    pub fn set_brightness(&self, brightness: Brightness) -> Result<(), TransportError> {
        tracing::debug!(id = %self.id, %brightness, "brightness change requested");
        self.emit(format!("set {}", brightness.value()))
    }

    fn emit(&self, value: String) -> Result<(), TransportError> {
        self.commands
            .send(CommandIntent {
                id: self.id.clone(),
                value,
            })
            .map_err(|_| TransportError::ChannelClosed("command channel".to_string()))
    }

    /// Returns `true` if the light is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Returns the current brightness.
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Returns the wire encoding mode of this light.
    #[must_use]
    pub fn mode(&self) -> DimmerMode {
        self.mode
    }

    /// Returns the upstream device id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the device name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the upstream IO type, used as the accessory model string.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn record(gui_type: &str, state: &str) -> DeviceRecord {
        DeviceRecord {
            id: "output_7".to_string(),
            name: "Spots".to_string(),
            gui_type: gui_type.to_string(),
            io_type: "WODimmer".to_string(),
            state: state.to_string(),
            ..DeviceRecord::default()
        }
    }

    fn brightness_light(state: &str) -> (DimmableLight, mpsc::UnboundedReceiver<CommandIntent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let light = DimmableLight::new(&record("light_dimmer", state), DimmerMode::Brightness, tx);
        (light, rx)
    }

    fn switch_light(state: &str) -> (DimmableLight, mpsc::UnboundedReceiver<CommandIntent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let light = DimmableLight::new(&record("light", state), DimmerMode::Switch, tx);
        (light, rx)
    }

    #[test]
    fn brightness_mode_zero_is_off() {
        let (light, _rx) = brightness_light("0");
        assert!(!light.is_on());
        assert_eq!(light.brightness().value(), 0);
    }

    #[test]
    fn brightness_mode_nonzero_is_on() {
        let (mut light, _rx) = brightness_light("0");
        light.update(&record("light_dimmer", "50")).unwrap();
        assert!(light.is_on());
        assert_eq!(light.brightness().value(), 50);
    }

    #[test]
    fn brightness_mode_rejects_non_numeric() {
        let (mut light, _rx) = brightness_light("75");
        let result = light.update(&record("light_dimmer", "bright"));
        assert!(matches!(result, Err(ValueError::InvalidNumber(_))));
        // No value changed on error.
        assert!(light.is_on());
        assert_eq!(light.brightness().value(), 75);
    }

    #[test]
    fn switch_mode_true_forces_full_brightness() {
        let (light, _rx) = switch_light("true");
        assert!(light.is_on());
        assert_eq!(light.brightness(), Brightness::MAX);
    }

    #[test]
    fn switch_mode_false_forces_zero_brightness() {
        let (mut light, _rx) = switch_light("true");
        light.update(&record("light", "false")).unwrap();
        assert!(!light.is_on());
        assert_eq!(light.brightness(), Brightness::MIN);
    }

    #[test]
    fn switch_mode_rejects_non_boolean() {
        let (mut light, _rx) = switch_light("true");
        let result = light.update(&record("light", "maybe"));
        assert!(matches!(result, Err(ValueError::InvalidBoolean(_))));
        assert!(light.is_on());
        assert_eq!(light.brightness(), Brightness::MAX);
    }

    #[test]
    fn set_on_emits_boolean_command() {
        let (light, mut rx) = switch_light("false");
        light.set_on(true).unwrap();
        light.set_on(false).unwrap();

        let intent = rx.try_recv().unwrap();
        assert_eq!(intent.id, "output_7");
        assert_eq!(intent.value, "true");
        assert_eq!(rx.try_recv().unwrap().value, "false");
    }

    #[test]
    fn set_brightness_emits_set_command() {
        let (light, mut rx) = brightness_light("0");
        light.set_brightness(Brightness::new(40).unwrap()).unwrap();

        let intent = rx.try_recv().unwrap();
        assert_eq!(intent.id, "output_7");
        assert_eq!(intent.value, "set 40");
    }

    #[test]
    fn emit_fails_when_session_gone() {
        let (light, rx) = switch_light("false");
        drop(rx);
        assert!(matches!(
            light.set_on(true),
            Err(TransportError::ChannelClosed(_))
        ));
    }
}
