// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only temperature sensor adapter.

use crate::error::ValueError;
use crate::home::DeviceRecord;

/// Temperature sensor accessory.
///
/// Decodes the Calaos state string as a float in degrees Celsius. A parse
/// failure reports an error and leaves the previous reading in place.
#[derive(Debug)]
pub struct TemperatureSensor {
    id: String,
    name: String,
    model: String,
    current: f64,
}

impl TemperatureSensor {
    /// Creates the adapter from its device record, applying the initial
    /// state best-effort.
    #[must_use]
    pub fn new(record: &DeviceRecord) -> Self {
        let mut sensor = Self {
            id: record.id.clone(),
            name: record.name.clone(),
            model: record.io_type.clone(),
            current: 0.0,
        };
        if let Err(error) = sensor.update(record) {
            tracing::debug!(id = %sensor.id, %error, "initial temperature state not decodable");
        }
        sensor
    }

    /// Applies the latest device record state.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidNumber` if the state is not numeric;
    /// the previous reading is kept.
    pub fn update(&mut self, record: &DeviceRecord) -> Result<(), ValueError> {
        let value: f64 = record
            .state
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidNumber(record.state.clone()))?;
        self.current = value;
        Ok(())
    }

    /// Returns the last decoded temperature in degrees Celsius.
    #[must_use]
    pub fn current_temperature(&self) -> f64 {
        self.current
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
