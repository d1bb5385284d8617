// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only humidity sensor adapter.

use crate::error::ValueError;
use crate::home::DeviceRecord;

/// Relative-humidity sensor accessory.
///
/// Decodes the Calaos state string as a float percentage. Unlike the
/// temperature adapter, a parse failure forces the reading to 0.0 instead
/// of leaving a stale value or erroring.
#[derive(Debug)]
pub struct HumiditySensor {
    id: String,
    name: String,
    model: String,
    current: f64,
}

impl HumiditySensor {
    /// Creates the adapter from its device record, applying the initial
    /// state.
    #[must_use]
    pub fn new(record: &DeviceRecord) -> Self {
        let mut sensor = Self {
            id: record.id.clone(),
            name: record.name.clone(),
            model: record.io_type.clone(),
            current: 0.0,
        };
        // Never fails; an undecodable state reads as 0.0.
        let _ = sensor.update(record);
        sensor
    }

    /// Applies the latest device record state.
    ///
    /// # Errors
    ///
    /// Never returns an error; kept fallible for uniformity with the
    /// other adapters.
    pub fn update(&mut self, record: &DeviceRecord) -> Result<(), ValueError> {
        self.current = record.state.trim().parse().unwrap_or(0.0);
        Ok(())
    }

    /// Returns the last decoded relative humidity percentage.
    #[must_use]
    pub fn current_humidity(&self) -> f64 {
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
