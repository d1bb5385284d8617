// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for dimmable lights.

use std::fmt;

use crate::error::ValueError;

/// Brightness level as a percentage (0-100).
///
/// Calaos dimmers report brightness as 0-100, where 0 is off and 100 is
/// full brightness.
///
/// # Examples
///
/// ```
/// use calaos_bridge::types::Brightness;
///
/// let level = Brightness::new(75).unwrap();
/// assert_eq!(level.value(), 75);
///
/// assert_eq!(Brightness::MIN.value(), 0);
/// assert_eq!(Brightness::MAX.value(), 100);
/// assert!(Brightness::new(101).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Brightness(u8);

impl Brightness {
    /// Minimum brightness (0%, off).
    pub const MIN: Self = Self(0);

    /// Maximum brightness (100%).
    pub const MAX: Self = Self(100);

    /// Creates a new brightness value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if value exceeds 100.
    pub fn new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: 100,
                actual: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    /// Creates a brightness value, clamping to the valid range.
    // Safe: value is within 0..=100 after clamping.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub const fn clamped(value: i64) -> Self {
        if value > 100 {
            Self(100)
        } else if value < 0 {
            Self(0)
        } else {
            Self(value as u8)
        }
    }

    /// Decodes a Calaos brightness state string.
    ///
    /// Upstream occasionally formats brightness as a float (`"50.0"`), so
    /// the value is parsed as a float and truncated before clamping.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidNumber` if the state is not numeric.
    // Safe: out-of-range floats saturate during the cast and are clamped.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_wire(state: &str) -> Result<Self, ValueError> {
        let value: f64 = state
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidNumber(state.to_string()))?;
        Ok(Self::clamped(value as i64))
    }

    /// Returns the brightness percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` if the brightness is non-zero.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl TryFrom<u8> for Brightness {
    type Error = ValueError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
