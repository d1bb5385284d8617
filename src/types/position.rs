// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Position types for window coverings.
//!
//! Calaos and the accessory consumer use inverted position scales:
//!
//! - Calaos: 0 = fully open, 100 = fully closed
//! - consumer: 0 = fully closed (least light), 100 = fully open
//!
//! [`Position::inverted`] converts between the two; the conversion is its
//! own inverse.

use std::fmt;

use crate::error::ValueError;

/// Window-covering position as a percentage (0-100).
///
/// The scale a `Position` value lives on (Calaos-space or consumer-space)
/// is determined by context; [`Position::inverted`] flips between them.
///
/// # Examples
///
/// ```
/// use calaos_bridge::types::Position;
///
/// let calaos = Position::new(30).unwrap();
/// let consumer = calaos.inverted();
/// assert_eq!(consumer.value(), 70);
/// assert_eq!(consumer.inverted(), calaos);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u8);

impl Position {
    /// Position 0.
    pub const MIN: Self = Self(0);

    /// Position 100.
    pub const MAX: Self = Self(100);

    /// Creates a new position value.
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

    /// Creates a position value, clamping to the valid range.
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

    /// Decodes a Calaos position token.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidNumber` if the token is not an integer.
    pub fn from_wire(token: &str) -> Result<Self, ValueError> {
        let value: i64 = token
            .trim()
            .parse()
            .map_err(|_| ValueError::InvalidNumber(token.to_string()))?;
        Ok(Self::clamped(value))
    }

    /// Returns the position on the opposite scale (`100 - value`).
    ///
    /// Involutive: `p.inverted().inverted() == p`.
    #[must_use]
    pub const fn inverted(&self) -> Self {
        Self(100 - self.0)
    }

    /// Returns the position percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Movement state of a window covering.
///
/// Values match the consumer's position-state characteristic: 0 is moving
/// toward the minimum position (closing), 1 toward the maximum (opening),
/// 2 is stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PositionState {
    /// Moving toward the minimum position.
    Closing = 0,
    /// Moving toward the maximum position.
    Opening = 1,
    /// Not moving.
    Stopped = 2,
}

impl PositionState {
    /// Returns the numeric wire value of the state.
    #[must_use]
    pub const fn value(self) -> u8 {
        self as u8
    }
}
