// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Constrained value types used by the accessory adapters.
//!
//! Calaos transmits device state as free-form strings; the adapters decode
//! those into the bounded types in this module so that out-of-range values
//! can never reach the hosting layer.

mod brightness;
mod position;

pub use brightness::Brightness;
pub use position::{Position, PositionState};
