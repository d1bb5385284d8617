// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seam to the external accessory-hosting collaborator.
//!
//! The pairing/serving layer (and its on-disk persistence) lives outside
//! this crate; the session only needs to hand it the accessory list once
//! and let it serve. Hosts keep the handles they are given: the session
//! updates the same accessories in place for the rest of its lifetime.

use crate::Result;
use crate::accessory::AccessoryHandle;

/// External accessory-hosting collaborator.
///
/// Called exactly once per hosting session, on the first non-empty home
/// snapshot; the registry is never rebuilt while the host is serving, so
/// accessory identity stays stable for paired clients.
pub trait AccessoryHost: Send {
    /// Registers the accessory list and starts serving it.
    ///
    /// # Errors
    ///
    /// Returns an error if serving could not be started; the session will
    /// retry with the next home snapshot.
    fn register_accessories(&mut self, accessories: Vec<AccessoryHandle>) -> Result<()>;
}
