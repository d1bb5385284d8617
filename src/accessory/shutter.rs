// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window-covering adapter.
//!
//! Calaos reports shutter state as a two-token command,
//! `{up|down|stop|calibration} <position>`, where the position is in
//! Calaos-space (0 = fully open, 100 = fully closed). The consumer's
//! position scale is reversed, so every decoded position is inverted with
//! `100 - value`, and target positions requested by the consumer are
//! inverted back before hitting the wire.
//!
//! Calaos only pushes the current position through `up`/`down`/`stop`;
//! the real target of a movement is not reported, so target and current
//! track the same value on the inbound path.

use crate::error::{TransportError, ValueError};
use crate::home::DeviceRecord;
use crate::types::{Position, PositionState};

use super::{CommandIntent, CommandSender};

/// Leading state token for upward movement.
const TOKEN_UP: &str = "up";
/// Leading state token for downward movement.
const TOKEN_DOWN: &str = "down";
/// Leading state token for a stopped shutter.
const TOKEN_STOP: &str = "stop";
/// Reserved leading token, accepted as a no-op.
const TOKEN_CALIBRATION: &str = "calibration";

/// Window-covering accessory.
///
/// All exposed positions are consumer-space.
#[derive(Debug)]
pub struct Shutter {
    id: String,
    name: String,
    model: String,
    current: Position,
    target: Position,
    state: PositionState,
    hold_position: bool,
    commands: CommandSender,
}

impl Shutter {
    /// Creates the adapter from its device record, applying the initial
    /// state best-effort.
    #[must_use]
    pub fn new(record: &DeviceRecord, commands: CommandSender) -> Self {
        let mut shutter = Self {
            id: record.id.clone(),
            name: record.name.clone(),
            model: record.io_type.clone(),
            current: Position::MIN,
            target: Position::MIN,
            state: PositionState::Stopped,
            hold_position: false,
            commands,
        };
        if let Err(error) = shutter.update(record) {
            tracing::debug!(id = %shutter.id, %error, "initial shutter state not decodable");
        }
        shutter
    }

    /// Applies the latest device record state.
    ///
    /// The position is taken from the last token so that frames with
    /// extra fields still decode; the command is always the first token.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidCommandState` if the state does not
    /// split into at least two tokens, or `ValueError::InvalidNumber` if
    /// the position token is not an integer. An unrecognized leading
    /// token is a no-op, not an error.
    pub fn update(&mut self, record: &DeviceRecord) -> Result<(), ValueError> {
        let tokens: Vec<&str> = record.state.split_whitespace().collect();
        let [command, .., position_token] = tokens.as_slice() else {
            return Err(ValueError::InvalidCommandState(record.state.clone()));
        };
        let position = Position::from_wire(position_token)?.inverted();

        match *command {
            TOKEN_UP => {
                self.state = PositionState::Opening;
                self.target = position;
                self.current = position;
            }
            TOKEN_DOWN => {
                self.state = PositionState::Closing;
                self.target = position;
                self.current = position;
            }
            TOKEN_STOP => {
                self.state = PositionState::Stopped;
                self.target = position;
                self.current = position;
                self.hold_position = true;
            }
            // Reserved by upstream.
            TOKEN_CALIBRATION => {}
            other => {
                tracing::debug!(id = %self.id, command = other, "ignoring unknown shutter command");
            }
        }
        Ok(())
    }

    /// Requests the shutter move to a target position (consumer-space).
    ///
    /// Redundant requests are suppressed: if the requested target equals
    /// the currently cached position, no wire command is emitted. This
    /// keeps the hosting layer's own echoes off the wire.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::ChannelClosed` if the session is gone.
    pub fn set_target_position(&mut self, target: Position) -> Result<(), TransportError> {
        if target == self.current {
            tracing::debug!(id = %self.id, %target, "target equals current position, not sending");
            return Ok(());
        }
        self.target = target;
        let wire = target.inverted();
        tracing::debug!(id = %self.id, %target, calaos = %wire, "shutter move requested");
        self.commands
            .send(CommandIntent {
                id: self.id.clone(),
                value: format!("set {}", wire.value()),
            })
            .map_err(|_| TransportError::ChannelClosed("command channel".to_string()))
    }

    /// Returns the current position (consumer-space).
    #[must_use]
    pub fn current_position(&self) -> Position {
        self.current
    }

    /// Returns the target position (consumer-space).
    #[must_use]
    pub fn target_position(&self) -> Position {
        self.target
    }

    /// Returns the movement state.
    #[must_use]
    pub fn position_state(&self) -> PositionState {
        self.state
    }

    /// Returns `true` once a `stop` command has latched the hold flag.
    #[must_use]
    pub fn hold_position(&self) -> bool {
        self.hold_position
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
