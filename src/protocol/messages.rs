// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON wire frames of the Calaos websocket protocol.
//!
//! Every frame carries a `msg` discriminator and a `msg_id`. Outbound
//! frames are built with the request types in this module; inbound frames
//! are classified with [`Frame::parse`].

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::home::Room;

/// `msg` value for login requests and responses.
pub const MSG_LOGIN: &str = "login";
/// `msg` value for home-snapshot requests and responses.
pub const MSG_GET_HOME: &str = "get_home";
/// `msg` value for device state-change events.
pub const MSG_EVENT: &str = "event";
/// `msg` value for device commands.
pub const MSG_SET_STATE: &str = "set_state";

/// `msg_id` used for the login request.
pub const MSG_ID_LOGIN: &str = "1";
/// `msg_id` used for the home-snapshot request.
pub const MSG_ID_GET_HOME: &str = "2";
/// `msg_id` used for user-initiated device commands.
pub const MSG_ID_USER_CMD: &str = "user_cmd";

/// Boolean-as-string success sentinel in login responses.
const SUCCESS_TRUE: &str = "true";

/// Minimal envelope used to classify inbound frames.
#[derive(Debug, Deserialize)]
struct Envelope {
    msg: String,
}

/// Outbound login request.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    msg: &'static str,
    msg_id: &'static str,
    data: LoginCredentials,
}

#[derive(Debug, Serialize)]
struct LoginCredentials {
    cn_user: String,
    cn_pass: String,
}

impl LoginRequest {
    /// Creates a login request for the given credentials.
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            msg: MSG_LOGIN,
            msg_id: MSG_ID_LOGIN,
            data: LoginCredentials {
                cn_user: user.into(),
                cn_pass: password.into(),
            },
        }
    }
}

/// Inbound login response.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    data: LoginResult,
}

#[derive(Debug, Deserialize)]
struct LoginResult {
    #[serde(default)]
    success: String,
}

impl LoginResponse {
    /// Returns `true` if the upstream accepted the credentials.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.data.success == SUCCESS_TRUE
    }
}

/// Outbound request for the full home snapshot.
#[derive(Debug, Serialize)]
pub struct GetHomeRequest {
    msg: &'static str,
    msg_id: &'static str,
}

impl GetHomeRequest {
    /// Creates a home-snapshot request.
    #[must_use]
    pub fn new() -> Self {
        Self {
            msg: MSG_GET_HOME,
            msg_id: MSG_ID_GET_HOME,
        }
    }
}

impl Default for GetHomeRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Inbound home-snapshot response.
#[derive(Debug, Deserialize)]
pub struct HomeResponse {
    data: HomePayload,
}

#[derive(Debug, Deserialize)]
struct HomePayload {
    #[serde(default)]
    home: Vec<Room>,
    #[serde(default)]
    #[allow(dead_code)]
    cameras: Vec<serde_json::Value>,
    #[serde(default)]
    #[allow(dead_code)]
    audio: Vec<serde_json::Value>,
}

impl HomeResponse {
    /// Consumes the response, returning its rooms.
    #[must_use]
    pub fn into_rooms(self) -> Vec<Room> {
        self.data.home
    }
}

/// Inbound single-device state-change event.
#[derive(Debug, Deserialize)]
pub struct EventMessage {
    data: EventPayload,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    #[serde(default)]
    id: String,
    #[serde(default)]
    state: String,
}

impl EventMessage {
    /// Returns the targeted device id.
    #[must_use]
    pub fn device_id(&self) -> &str {
        &self.data.data.id
    }

    /// Consumes the event, returning `(device_id, new_state)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.data.data.id, self.data.data.state)
    }
}

/// Outbound device command.
#[derive(Debug, Serialize)]
pub struct SetStateRequest {
    msg: &'static str,
    msg_id: &'static str,
    data: SetStateData,
}

#[derive(Debug, Serialize)]
struct SetStateData {
    id: String,
    value: String,
}

impl SetStateRequest {
    /// Creates a command setting a device to the given wire value.
    #[must_use]
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            msg: MSG_SET_STATE,
            msg_id: MSG_ID_USER_CMD,
            data: SetStateData {
                id: id.into(),
                value: value.into(),
            },
        }
    }
}

/// Serializes an outbound request to its wire form.
///
/// # Errors
///
/// Returns `ParseError::Json` if serialization fails.
pub fn to_wire<T: Serialize>(request: &T) -> Result<String, ParseError> {
    serde_json::to_string(request).map_err(ParseError::Json)
}

/// A classified inbound frame.
#[derive(Debug)]
pub enum Frame {
    /// Login handshake acknowledgement.
    Login(LoginResponse),
    /// Full home snapshot.
    Home(HomeResponse),
    /// Single device state change.
    Event(EventMessage),
    /// Any other `msg` discriminator; logged and ignored by the session.
    Other(String),
}

impl Frame {
    /// Classifies and decodes an inbound frame.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the frame is not valid JSON or its
    /// payload does not match the shape implied by its `msg` field.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let envelope: Envelope = serde_json::from_str(text)?;
        match envelope.msg.as_str() {
            MSG_LOGIN => Ok(Self::Login(serde_json::from_str(text)?)),
            MSG_GET_HOME => Ok(Self::Home(serde_json::from_str(text)?)),
            MSG_EVENT => Ok(Self::Event(serde_json::from_str(text)?)),
            _ => Ok(Self::Other(envelope.msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_request_wire_form() {
        let wire = to_wire(&LoginRequest::new("user", "secret")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["msg"], "login");
        assert_eq!(value["msg_id"], "1");
        assert_eq!(value["data"]["cn_user"], "user");
        assert_eq!(value["data"]["cn_pass"], "secret");
    }

    #[test]
    fn get_home_request_wire_form() {
        let wire = to_wire(&GetHomeRequest::new()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["msg"], "get_home");
        assert_eq!(value["msg_id"], "2");
    }

    #[test]
    fn set_state_request_wire_form() {
        let wire = to_wire(&SetStateRequest::new("output_3", "set 40")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&wire).unwrap();
        assert_eq!(value["msg"], "set_state");
        assert_eq!(value["msg_id"], "user_cmd");
        assert_eq!(value["data"]["id"], "output_3");
        assert_eq!(value["data"]["value"], "set 40");
    }

    #[test]
    fn classify_login_success() {
        let frame =
            Frame::parse(r#"{"msg":"login","msg_id":"1","data":{"success":"true"}}"#).unwrap();
        match frame {
            Frame::Login(login) => assert!(login.succeeded()),
            other => panic!("expected login frame, got {other:?}"),
        }
    }

    #[test]
    fn classify_login_failure() {
        let frame =
            Frame::parse(r#"{"msg":"login","msg_id":"1","data":{"success":"false"}}"#).unwrap();
        match frame {
            Frame::Login(login) => assert!(!login.succeeded()),
            other => panic!("expected login frame, got {other:?}"),
        }
    }

    #[test]
    fn classify_event() {
        let frame = Frame::parse(
            r#"{"msg":"event","data":{"event_raw":"io changed","type":"1",
                "type_str":"io_changed","data":{"id":"output_3","state":"up 20"}}}"#,
        )
        .unwrap();
        match frame {
            Frame::Event(event) => {
                assert_eq!(event.device_id(), "output_3");
                let (id, state) = event.into_parts();
                assert_eq!(id, "output_3");
                assert_eq!(state, "up 20");
            }
            other => panic!("expected event frame, got {other:?}"),
        }
    }

    #[test]
    fn classify_home_snapshot() {
        let frame = Frame::parse(
            r#"{"msg":"get_home","msg_id":"2","data":{
                "home":[{"name":"Hall","type":"room","hits":"0","items":[
                    {"id":"input_1","name":"Sensor","gui_type":"temp","state":"20.0"}]}],
                "cameras":[],"audio":[]}}"#,
        )
        .unwrap();
        match frame {
            Frame::Home(home) => {
                let rooms = home.into_rooms();
                assert_eq!(rooms.len(), 1);
                assert_eq!(rooms[0].devices[0].id, "input_1");
            }
            other => panic!("expected home frame, got {other:?}"),
        }
    }

    #[test]
    fn classify_unknown_msg() {
        let frame = Frame::parse(r#"{"msg":"audio_state","msg_id":"9","data":{}}"#).unwrap();
        assert!(matches!(frame, Frame::Other(msg) if msg == "audio_state"));
    }

    #[test]
    fn classify_rejects_invalid_json() {
        assert!(Frame::parse("not json").is_err());
    }
}
