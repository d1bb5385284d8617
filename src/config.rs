// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.
//!
//! Loaded from a JSON file shaped like:
//!
//! ```json
//! {
//!     "WebSocketServer": {
//!         "Host": "calaos.local",
//!         "Port": 5454,
//!         "User": "user",
//!         "Password": "secret"
//!     },
//!     "PinCode": "00102003",
//!     "BridgeName": "Calaos Gateway"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Port on which the Calaos server speaks TLS.
const PORT_WSS: u16 = 443;

/// Connection settings for the Calaos websocket server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketConfig {
    /// Server host name or address.
    #[serde(rename = "Host")]
    pub host: String,
    /// Server port; 443 selects `wss`.
    #[serde(rename = "Port")]
    pub port: u16,
    /// Calaos user name.
    #[serde(rename = "User")]
    pub user: String,
    /// Calaos password.
    #[serde(rename = "Password")]
    pub password: String,
}

/// Full bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// Calaos websocket server settings.
    #[serde(rename = "WebSocketServer")]
    pub websocket_server: WebSocketConfig,
    /// Pairing PIN handed to the hosting layer.
    #[serde(rename = "PinCode")]
    pub pin_code: String,
    /// Bridge accessory name handed to the hosting layer.
    #[serde(rename = "BridgeName")]
    pub bridge_name: String,
}

impl Configuration {
    /// Loads the configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or decoded.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Builds the websocket URI of the Calaos API endpoint.
    ///
    /// Port 443 selects the `wss` scheme, anything else plain `ws`.
    #[must_use]
    pub fn websocket_uri(&self) -> String {
        let server = &self.websocket_server;
        let scheme = if server.port == PORT_WSS { "wss" } else { "ws" };
        format!("{scheme}://{}:{}/api", server.host, server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(port: u16) -> Configuration {
        Configuration {
            websocket_server: WebSocketConfig {
                host: "calaos.local".to_string(),
                port,
                user: "user".to_string(),
                password: "secret".to_string(),
            },
            pin_code: "00102003".to_string(),
            bridge_name: "Calaos Gateway".to_string(),
        }
    }

    #[test]
    fn websocket_uri_plain() {
        assert_eq!(config(5454).websocket_uri(), "ws://calaos.local:5454/api");
    }

    #[test]
    fn websocket_uri_tls_on_443() {
        assert_eq!(config(443).websocket_uri(), "wss://calaos.local:443/api");
    }

    #[test]
    fn deserializes_wire_field_names() {
        let json = r#"{
            "WebSocketServer": {
                "Host": "192.168.1.10",
                "Port": 5454,
                "User": "admin",
                "Password": "pw"
            },
            "PinCode": "11223344",
            "BridgeName": "Home"
        }"#;

        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.websocket_server.host, "192.168.1.10");
        assert_eq!(config.websocket_server.port, 5454);
        assert_eq!(config.pin_code, "11223344");
        assert_eq!(config.bridge_name, "Home");
    }
}
