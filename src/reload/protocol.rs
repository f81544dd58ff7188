//! LiveReload protocol messages (official-7).

use serde::{Deserialize, Serialize};

pub const PROTOCOL_V7: &str = "http://livereload.com/protocols/official-7";

/// Messages a browser client sends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ClientMessage {
    Hello {
        #[serde(default)]
        protocols: Vec<String>,
    },
    Info {
        #[serde(default)]
        url: Option<String>,
    },
    #[serde(other)]
    Other,
}

/// Messages the server pushes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ServerMessage {
    Hello {
        protocols: Vec<String>,
        #[serde(rename = "serverName")]
        server_name: String,
    },
    Reload {
        path: String,
        #[serde(rename = "liveCSS")]
        live_css: bool,
    },
}

impl ServerMessage {
    pub fn hello() -> Self {
        ServerMessage::Hello {
            protocols: vec![PROTOCOL_V7.to_string()],
            server_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_client_hello() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"command":"hello","protocols":["http://livereload.com/protocols/official-7"]}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::Hello {
                protocols: vec![PROTOCOL_V7.to_string()]
            }
        );
    }

    #[test]
    fn test_unknown_command_is_other() {
        let msg: ClientMessage = serde_json::from_str(r#"{"command":"ping"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Other);
    }

    #[test]
    fn test_reload_wire_format() {
        let json = serde_json::to_value(ServerMessage::Reload {
            path: "/docs/a.md".to_string(),
            live_css: false,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"command": "reload", "path": "/docs/a.md", "liveCSS": false})
        );
    }

    #[test]
    fn test_hello_wire_format() {
        let json = serde_json::to_value(ServerMessage::hello()).unwrap();
        assert_eq!(json["command"], "hello");
        assert_eq!(json["serverName"], "markview");
        assert_eq!(json["protocols"][0], PROTOCOL_V7);
    }
}
