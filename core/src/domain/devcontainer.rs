//! Devcontainer metadata: port labels from `.devcontainer/devcontainer.json`.
//!
//! The file is JSON with comments and is often written by hand, so it is
//! read leniently: comments are stripped and trailing commas before a closing
//! brace are removed before the result is handed to serde_json.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::BoxError;

/// Repository path of the devcontainer file.
pub const DEV_CONTAINER_PATH: &str = ".devcontainer/devcontainer.json";

/// Why the devcontainer metadata could not be obtained.
///
/// These never fail a listing; they only suppress labels.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("error getting content")]
    Fetch(#[source] BoxError),

    #[error("failed to convert json to standard json")]
    InvalidJson(#[source] serde_json::Error),

    #[error("error unmarshaling")]
    Decode(#[source] serde_json::Error),

    #[error("metadata fetch cancelled")]
    Cancelled,

    #[error("metadata fetch ended without a result")]
    Abandoned,
}

/// The subset of devcontainer.json this crate cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevContainer {
    #[serde(default, rename = "portsAttributes")]
    pub ports_attributes: HashMap<String, PortAttributes>,
}

/// Per-port attributes keyed by the port number as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAttributes {
    #[serde(default)]
    pub label: String,
}

impl DevContainer {
    /// Parse devcontainer.json contents (JSON with comments).
    pub fn from_jsonc(contents: &[u8]) -> Result<Self, MetadataError> {
        let normalized = remove_trailing_commas(&strip_comments(contents));
        let value: serde_json::Value =
            serde_json::from_slice(&normalized).map_err(MetadataError::InvalidJson)?;
        serde_json::from_value(value).map_err(MetadataError::Decode)
    }

    /// Label configured for `port`, if any.
    pub fn label_for(&self, port: u16) -> Option<&str> {
        self.ports_attributes
            .get(&port.to_string())
            .map(|attrs| attrs.label.as_str())
    }
}

/// Remove `//` and `/* */` comments outside of string literals.
///
/// Line comments keep their newline so error positions stay meaningful.
pub fn strip_comments(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    let mut in_string = false;

    while i < input.len() {
        let c = input[i];
        if in_string {
            out.push(c);
            if c == b'\\' && i + 1 < input.len() {
                out.push(input[i + 1]);
                i += 1;
            } else if c == b'"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match (c, input.get(i + 1)) {
            (b'"', _) => {
                in_string = true;
                out.push(c);
                i += 1;
            }
            (b'/', Some(b'/')) => {
                while i < input.len() && input[i] != b'\n' {
                    i += 1;
                }
            }
            (b'/', Some(b'*')) => {
                i += 2;
                while i < input.len() && !(input[i] == b'*' && input.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                // Unterminated block comments swallow the rest of the input.
                i = (i + 2).min(input.len());
                out.push(b' ');
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Drop commas that are followed only by whitespace and a closing `}`.
pub fn remove_trailing_commas(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in input.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        if c == b'"' {
            in_string = true;
        } else if c == b',' {
            let next = input[i + 1..].iter().find(|b| !b.is_ascii_whitespace());
            if next == Some(&b'}') {
                continue;
            }
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_comma_is_removed() {
        assert_eq!(remove_trailing_commas(br#"{"a":1,}"#), br#"{"a":1}"#);
        assert_eq!(
            remove_trailing_commas(b"{\"a\":{\"b\":2},\n}"),
            b"{\"a\":{\"b\":2}\n}"
        );
    }

    #[test]
    fn test_commas_inside_strings_are_kept() {
        let input = br#"{"a":",}"}"#;
        assert_eq!(remove_trailing_commas(input), input);
    }

    #[test]
    fn test_strip_comments() {
        let input = b"{\n  // ports\n  \"a\": 1 /* one */\n}";
        let stripped = strip_comments(input);
        let value: serde_json::Value = serde_json::from_slice(&stripped).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        let input = br#"{"url": "http://localhost/*x*/"}"#;
        assert_eq!(strip_comments(input), input);
    }

    #[test]
    fn test_from_jsonc() {
        let contents = br#"{
            // Forwarded ports
            "name": "app",
            "portsAttributes": {
                "3000": { "label": "Frontend", "onAutoForward": "notify" },
                "5432": { "label": "Postgres" },
            },
        }"#;

        let dev_container = DevContainer::from_jsonc(contents).unwrap();
        assert_eq!(dev_container.label_for(3000), Some("Frontend"));
        assert_eq!(dev_container.label_for(5432), Some("Postgres"));
        assert_eq!(dev_container.label_for(8080), None);
    }

    #[test]
    fn test_missing_ports_attributes() {
        let dev_container = DevContainer::from_jsonc(br#"{"name": "app"}"#).unwrap();
        assert!(dev_container.ports_attributes.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let err = DevContainer::from_jsonc(b"{\"a\": [1,]").unwrap_err();
        assert!(matches!(err, MetadataError::InvalidJson(_)));
    }

    #[test]
    fn test_wrong_shape() {
        let err = DevContainer::from_jsonc(br#"{"portsAttributes": ["3000"]}"#).unwrap_err();
        assert!(matches!(err, MetadataError::Decode(_)));
    }
}
