//! Shared port domain models.

use serde::{Deserialize, Serialize};

use super::DevContainer;

/// Privacy assumed for ports the session has never been told about.
pub const DEFAULT_PRIVACY: &str = "private";

/// Preview domain used to build browse URLs unless configured otherwise.
pub const DEFAULT_PREVIEW_DOMAIN: &str = "githubpreview.dev";

// ============================================================================
// Workspace
// ============================================================================

/// A resolved remote development environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
}

impl Workspace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ============================================================================
// RemotePort
// ============================================================================

/// A port shared by the remote session, as reported by the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePort {
    /// Port number inside the remote environment.
    pub source_port: u16,
    /// Privacy level, e.g. `private`, `org` or `public`.
    pub privacy: String,
}

impl RemotePort {
    pub fn new(source_port: u16, privacy: impl Into<String>) -> Self {
        Self {
            source_port,
            privacy: privacy.into(),
        }
    }
}

// ============================================================================
// ListeningPort
// ============================================================================

/// A TCP socket in the LISTEN state on the local machine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListeningPort {
    /// The port number (e.g., 3000, 8080).
    pub port: u16,
    /// Network address the port is bound to (`*` for all interfaces).
    pub address: String,
}

impl ListeningPort {
    pub fn new(port: u16, address: impl Into<String>) -> Self {
        Self {
            port,
            address: address.into(),
        }
    }
}

// ============================================================================
// PortRow
// ============================================================================

/// One line of a port listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRow {
    /// Label from the devcontainer metadata, empty when there is none.
    pub label: String,
    pub port: u16,
    pub privacy: String,
    #[serde(rename = "browseURL")]
    pub browse_url: String,
}

impl PortRow {
    /// Build the row for `port`, taking its label from `dev_container`.
    pub fn new(
        port: &RemotePort,
        dev_container: &DevContainer,
        workspace: &str,
        preview_domain: &str,
    ) -> Self {
        Self {
            label: dev_container
                .label_for(port.source_port)
                .unwrap_or_default()
                .to_string(),
            port: port.source_port,
            privacy: port.privacy.clone(),
            browse_url: browse_url(workspace, port.source_port, preview_domain),
        }
    }
}

/// URL under which a shared port can be opened in a browser.
pub fn browse_url(workspace: &str, port: u16, preview_domain: &str) -> String {
    format!("https://{}-{}.{}/", workspace, port, preview_domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_url() {
        assert_eq!(
            browse_url("monalisa-app-x7g", 3000, DEFAULT_PREVIEW_DOMAIN),
            "https://monalisa-app-x7g-3000.githubpreview.dev/"
        );
    }

    #[test]
    fn test_row_label_only_for_matching_key() {
        let dev_container =
            DevContainer::from_jsonc(br#"{"portsAttributes": {"3000": {"label": "web"}}}"#)
                .unwrap();

        let labelled = PortRow::new(&RemotePort::new(3000, "public"), &dev_container, "ws", "d.dev");
        assert_eq!(labelled.label, "web");
        assert_eq!(labelled.privacy, "public");
        assert_eq!(labelled.browse_url, "https://ws-3000.d.dev/");

        let unlabelled = PortRow::new(&RemotePort::new(30000, "private"), &dev_container, "ws", "d.dev");
        assert_eq!(unlabelled.label, "");
    }

    #[test]
    fn test_row_json_keys() {
        let row = PortRow::new(&RemotePort::new(80, "org"), &DevContainer::default(), "ws", "d.dev");
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["browseURL"], "https://ws-80.d.dev/");
        assert_eq!(json["label"], "");
        assert_eq!(json["port"], 80);
    }
}
