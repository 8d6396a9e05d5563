//! Session onto a workspace running on this machine.

use std::sync::Arc;

use tracing::debug;

use super::forwarder::TcpForwarder;
use crate::config::{ConfigStore, WorkspaceEntry};
use crate::domain::{RemotePort, DEFAULT_PRIVACY};
use crate::error::{Error, RemoteResult};
use crate::ports::{PortScannerPort, Session};

/// A session whose shared ports are the TCP ports listening locally.
///
/// Privacy levels are not enforced, only recorded in the config store so
/// that listings reflect them.
pub struct LocalSession<P> {
    workspace: WorkspaceEntry,
    store: ConfigStore,
    scanner: Arc<P>,
}

impl<P: PortScannerPort> LocalSession<P> {
    pub fn new(workspace: WorkspaceEntry, store: ConfigStore, scanner: Arc<P>) -> Self {
        Self {
            workspace,
            store,
            scanner,
        }
    }
}

impl<P: PortScannerPort + 'static> Session for LocalSession<P> {
    type Forwarder = TcpForwarder;

    async fn list_shared_ports(&self) -> RemoteResult<Vec<RemotePort>> {
        let listening = self.scanner.scan().await?;

        // Re-read privacy so changes made through this session show up.
        let privacy = self
            .store
            .find_workspace(&self.workspace.name)
            .await?
            .map(|entry| entry.privacy)
            .unwrap_or_default();

        Ok(listening
            .into_iter()
            .map(|p| {
                let level = privacy.get(&p.port).map_or(DEFAULT_PRIVACY, String::as_str);
                RemotePort::new(p.port, level)
            })
            .collect())
    }

    async fn update_port_privacy(&self, port: i64, privacy: &str) -> RemoteResult<()> {
        let port = u16::try_from(port).map_err(|_| {
            Error::InvalidArgument(format!("port {} is outside 0-65535", port))
        })?;
        if privacy.is_empty() {
            return Err(Box::new(Error::InvalidArgument(format!(
                "empty privacy level for port {}",
                port
            ))));
        }
        self.store
            .set_port_privacy(&self.workspace.name, port, privacy)
            .await?;
        Ok(())
    }

    fn new_forwarder(self: Arc<Self>, name: &str, remote_port: i64) -> TcpForwarder {
        TcpForwarder::new(name, self.workspace.host.clone(), remote_port)
    }

    async fn close(&self) -> RemoteResult<()> {
        debug!("Closing session to {}", self.workspace.name);
        Ok(())
    }
}
