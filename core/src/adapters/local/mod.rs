//! Local backend: workspaces that are directories on this machine.
//!
//! Each configured workspace has a repository root and a host. Its shared
//! ports are the TCP ports listening on this machine, its privacy levels are
//! kept in the config store, and forwards dial `host:port` directly.

mod forwarder;
mod session;

use std::io::ErrorKind;
use std::sync::Arc;

use crate::adapters::scanner::PortScanner;
use crate::config::{ConfigStore, WorkspaceEntry};
use crate::domain::Workspace;
use crate::error::{BoxError, RemoteResult};
use crate::ports::{
    PortScannerPort, RepositoryContents, ResolveError, SessionConnector, WorkspaceResolver,
};

pub use forwarder::{ForwardError, TcpForwarder};
pub use session::LocalSession;

/// Backend serving workspaces from the local config store.
pub struct LocalBackend<P = PortScanner> {
    store: ConfigStore,
    scanner: Arc<P>,
}

impl LocalBackend<PortScanner> {
    /// Create a backend using the platform port scanner.
    pub fn new(store: ConfigStore) -> Self {
        Self::with_scanner(store, PortScanner::new())
    }
}

impl<P: PortScannerPort> LocalBackend<P> {
    /// Create a backend with a custom scanner (for testing).
    pub fn with_scanner(store: ConfigStore, scanner: P) -> Self {
        Self {
            store,
            scanner: Arc::new(scanner),
        }
    }

    async fn entry(&self, name: &str) -> RemoteResult<WorkspaceEntry> {
        self.store
            .find_workspace(name)
            .await?
            .ok_or_else(|| format!("workspace {} not found", name).into())
    }
}

impl<P: PortScannerPort> WorkspaceResolver for LocalBackend<P> {
    async fn resolve(&self, name: &str) -> Result<Workspace, ResolveError> {
        let workspaces = self
            .store
            .get_workspaces()
            .await
            .map_err(|e| ResolveError::Other(Box::new(e)))?;

        if workspaces.is_empty() {
            return Err(ResolveError::NoWorkspaces);
        }

        if name.is_empty() {
            return match workspaces.as_slice() {
                [only] => Ok(Workspace::new(only.name.clone())),
                many => {
                    let names: Vec<&str> = many.iter().map(|w| w.name.as_str()).collect();
                    Err(ResolveError::Other(
                        format!(
                            "multiple workspaces available, choose one of: {}",
                            names.join(", ")
                        )
                        .into(),
                    ))
                }
            };
        }

        workspaces
            .iter()
            .find(|w| w.name == name)
            .map(|w| Workspace::new(w.name.clone()))
            .ok_or_else(|| {
                let err: BoxError = format!("workspace {} not found", name).into();
                ResolveError::Other(err)
            })
    }
}

impl<P: PortScannerPort + 'static> SessionConnector for LocalBackend<P> {
    type Session = LocalSession<P>;

    async fn connect(&self, workspace: &Workspace) -> RemoteResult<LocalSession<P>> {
        let entry = self.entry(&workspace.name).await?;
        Ok(LocalSession::new(
            entry,
            self.store.clone(),
            Arc::clone(&self.scanner),
        ))
    }
}

impl<P: PortScannerPort> RepositoryContents for LocalBackend<P> {
    async fn get_file(&self, workspace: &Workspace, path: &str) -> RemoteResult<Option<Vec<u8>>> {
        let entry = self.entry(&workspace.name).await?;
        match tokio::fs::read(entry.root.join(path)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }
}
