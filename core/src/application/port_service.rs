//! Port management application service.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::devcontainer::{fetch_dev_container, DevContainerHandle};
use super::forward_group::forward_all;
use crate::domain::{
    parse_port_pairs, parse_privacy_specs, DevContainer, PortRow, PrivacySpec, Workspace,
    DEFAULT_PREVIEW_DOMAIN,
};
use crate::error::{Error, Result};
use crate::ports::{RepositoryContents, ResolveError, Session, SessionConnector, WorkspaceResolver};

/// Application service for the ports of a workspace.
///
/// Each operation resolves the workspace, opens one session, and closes it
/// again before returning. The backend supplies workspace resolution, the
/// session itself, and repository contents.
pub struct PortService<B> {
    backend: Arc<B>,
    preview_domain: String,
    bind_address: IpAddr,
}

impl<B> PortService<B>
where
    B: WorkspaceResolver + SessionConnector + RepositoryContents + 'static,
{
    /// Create a new port service on top of the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            preview_domain: DEFAULT_PREVIEW_DOMAIN.to_string(),
            bind_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }

    /// Set the domain used in browse URLs.
    pub fn with_preview_domain(mut self, domain: impl Into<String>) -> Self {
        self.preview_domain = domain.into();
        self
    }

    /// Set the address local forward listeners bind to.
    pub fn with_bind_address(mut self, address: IpAddr) -> Self {
        self.bind_address = address;
        self
    }

    /// The backend this service talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// List the shared ports of a workspace with their labels.
    ///
    /// Rows are in the order the session reports them. Labels come from the
    /// devcontainer metadata; failing to read it only leaves them empty.
    pub async fn list_ports(
        &self,
        workspace_name: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PortRow>> {
        let workspace = self.resolve(workspace_name).await?;

        let dev_container = fetch_dev_container(
            Arc::clone(&self.backend),
            workspace.clone(),
            cancel.clone(),
        );

        let session = self.connect(&workspace, cancel).await?;
        let result = self
            .load_rows(&session, &workspace, dev_container, cancel)
            .await;
        finish(&session, result).await
    }

    async fn load_rows(
        &self,
        session: &B::Session,
        workspace: &Workspace,
        dev_container: DevContainerHandle,
        cancel: &CancellationToken,
    ) -> Result<Vec<PortRow>> {
        info!("Loading ports...");
        let ports = cancellable(cancel, session.list_shared_ports())
            .await?
            .map_err(Error::Query)?;

        let dev_container = dev_container.result().await.unwrap_or_else(|e| {
            warn!("Failed to get port names: {}", e);
            DevContainer::default()
        });

        Ok(ports
            .iter()
            .map(|port| {
                PortRow::new(port, &dev_container, &workspace.name, &self.preview_domain)
            })
            .collect())
    }

    /// Apply `"<port>:<privacy>"` specs in order, stopping at the first failure.
    ///
    /// All specs are parsed before anything is sent. Changes applied before a
    /// failure are not rolled back.
    pub async fn update_privacy<S: AsRef<str>>(
        &self,
        workspace_name: &str,
        specs: &[S],
        cancel: &CancellationToken,
    ) -> Result<()> {
        let specs = parse_privacy_specs(specs)?;
        let workspace = self.resolve(workspace_name).await?;
        let session = self.connect(&workspace, cancel).await?;

        let result = apply_privacy(&session, &specs, cancel).await;
        finish(&session, result).await
    }

    /// Forward `"<remote>:<local>"` specs until one forward stops.
    ///
    /// Blocks until every forward has unwound; always returns the error of
    /// the first forward to stop unless no specs were given.
    pub async fn forward_ports<S: AsRef<str>>(
        &self,
        workspace_name: &str,
        specs: &[S],
        cancel: &CancellationToken,
    ) -> Result<()> {
        let pairs = parse_port_pairs(specs)?;
        let workspace = self.resolve(workspace_name).await?;
        let session = Arc::new(self.connect(&workspace, cancel).await?);

        let result = forward_all(Arc::clone(&session), &pairs, self.bind_address, cancel).await;
        finish(session.as_ref(), result).await
    }

    async fn resolve(&self, workspace_name: &str) -> Result<Workspace> {
        self.backend
            .resolve(workspace_name)
            .await
            .map_err(|e| match e {
                ResolveError::NoWorkspaces => Error::NoWorkspaces,
                ResolveError::Other(source) => Error::Resolution(source),
            })
    }

    async fn connect(
        &self,
        workspace: &Workspace,
        cancel: &CancellationToken,
    ) -> Result<B::Session> {
        cancellable(cancel, self.backend.connect(workspace))
            .await?
            .map_err(Error::Connection)
    }
}

async fn apply_privacy<S: Session>(
    session: &S,
    specs: &[PrivacySpec],
    cancel: &CancellationToken,
) -> Result<()> {
    for spec in specs {
        cancellable(cancel, session.update_port_privacy(spec.port, &spec.privacy))
            .await?
            .map_err(|source| Error::Update {
                port: spec.port,
                source,
            })?;
        info!("Port {} is now {} scoped.", spec.port, spec.privacy);
    }
    Ok(())
}

/// Close `session`, keeping an earlier error over a close error.
async fn finish<S: Session, T>(session: &S, result: Result<T>) -> Result<T> {
    match (result, session.close().await) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(Error::Close(e)),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(e)) => {
            warn!("Failed to close session: {}", e);
            Err(err)
        }
    }
}

/// Run `fut` unless `cancel` fires first.
async fn cancellable<F: Future>(cancel: &CancellationToken, fut: F) -> Result<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        output = fut => Ok(output),
    }
}
