//! Remote session ports (interfaces).

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::domain::{RemotePort, Workspace};
use crate::error::{BoxError, RemoteResult};

/// Port for opening a session to a workspace.
pub trait SessionConnector: Send + Sync {
    /// The session type produced by this connector.
    type Session: Session + 'static;

    /// Open a live session to `workspace`.
    fn connect(
        &self,
        workspace: &Workspace,
    ) -> impl std::future::Future<Output = RemoteResult<Self::Session>> + Send;
}

/// A live connection to a remote collaboration runtime.
///
/// A session is opened once per command and closed exactly once.
pub trait Session: Send + Sync {
    /// Forwarder bound to this session.
    type Forwarder: Forwarder + 'static;

    /// List the ports currently shared by the remote environment.
    fn list_shared_ports(
        &self,
    ) -> impl std::future::Future<Output = RemoteResult<Vec<RemotePort>>> + Send;

    /// Change the privacy level of a shared port.
    ///
    /// The port range and privacy level are validated by the session, not by
    /// the caller.
    fn update_port_privacy(
        &self,
        port: i64,
        privacy: &str,
    ) -> impl std::future::Future<Output = RemoteResult<()>> + Send;

    /// Create a forwarder for `remote_port` named `name`.
    fn new_forwarder(self: Arc<Self>, name: &str, remote_port: i64) -> Self::Forwarder;

    /// Release the session.
    fn close(&self) -> impl std::future::Future<Output = RemoteResult<()>> + Send;
}

/// Forwards connections accepted on a local listener to a remote port.
pub trait Forwarder: Send {
    /// Serve `listener` until the forward terminates.
    ///
    /// Termination always produces an error, including when `cancel` fires.
    /// The listener is dropped when the returned future completes.
    fn run(
        self,
        cancel: CancellationToken,
        listener: TcpListener,
    ) -> impl std::future::Future<Output = BoxError> + Send;
}
