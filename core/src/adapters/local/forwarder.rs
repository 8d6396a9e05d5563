//! TCP forwarder for local workspaces.
//!
//! Accepts connections on the listener handed to [`Forwarder::run`] and pipes
//! each one to `host:port` of the workspace. Connections still open when the
//! forwarder stops are aborted.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::BoxError;
use crate::ports::Forwarder;

/// Why a [`TcpForwarder`] stopped.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("port forward {0} cancelled")]
    Cancelled(String),

    #[error("port forward {name}: remote port {port} is outside 0-65535")]
    InvalidPort { name: String, port: i64 },

    #[error("port forward {name} stopped accepting connections")]
    Accept {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Forwards accepted connections to `host:port`.
#[derive(Debug, Clone)]
pub struct TcpForwarder {
    name: String,
    host: String,
    port: i64,
}

impl TcpForwarder {
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: i64) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
        }
    }

    /// Name of this forward, e.g. `share-8080`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address connections are forwarded to.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Forwarder for TcpForwarder {
    async fn run(self, cancel: CancellationToken, listener: TcpListener) -> BoxError {
        if u16::try_from(self.port).is_err() {
            return Box::new(ForwardError::InvalidPort {
                name: self.name,
                port: self.port,
            });
        }

        let target = self.target();
        let mut connections = JoinSet::new();

        let reason = loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Port forward {} stopped", self.name);
                    break ForwardError::Cancelled(self.name.clone());
                }

                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        connections.spawn(pipe(stream, peer, target.clone()));
                    }
                    Err(source) => {
                        break ForwardError::Accept {
                            name: self.name.clone(),
                            source,
                        };
                    }
                },

                // Reap finished connections
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        };

        connections.shutdown().await;
        Box::new(reason)
    }
}

async fn pipe(mut client: TcpStream, peer: SocketAddr, target: String) {
    let mut upstream = match TcpStream::connect(&target).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!("Failed to connect {} to {}: {}", peer, target, e);
            return;
        }
    };

    // Disable Nagle's algorithm for low-latency forwarding
    if let Err(e) = client.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }

    match tokio::io::copy_bidirectional(&mut client, &mut upstream).await {
        Ok((sent, received)) => {
            debug!("Connection from {} closed ({} bytes out, {} bytes in)", peer, sent, received)
        }
        Err(e) => debug!("Connection from {} failed: {}", peer, e),
    }
}
