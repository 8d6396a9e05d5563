//! Error types for the spaceport-core library.

use thiserror::Error;

/// Result type alias for spaceport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Opaque error reported by a collaborator (session, resolver, contents API).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type returned by collaborator traits.
pub type RemoteResult<T> = std::result::Result<T, BoxError>;

/// Errors that can occur while managing the ports of a workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// There is no workspace to operate on.
    ///
    /// Never wrapped, so callers can match on it directly.
    #[error("no workspaces available")]
    NoWorkspaces,

    /// A port spec or other user input is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to resolve the workspace.
    #[error("error choosing workspace")]
    Resolution(#[source] BoxError),

    /// Failed to open the remote session.
    #[error("error connecting to session")]
    Connection(#[source] BoxError),

    /// Failed to list the shared ports of the session.
    #[error("error getting ports of shared servers")]
    Query(#[source] BoxError),

    /// Failed to change the privacy of a port.
    #[error("error updating privacy of port {port}")]
    Update {
        port: i64,
        #[source]
        source: BoxError,
    },

    /// Failed to close the remote session.
    #[error("error closing session")]
    Close(#[source] BoxError),

    /// Failed to bind a local listener.
    #[error("failed to listen on local port {port}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// A port forward terminated.
    #[error("forwarding of remote port {port} stopped")]
    Forward {
        port: i64,
        #[source]
        source: BoxError,
    },

    /// The operation was cancelled by the caller.
    #[error("operation cancelled")]
    Cancelled,

    /// Failed to execute a system command.
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("Failed to parse output: {0}")]
    ParseError(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Platform not supported.
    #[error("Platform not supported: {0}")]
    UnsupportedPlatform(String),
}
