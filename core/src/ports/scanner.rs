//! Listening port scanner port (interface).

use crate::domain::ListeningPort;
use crate::error::Result;

/// Port for scanning local listening sockets.
///
/// Implementations handle platform-specific details (ss, lsof, etc.)
pub trait PortScannerPort: Send + Sync {
    /// Scan for all listening TCP ports, sorted by port number.
    fn scan(&self) -> impl std::future::Future<Output = Result<Vec<ListeningPort>>> + Send;
}
