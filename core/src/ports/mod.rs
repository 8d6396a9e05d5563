//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`,
//! or are supplied by the embedding application.

mod contents;
mod scanner;
mod session;
mod workspace;

pub use contents::RepositoryContents;
pub use scanner::PortScannerPort;
pub use session::{Forwarder, Session, SessionConnector};
pub use workspace::{ResolveError, WorkspaceResolver};
