//! Spaceport Core Library
//!
//! Manages the ports exposed by a live remote development session.
//! Provides functionality to:
//! - List shared ports with labels taken from the workspace's devcontainer.json
//! - Change the privacy of shared ports
//! - Forward shared ports to local listeners as one fail-fast group
//!
//! # Architecture
//! This library follows hexagonal architecture (ports & adapters):
//! - `domain`: Pure data models and parsers
//! - `ports`: Trait definitions (interfaces) for the session and its collaborators
//! - `adapters`: Local implementations of those traits
//! - `application`: Use case services
//!
//! # Example
//!
//! ```no_run
//! use spaceport_core::{ConfigStore, LocalBackend, PortService};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> spaceport_core::Result<()> {
//! let service = PortService::new(LocalBackend::new(ConfigStore::new()?));
//! for row in service.list_ports("", &CancellationToken::new()).await? {
//!     println!("{} {} {}", row.port, row.privacy, row.browse_url);
//! }
//! # Ok(())
//! # }
//! ```

// Hexagonal architecture layers
pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub mod config;
pub mod error;

// Re-export domain types (primary API)
pub use domain::{
    parse_port_pairs, parse_privacy_specs, DevContainer, PortPair, PortRow, PrivacySpec,
    RemotePort, Workspace,
};

// Re-export other commonly used types
pub use adapters::{LocalBackend, PortScanner};
pub use application::PortService;
pub use config::{Config, ConfigStore, WorkspaceEntry};
pub use error::{BoxError, Error, RemoteResult, Result};
