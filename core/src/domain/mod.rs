//! Domain layer - Pure data models and parsers.
//!
//! This module contains domain entities that represent core business concepts.
//! These types have no I/O dependencies and can be tested in isolation.

mod devcontainer;
mod port;
mod spec;

// Re-export all domain types
pub use devcontainer::{
    remove_trailing_commas, strip_comments, DevContainer, MetadataError, PortAttributes,
    DEV_CONTAINER_PATH,
};
pub use port::{
    browse_url, ListeningPort, PortRow, RemotePort, Workspace, DEFAULT_PREVIEW_DOMAIN,
    DEFAULT_PRIVACY,
};
pub use spec::{parse_port_pairs, parse_privacy_specs, PortPair, PrivacySpec};
