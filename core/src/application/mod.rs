//! Application layer - Use case services.
//!
//! This module contains application services that orchestrate
//! domain logic and adapter interactions.
//!
//! Services are designed to be thin orchestrators that:
//! - Accept domain types as inputs
//! - Use ports (traits) for external dependencies
//! - Return domain types as outputs

mod devcontainer;
mod forward_group;
mod port_service;

pub use devcontainer::{fetch_dev_container, DevContainerHandle};
pub use forward_group::forward_all;
pub use port_service::PortService;
