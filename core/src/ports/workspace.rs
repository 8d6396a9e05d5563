//! Workspace resolution port (interface).

use thiserror::Error;

use crate::domain::Workspace;
use crate::error::BoxError;

/// Why a workspace could not be resolved.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The user has no workspaces at all.
    #[error("no workspaces available")]
    NoWorkspaces,

    #[error(transparent)]
    Other(BoxError),
}

/// Port for turning a user-supplied name into a workspace.
pub trait WorkspaceResolver: Send + Sync {
    /// Resolve `name`; an empty name lets the implementation choose.
    fn resolve(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Workspace, ResolveError>> + Send;
}
