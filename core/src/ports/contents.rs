//! Repository contents port (interface).

use crate::domain::Workspace;
use crate::error::RemoteResult;

/// Port for reading files from the repository backing a workspace.
pub trait RepositoryContents: Send + Sync {
    /// Fetch the bytes of `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    fn get_file(
        &self,
        workspace: &Workspace,
        path: &str,
    ) -> impl std::future::Future<Output = RemoteResult<Option<Vec<u8>>>> + Send;
}
