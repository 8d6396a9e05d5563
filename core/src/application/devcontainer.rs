//! Background fetch of devcontainer metadata.
//!
//! The fetch starts before the session is opened and is only awaited after
//! the shared ports have been listed, so the two round-trips overlap.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use crate::domain::{DevContainer, MetadataError, Workspace, DEV_CONTAINER_PATH};
use crate::ports::RepositoryContents;

/// Pending result of [`fetch_dev_container`].
///
/// The producer never waits for a reader. Dropping the handle cancels the
/// fetch if it is still running.
#[derive(Debug)]
pub struct DevContainerHandle {
    rx: oneshot::Receiver<Result<DevContainer, MetadataError>>,
    _guard: DropGuard,
}

impl DevContainerHandle {
    /// Wait for the fetch to finish and take its result.
    pub async fn result(self) -> Result<DevContainer, MetadataError> {
        self.rx.await.unwrap_or(Err(MetadataError::Abandoned))
    }
}

/// Start fetching the devcontainer metadata of `workspace` in the background.
///
/// A missing devcontainer file resolves to an empty [`DevContainer`].
pub fn fetch_dev_container<R>(
    contents: Arc<R>,
    workspace: Workspace,
    cancel: CancellationToken,
) -> DevContainerHandle
where
    R: RepositoryContents + 'static,
{
    let (tx, rx) = oneshot::channel();
    let cancel = cancel.child_token();
    let guard = cancel.clone().drop_guard();

    tokio::spawn(async move {
        let result = tokio::select! {
            _ = cancel.cancelled() => Err(MetadataError::Cancelled),
            result = load(contents.as_ref(), &workspace) => result,
        };
        // The receiver may be gone if the listing already failed.
        if tx.send(result).is_err() {
            debug!("devcontainer metadata for {} was not consumed", workspace.name);
        }
    });

    DevContainerHandle { rx, _guard: guard }
}

async fn load<R: RepositoryContents>(
    contents: &R,
    workspace: &Workspace,
) -> Result<DevContainer, MetadataError> {
    let bytes = contents
        .get_file(workspace, DEV_CONTAINER_PATH)
        .await
        .map_err(MetadataError::Fetch)?;

    match bytes {
        Some(bytes) => DevContainer::from_jsonc(&bytes),
        None => Ok(DevContainer::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteResult;

    struct StaticContents(Option<&'static [u8]>);

    impl RepositoryContents for StaticContents {
        async fn get_file(&self, _: &Workspace, path: &str) -> RemoteResult<Option<Vec<u8>>> {
            assert_eq!(path, DEV_CONTAINER_PATH);
            Ok(self.0.map(<[u8]>::to_vec))
        }
    }

    struct FailingContents;

    impl RepositoryContents for FailingContents {
        async fn get_file(&self, _: &Workspace, _: &str) -> RemoteResult<Option<Vec<u8>>> {
            Err("HTTP 502".into())
        }
    }

    struct PendingContents;

    impl RepositoryContents for PendingContents {
        async fn get_file(&self, _: &Workspace, _: &str) -> RemoteResult<Option<Vec<u8>>> {
            std::future::pending().await
        }
    }

    fn fetch<R: RepositoryContents + 'static>(contents: R) -> DevContainerHandle {
        fetch_dev_container(
            Arc::new(contents),
            Workspace::new("ws"),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dev_container = fetch(StaticContents(None)).result().await.unwrap();
        assert_eq!(dev_container, DevContainer::default());
    }

    #[tokio::test]
    async fn test_labels_are_parsed() {
        let handle = fetch(StaticContents(Some(
            br#"{"portsAttributes": {"8080": {"label": "api"},},}"#,
        )));
        let dev_container = handle.result().await.unwrap();
        assert_eq!(dev_container.label_for(8080), Some("api"));
    }

    #[tokio::test]
    async fn test_result_is_kept_until_read() {
        let handle = fetch(StaticContents(None));
        // Let the producer finish before anyone asks for the result.
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(handle.result().await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_failure() {
        let err = fetch(FailingContents).result().await.unwrap_err();
        assert!(matches!(err, MetadataError::Fetch(_)));
        let cause = std::error::Error::source(&err).unwrap();
        assert_eq!(cause.to_string(), "HTTP 502");
    }

    #[tokio::test]
    async fn test_invalid_contents() {
        let err = fetch(StaticContents(Some(b"{ not json")))
            .result()
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_cancelled() {
        let cancel = CancellationToken::new();
        let handle =
            fetch_dev_container(Arc::new(PendingContents), Workspace::new("ws"), cancel.clone());
        cancel.cancel();
        let err = handle.result().await.unwrap_err();
        assert!(matches!(err, MetadataError::Cancelled));
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_fetch() {
        let contents = Arc::new(PendingContents);
        let handle = fetch_dev_container(
            Arc::clone(&contents),
            Workspace::new("ws"),
            CancellationToken::new(),
        );
        tokio::task::yield_now().await;
        assert_eq!(Arc::strong_count(&contents), 2);

        drop(handle);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(Arc::strong_count(&contents), 1);
    }
}
