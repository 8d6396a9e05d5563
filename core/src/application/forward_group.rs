//! Fail-fast group of port forwards sharing one session.
//!
//! Every pair runs in its own task. The first task to finish, for whatever
//! reason, cancels the shared scope so that all siblings unwind and release
//! their listeners. The group returns once every task has finished.

use std::net::IpAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::PortPair;
use crate::error::{Error, Result};
use crate::ports::{Forwarder, Session};

/// Forward every pair concurrently until one of them stops.
///
/// Returns the error of the first task to complete. `parent` cancellation
/// stops the whole group. An empty list of pairs succeeds immediately.
pub async fn forward_all<S>(
    session: Arc<S>,
    pairs: &[PortPair],
    bind_address: IpAddr,
    parent: &CancellationToken,
) -> Result<()>
where
    S: Session + 'static,
{
    let scope = parent.child_token();
    let mut tasks = JoinSet::new();

    for &pair in pairs {
        let session = Arc::clone(&session);
        let scope = scope.clone();
        tasks.spawn(forward_pair(session, pair, bind_address, scope));
    }

    let mut first = None;
    while let Some(joined) = tasks.join_next().await {
        scope.cancel();

        let err = match joined {
            Ok(err) => err,
            Err(join_err) => Error::Io(std::io::Error::other(join_err)),
        };
        if first.is_none() {
            first = Some(err);
        } else {
            debug!("Discarding error from sibling forward: {}", err);
        }
    }

    match first {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Serve one pair; the returned value is why the forward stopped.
async fn forward_pair<S>(
    session: Arc<S>,
    pair: PortPair,
    bind_address: IpAddr,
    scope: CancellationToken,
) -> Error
where
    S: Session + 'static,
{
    let listener = match TcpListener::bind((bind_address, pair.local)).await {
        Ok(listener) => listener,
        Err(source) => {
            return Error::Bind {
                port: pair.local,
                source,
            }
        }
    };

    info!("Forwarding ports: {}", pair);

    let name = format!("share-{}", pair.remote);
    let forwarder = session.new_forwarder(&name, pair.remote);
    Error::Forward {
        port: pair.remote,
        source: forwarder.run(scope, listener).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RemotePort;
    use crate::error::{BoxError, RemoteResult};
    use parking_lot::Mutex;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    /// Session whose forwarders park until cancelled and record what they saw.
    #[derive(Default)]
    struct ParkingSession {
        events: Mutex<Vec<String>>,
    }

    struct ParkingForwarder {
        session: Arc<ParkingSession>,
        name: String,
    }

    impl Session for ParkingSession {
        type Forwarder = ParkingForwarder;

        async fn list_shared_ports(&self) -> RemoteResult<Vec<RemotePort>> {
            Ok(Vec::new())
        }

        async fn update_port_privacy(&self, _: i64, _: &str) -> RemoteResult<()> {
            Ok(())
        }

        fn new_forwarder(self: Arc<Self>, name: &str, _: i64) -> ParkingForwarder {
            self.events.lock().push(format!("new {}", name));
            ParkingForwarder {
                session: self,
                name: name.to_string(),
            }
        }

        async fn close(&self) -> RemoteResult<()> {
            Ok(())
        }
    }

    impl Forwarder for ParkingForwarder {
        async fn run(self, cancel: CancellationToken, _listener: TcpListener) -> BoxError {
            cancel.cancelled().await;
            self.session
                .events
                .lock()
                .push(format!("cancelled {}", self.name));
            "forwarder stopped".into()
        }
    }

    async fn free_port() -> u16 {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_bind_failure_cancels_siblings() {
        let free = free_port().await;
        let taken = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let taken_port = taken.local_addr().unwrap().port();

        let session = Arc::new(ParkingSession::default());
        let pairs = [
            PortPair { remote: 8080, local: free },
            PortPair { remote: 9090, local: taken_port },
        ];

        let err = forward_all(Arc::clone(&session), &pairs, LOCALHOST, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Bind { port, .. } if port == taken_port));
        let events = session.events.lock().clone();
        assert_eq!(events, vec!["new share-8080", "cancelled share-8080"]);

        // The first listener was released when its forward unwound.
        TcpListener::bind((LOCALHOST, free)).await.unwrap();
    }

    #[tokio::test]
    async fn test_parent_cancellation_stops_all() {
        let (first, second) = (
            TcpListener::bind((LOCALHOST, 0)).await.unwrap(),
            TcpListener::bind((LOCALHOST, 0)).await.unwrap(),
        );
        let a = first.local_addr().unwrap().port();
        let b = second.local_addr().unwrap().port();
        drop((first, second));
        let session = Arc::new(ParkingSession::default());
        let parent = CancellationToken::new();
        let pairs = [
            PortPair { remote: 3000, local: a },
            PortPair { remote: 3001, local: b },
        ];

        let cancel = parent.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            cancel.cancel();
        });

        let err = forward_all(Arc::clone(&session), &pairs, LOCALHOST, &parent)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Forward { .. }));
        let events = session.events.lock().clone();
        assert!(events.contains(&"cancelled share-3000".to_string()));
        assert!(events.contains(&"cancelled share-3001".to_string()));
    }

    #[tokio::test]
    async fn test_no_pairs() {
        let session = Arc::new(ParkingSession::default());
        forward_all(session, &[], LOCALHOST, &CancellationToken::new())
            .await
            .unwrap();
    }
}
