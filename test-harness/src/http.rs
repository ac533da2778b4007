//! HTTP plumbing shared by integration tests.
//!
//! Everything here exists to keep test runs from hanging: requests carry a
//! hard timeout, proxies are bypassed so localhost stays localhost, and
//! servers come with a shutdown handle so they never outlive their test.

use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(1);
const READY_TIMEOUT: Duration = Duration::from_secs(1);
const READY_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn build_test_client() -> Result<Client> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("build test http client")
}

/// Polls until `addr` accepts a TCP connection, for at most one second.
pub async fn wait_for_listen(addr: SocketAddr) -> Result<()> {
    let probe = async {
        while TcpStream::connect(addr).await.is_err() {
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    };
    tokio::time::timeout(READY_TIMEOUT, probe)
        .await
        .map_err(|_| anyhow!("server not ready at {addr} within {READY_TIMEOUT:?}"))
}

/// Serves `router` on `listener` until the returned sender fires.
pub fn spawn_axum_with_shutdown(
    listener: TcpListener,
    router: axum::Router,
) -> (oneshot::Sender<()>, JoinHandle<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let serve = axum::serve(listener, router.into_make_service()).with_graceful_shutdown(async {
        let _ = shutdown_rx.await;
    });
    let handle = tokio::spawn(async move {
        let _ = serve.await;
    });
    (shutdown_tx, handle)
}
