use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::{JoinHandle, JoinSet};
use tracing::info;

use crate::config::Config;
use crate::http::connection::{Connection, Limits};
use crate::server::handler::Handler;

/// Handle to a running accept loop.
///
/// Dropping the handle does not stop the server; call [`Server::close`].
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Listens on every interface at `port` with default settings.
    pub async fn serve<H: Handler>(port: u16, handler: H) -> anyhow::Result<Self> {
        let cfg = Config {
            listen_addr: format!("0.0.0.0:{}", port),
            ..Config::default()
        };
        Self::bind(&cfg, handler).await
    }

    /// Binds `cfg.listen_addr` and starts accepting in the background.
    pub async fn bind<H: Handler>(cfg: &Config, handler: H) -> anyhow::Result<Self> {
        cfg.validate()?;

        let listener = TcpListener::bind(&cfg.listen_addr)
            .await
            .with_context(|| format!("Failed to bind {}", cfg.listen_addr))?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let closed = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(Notify::new());
        let accept_task = tokio::spawn(accept_loop(
            listener,
            Arc::new(handler),
            closed.clone(),
            shutdown.clone(),
            cfg.limits(),
        ));

        Ok(Self {
            local_addr,
            closed,
            shutdown,
            accept_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stops accepting new connections. In-flight connections run to completion.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.shutdown.notify_one();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Waits for the accept loop to exit and every accepted connection to finish.
    pub async fn wait(self) -> anyhow::Result<()> {
        self.accept_task.await.context("Accept loop panicked")
    }
}

async fn accept_loop<H: Handler>(
    listener: TcpListener,
    handler: Arc<H>,
    closed: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    limits: Limits,
) {
    let mut connections = JoinSet::new();

    loop {
        let accepted = tokio::select! {
            res = listener.accept() => res,
            Some(finished) = connections.join_next(), if !connections.is_empty() => {
                reap(finished);
                continue;
            }
            _ = shutdown.notified() => break,
        };

        if closed.load(Ordering::Acquire) {
            break;
        }

        let (socket, peer) = match accepted {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(error = %e, "Accept failed, stopping listener");
                break;
            }
        };
        info!("Accepted connection from {}", peer);

        let handler = handler.clone();
        connections.spawn(async move {
            let conn = Connection::new(socket, limits);
            if let Err(e) = conn.run(handler.as_ref()).await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }

    drop(listener);
    info!(in_flight = connections.len(), "Listener stopped, draining connections");

    while let Some(finished) = connections.join_next().await {
        reap(finished);
    }
    info!("All connections closed");
}

fn reap(finished: Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        tracing::error!(error = %e, "Connection task panicked");
    }
}
