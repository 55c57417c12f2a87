//! HTTP server for mock management and dispatch.

use crate::admin_api::router::route_request;
use crate::dispatch::Dispatcher;
use crate::mocks::MockManager;
use crate::store::MockStore;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Shared state handed to every request.
pub struct AppState {
    pub manager: MockManager,
    pub dispatcher: Dispatcher,
    pub workspaces_enabled: bool,
}

impl AppState {
    pub fn new(store: Arc<MockStore>, workspaces_enabled: bool) -> Self {
        Self {
            manager: MockManager::new(Arc::clone(&store)),
            dispatcher: Dispatcher::new(store),
            workspaces_enabled,
        }
    }
}

/// Mock server: management API and dispatch on one listener
pub struct MirageServer {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl MirageServer {
    /// Bind to `addr`. Port 0 picks an ephemeral port.
    pub async fn bind(addr: SocketAddr, state: Arc<AppState>) -> Result<Self, anyhow::Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, state })
    }

    pub fn from_listener(listener: TcpListener, state: Arc<AppState>) -> Self {
        Self { listener, state }
    }

    pub fn local_addr(&self) -> Result<SocketAddr, anyhow::Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the process is stopped
    pub async fn run(self) -> Result<(), anyhow::Error> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves. In-flight connections finish on
    /// their own tasks.
    pub async fn run_until(
        self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), anyhow::Error> {
        let addr = self.local_addr()?;
        info!(
            workspaces = self.state.workspaces_enabled,
            "Mirage listening on http://{}", addr
        );

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer)) => {
                            let io = TokioIo::new(stream);
                            let state = Arc::clone(&self.state);

                            tokio::spawn(async move {
                                let service = service_fn(move |req| {
                                    let state = Arc::clone(&state);
                                    async move { route_request(req, state).await }
                                });

                                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                                    debug!("Connection error from {}: {}", peer, e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error on {}: {}", addr, e);
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("Mirage on {} shutting down", addr);
                    return Ok(());
                }
            }
        }
    }
}
