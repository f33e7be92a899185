//! HTTP server wiring.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use super::handler::router;
use crate::error::Result;
use crate::ratelimit::RateLimiter;
use crate::store::WindowStore;

/// HTTP server for the admission-check endpoint.
pub struct HttpServer<S: WindowStore + 'static> {
    /// Address to bind to
    addr: SocketAddr,
    /// The rate limiter instance
    limiter: Arc<RateLimiter<S>>,
}

impl<S: WindowStore + 'static> HttpServer<S> {
    /// Create a new server over the given limiter.
    pub fn new(addr: SocketAddr, limiter: Arc<RateLimiter<S>>) -> Self {
        Self { addr, limiter }
    }

    /// Start the server with graceful shutdown.
    ///
    /// The server drains and stops when the provided signal resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = router(self.limiter);

        info!(addr = %self.addr, "Starting HTTP server for admission checks");

        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(signal)
        .await
        .map_err(|e| {
            error!(error = %e, "HTTP server failed");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratelimit::LimitConfig;
    use crate::store::MemoryStore;

    #[test]
    fn test_server_creation() {
        let addr: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let limiter = Arc::new(RateLimiter::new(
            MemoryStore::new(),
            LimitConfig {
                max_requests: 15,
                delay_secs: 60,
            },
        ));
        let _server = HttpServer::new(addr, limiter);
    }
}
