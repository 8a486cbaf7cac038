//! HTTP server lifecycle.
//!
//! Binds the listener, installs middleware and runs `axum::serve` on a
//! background task that can be stopped through a [`ServerHandle`].

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Router,
    http::{HeaderName, Method, header},
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::{AppState, router};
use crate::config::ServerConfig;

/// Errors that can occur when starting the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Permissive development CORS: any origin, with credentials.
pub fn dev_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("custom-header"),
        ])
}

/// Router with tracing and, when enabled, CORS.
pub fn build_app(config: &ServerConfig) -> Router {
    let mut app = router(AppState::from_config(config)).layer(TraceLayer::new_for_http());

    if config.enable_cors {
        app = app.layer(dev_cors());
    }

    app
}

/// Handle for controlling a running server
pub struct ServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    /// Bound address (resolved when port 0 was requested)
    pub addr: SocketAddr,
    running: Arc<AtomicBool>,
}

impl ServerHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Signal shutdown and wait for in-flight streams to finish.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            info!("Stopping dev server");
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Bind and start serving in the background.
pub async fn start_server(config: ServerConfig) -> Result<ServerHandle, ServerError> {
    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    let addr = listener.local_addr()?;

    let app = build_app(&config);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let running = Arc::new(AtomicBool::new(true));

    info!(addr = %addr, cors = config.enable_cors, token_delay_ms = config.token_delay_ms, "Starting dev server");

    let running_clone = Arc::clone(&running);
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Dev server shutting down");
            })
            .await
            .map_err(|e| error!(error = %e, "Dev server error"))
            .ok();

        running_clone.store(false, Ordering::SeqCst);
    });

    Ok(ServerHandle {
        shutdown_tx: Some(shutdown_tx),
        task: Some(task),
        addr,
        running,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn local_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_server_start_stop() {
        let mut handle = start_server(local_config()).await.unwrap();
        assert!(handle.is_running());
        assert_ne!(handle.addr.port(), 0);

        handle.stop().await;
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_bind_error() {
        let first = start_server(local_config()).await.unwrap();
        let taken = ServerConfig {
            port: first.addr.port(),
            ..local_config()
        };

        let result = start_server(taken).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let app = build_app(&local_config());

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/chat")
                    .header("Origin", "http://localhost:5173")
                    .header("Access-Control-Request-Method", "POST")
                    .header("Access-Control-Request-Headers", "content-type,custom-header")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(allowed.contains("custom-header"));
    }

    #[tokio::test]
    async fn test_cors_disabled() {
        let config = ServerConfig {
            enable_cors: false,
            ..local_config()
        };
        let app = build_app(&config);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("Origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
