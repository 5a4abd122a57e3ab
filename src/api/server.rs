use std::net::SocketAddr;

use axum::Router;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle to a running API server. Dropping it does not stop the
/// server; call `shutdown` first.
#[derive(Debug)]
pub struct ApiServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// Signal graceful shutdown. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("shutdown signal sent");
        }
    }

    /// Wait for the serve task to finish after `shutdown`.
    pub async fn stopped(self) {
        let _ = self.task.await;
    }
}

/// Bind the listener and serve `app` on a background task.
pub async fn start_server(app: Router, bind_addr: &str) -> Result<ApiServer, String> {
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .map_err(|e| format!("failed to bind {bind_addr}: {e}"))?;
    let addr = listener
        .local_addr()
        .map_err(|e| format!("failed to read server address: {e}"))?;

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        tracing::info!(%addr, "API server started");
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }
        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::router::api_router;
    use crate::api::types::ApiContext;
    use crate::db::open_in_memory;
    use crate::llm::MockChatClient;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_app() -> Router {
        let ctx = ApiContext::new(
            open_in_memory().unwrap(),
            Arc::new(MockChatClient::new()),
            None,
        );
        api_router(ctx)
    }

    #[tokio::test]
    async fn serves_requests_until_shutdown() {
        let mut server = start_server(test_app(), "127.0.0.1:0").await.unwrap();

        let url = format!("http://{}/api/health", server.addr);
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), 200);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent_and_stops_the_task() {
        let mut server = start_server(test_app(), "127.0.0.1:0").await.unwrap();
        server.shutdown();
        server.shutdown();

        tokio::time::timeout(Duration::from_secs(5), server.stopped())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn binding_a_taken_port_fails() {
        let server = start_server(test_app(), "127.0.0.1:0").await.unwrap();
        let err = start_server(test_app(), &server.addr.to_string())
            .await
            .unwrap_err();
        assert!(err.contains("failed to bind"));
    }
}
