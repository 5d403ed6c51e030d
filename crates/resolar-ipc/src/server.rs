//! IPC server and client over a Unix domain socket.

use crate::{error_codes, IpcError, IpcResult, Method, Request, Response};
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

/// Handler function type for IPC methods.
pub type HandlerFn =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

type Handlers = Arc<RwLock<HashMap<Method, HandlerFn>>>;

/// IPC server that listens on a Unix domain socket.
pub struct IpcServer {
    socket_path: String,
    handlers: Handlers,
    shutdown_tx: broadcast::Sender<()>,
}

impl IpcServer {
    pub fn new(socket_path: &str) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            socket_path: socket_path.to_string(),
            handlers: Arc::new(RwLock::new(HashMap::new())),
            shutdown_tx,
        }
    }

    /// Register a handler for a method. A later registration replaces an
    /// earlier one.
    pub async fn register_handler<F, Fut>(&self, method: Method, handler: F)
    where
        F: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let boxed_handler: HandlerFn = Box::new(move |req| Box::pin(handler(req)));
        self.handlers.write().await.insert(method, boxed_handler);
    }

    pub async fn has_handler(&self, method: Method) -> bool {
        self.handlers.read().await.contains_key(&method)
    }

    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Get a shutdown sender (for handlers that need to trigger shutdown).
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Start the server and serve connections until shutdown.
    pub async fn run(&self) -> IpcResult<()> {
        let socket_path = Path::new(&self.socket_path);
        if socket_path.exists() {
            std::fs::remove_file(socket_path)?;
        }
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let listener = UnixListener::bind(&self.socket_path)?;
        info!(path = %self.socket_path, "IPC server listening");

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _)) => {
                            let handlers = self.handlers.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, handlers).await {
                                    error!(error = %e, "Connection error");
                                }
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Accept error");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("IPC server shutting down");
                    break;
                }
            }
        }

        let _ = std::fs::remove_file(&self.socket_path);

        Ok(())
    }
}

async fn write_response(writer: &mut OwnedWriteHalf, response: &Response) -> IpcResult<()> {
    let response_json = response.to_json()?;
    writer.write_all(response_json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Serve requests on one connection until the client hangs up.
async fn handle_connection(stream: UnixStream, handlers: Handlers) -> IpcResult<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    debug!("Client connected");

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            debug!("Client disconnected");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Request lines can carry passwords; log the method only.
        let request = match Request::from_json(trimmed) {
            Ok(req) => req,
            Err(e) => {
                warn!(error = %e, "Failed to parse request");
                let response =
                    Response::error("", error_codes::PARSE_ERROR, &format!("Parse error: {}", e));
                write_response(&mut writer, &response).await?;
                continue;
            }
        };

        let request_id = request.id.clone();
        let method = request.method;
        debug!(id = %request_id, method = ?method, "Received request");

        // Only build the future under the lock; handlers can take a while.
        let pending = {
            let handlers = handlers.read().await;
            handlers.get(&method).map(|handler| handler(request))
        };
        let response = match pending {
            Some(future) => future.await,
            None => Response::error(
                &request_id,
                error_codes::METHOD_NOT_FOUND,
                &format!("Method not found: {:?}", method),
            ),
        };

        debug!(id = %request_id, success = response.is_success(), "Sending response");
        write_response(&mut writer, &response).await?;
    }

    Ok(())
}

/// IPC client for connecting to the daemon.
pub struct IpcClient {
    socket_path: String,
}

impl IpcClient {
    pub fn new(socket_path: &str) -> Self {
        Self {
            socket_path: socket_path.to_string(),
        }
    }

    /// Send a request and wait for its response.
    pub async fn call(&self, request: Request) -> IpcResult<Response> {
        let stream = UnixStream::connect(&self.socket_path)
            .await
            .map_err(|e| IpcError::Socket(format!("Failed to connect: {}", e)))?;

        let (reader, mut writer) = stream.into_split();
        let mut reader = BufReader::new(reader);

        let request_json = request.to_json()?;
        writer.write_all(request_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        let mut line = String::new();
        reader.read_line(&mut line).await?;

        if line.is_empty() {
            return Err(IpcError::ConnectionClosed);
        }

        let response = Response::from_json(line.trim())?;
        Ok(response)
    }

    pub async fn call_method(&self, method: Method) -> IpcResult<Response> {
        self.call(Request::new(method)).await
    }

    pub async fn call_method_with_params(
        &self,
        method: Method,
        params: serde_json::Value,
    ) -> IpcResult<Response> {
        self.call(Request::with_params(method, params)).await
    }

    pub async fn is_daemon_running(&self) -> bool {
        self.call_method(Method::Health).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn wait_for_socket(path: &Path) {
        for _ in 0..100 {
            if path.exists() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("socket {} never appeared", path.display());
    }

    #[tokio::test]
    async fn test_ipc_client_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let client = IpcClient::new(dir.path().join("missing.sock").to_str().unwrap());
        assert!(!client.is_daemon_running().await);

        let result = client.call_method(Method::Health).await;
        assert!(matches!(result, Err(IpcError::Socket(_))));
    }

    #[tokio::test]
    async fn test_ipc_server_shutdown() {
        let server = IpcServer::new("/tmp/resolar-test-unused.sock");
        let mut receiver = server.shutdown_receiver();

        server.shutdown();

        let result = tokio::time::timeout(Duration::from_millis(100), receiver.recv()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_register_handler_replaces() {
        let server = IpcServer::new("/tmp/resolar-test-unused.sock");
        assert!(!server.has_handler(Method::Health).await);

        server
            .register_handler(Method::Health, |req| async move {
                Response::success(&req.id, serde_json::json!({"status": "ok"}))
            })
            .await;

        assert!(server.has_handler(Method::Health).await);
        assert!(!server.has_handler(Method::AuthStatus).await);
    }

    #[tokio::test]
    async fn test_round_trip_over_socket() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("daemon.sock");
        let server = Arc::new(IpcServer::new(socket.to_str().unwrap()));

        server
            .register_handler(Method::SubjectsAdd, |req| async move {
                let name = req
                    .params
                    .as_ref()
                    .and_then(|p| p.get("name"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                Response::success(&req.id, serde_json::json!({ "name": name }))
            })
            .await;

        let running = server.clone();
        let task = tokio::spawn(async move { running.run().await });
        wait_for_socket(&socket).await;

        let client = IpcClient::new(socket.to_str().unwrap());
        let response = client
            .call_method_with_params(Method::SubjectsAdd, serde_json::json!({"name": "Math"}))
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.result.unwrap()["name"], "Math");

        let missing = client.call_method(Method::SubjectsList).await.unwrap();
        assert_eq!(missing.error.unwrap().code, error_codes::METHOD_NOT_FOUND);

        server.shutdown();
        task.await.unwrap().unwrap();
        assert!(!socket.exists());
    }

    #[tokio::test]
    async fn test_malformed_line_gets_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("daemon.sock");
        let server = Arc::new(IpcServer::new(socket.to_str().unwrap()));

        let running = server.clone();
        let task = tokio::spawn(async move { running.run().await });
        wait_for_socket(&socket).await;

        let stream = UnixStream::connect(&socket).await.unwrap();
        let (reader, mut writer) = stream.into_split();
        writer.write_all(b"{not json}\n").await.unwrap();

        let mut line = String::new();
        BufReader::new(reader).read_line(&mut line).await.unwrap();
        let response = Response::from_json(line.trim()).unwrap();
        assert_eq!(response.error.unwrap().code, error_codes::PARSE_ERROR);

        server.shutdown();
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_handler_can_register_while_running() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("daemon.sock");
        let server = Arc::new(IpcServer::new(socket.to_str().unwrap()));

        let inner = server.clone();
        server
            .register_handler(Method::Health, move |req| {
                let inner = inner.clone();
                async move {
                    inner
                        .register_handler(Method::SubjectsList, |req| async move {
                            Response::success(&req.id, serde_json::json!([]))
                        })
                        .await;
                    Response::success(&req.id, serde_json::json!({"status": "ok"}))
                }
            })
            .await;

        let running = server.clone();
        let task = tokio::spawn(async move { running.run().await });
        wait_for_socket(&socket).await;

        let client = IpcClient::new(socket.to_str().unwrap());
        let response = tokio::time::timeout(
            Duration::from_secs(2),
            client.call_method(Method::Health),
        )
        .await
        .expect("handler blocked on the handler table")
        .unwrap();
        assert!(response.is_success());
        assert!(server.has_handler(Method::SubjectsList).await);

        server.shutdown();
        task.await.unwrap().unwrap();
    }
}
