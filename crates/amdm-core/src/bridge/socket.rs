//! Unix-socket transport for the backend bridge.
//!
//! Requests go out as JSON lines `{"id": N, "command": "...", "params": ...}`.
//! Each inbound line is either a response `{"id": N, "result": ...}` or
//! `{"id": N, "error": "..."}` matched to a pending request, or a pushed
//! event `{"event": "...", "data": ...}` fanned out to subscribers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::{broadcast, oneshot};

use crate::config::AmdmConfig;
use crate::settings::SettingsRecord;

use super::error::BridgeError;
use super::events::{BackendEvent, EventSubscription};
use super::types::{CookieStatus, DependencyReport, DownloadId, ToolKind, ToolStatus};
use super::Backend;

/// Default socket the backend service listens on.
pub fn default_socket_path() -> std::io::Result<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("amdm")?;
    Ok(dirs.get_state_home().join("backend.sock"))
}

type PendingMap = Mutex<HashMap<u64, oneshot::Sender<Result<Value, BridgeError>>>>;

struct SocketInner {
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: PendingMap,
    next_id: AtomicU64,
    events: broadcast::Sender<BackendEvent>,
    timeout: Duration,
}

/// [`Backend`] implementation over a Unix domain socket.
///
/// Cloning shares the connection. Dropping the last clone closes the
/// socket, which ends the reader task, fails any in-flight requests with
/// [`BridgeError::Disconnected`], and terminates all event subscriptions.
#[derive(Clone)]
pub struct SocketBackend {
    inner: Arc<SocketInner>,
}

impl SocketBackend {
    /// Connects to the backend socket at `path`. Requests that get no
    /// response within `timeout` fail with [`BridgeError::Timeout`].
    pub async fn connect(path: &Path, timeout: Duration) -> Result<Self, BridgeError> {
        let stream = UnixStream::connect(path).await.map_err(|e| {
            BridgeError::Transport(format!("connect {}: {}", path.display(), e))
        })?;
        let (read_half, write_half) = stream.into_split();
        let (events, _) = broadcast::channel(256);
        let inner = Arc::new(SocketInner {
            writer: tokio::sync::Mutex::new(write_half),
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            events,
            timeout,
        });
        tokio::spawn(read_loop(Arc::clone(&inner), read_half));
        tracing::debug!(path = %path.display(), "connected to backend");
        Ok(Self { inner })
    }

    /// Connects using the configured socket path, or the default one.
    pub async fn connect_default(cfg: &AmdmConfig) -> Result<Self, BridgeError> {
        let path = match &cfg.socket_path {
            Some(path) => path.clone(),
            None => default_socket_path()
                .map_err(|e| BridgeError::Transport(format!("resolve socket path: {}", e)))?,
        };
        Self::connect(&path, cfg.request_timeout()).await
    }

    async fn request(&self, command: &str, params: Value) -> Result<Value, BridgeError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let frame = RequestFrame {
            id,
            command,
            params,
        };
        let mut line = serde_json::to_string(&frame)
            .map_err(|e| BridgeError::Transport(format!("encode {}: {}", command, e)))?;
        line.push('\n');

        let (tx, rx) = oneshot::channel();
        self.inner.pending.lock().unwrap().insert(id, tx);

        {
            let mut writer = self.inner.writer.lock().await;
            if let Err(e) = writer.write_all(line.as_bytes()).await {
                self.inner.pending.lock().unwrap().remove(&id);
                return Err(BridgeError::Transport(format!("write {}: {}", command, e)));
            }
        }
        tracing::debug!(id, command, "request sent");

        match tokio::time::timeout(self.inner.timeout, rx).await {
            Ok(Ok(result)) => result,
            // The reader dropped our sender without answering.
            Ok(Err(_)) => Err(BridgeError::Disconnected),
            Err(_) => {
                self.inner.pending.lock().unwrap().remove(&id);
                Err(BridgeError::Timeout)
            }
        }
    }
}

async fn read_loop(inner: Arc<SocketInner>, read_half: OwnedReadHalf) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match decode_frame(line) {
                    Ok(InboundFrame::Response { id, result }) => {
                        let sender = inner.pending.lock().unwrap().remove(&id);
                        match sender {
                            Some(tx) => {
                                let _ = tx.send(result);
                            }
                            None => tracing::debug!(id, "response for unknown request"),
                        }
                    }
                    Ok(InboundFrame::Event(event)) => {
                        let _ = inner.events.send(event);
                    }
                    Err(e) => tracing::warn!("bad frame from backend: {}", e),
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("backend socket read: {}", e);
                break;
            }
        }
    }
    // Fail whatever is still waiting; nothing will answer now.
    let mut pending = inner.pending.lock().unwrap();
    for (_, tx) in pending.drain() {
        let _ = tx.send(Err(BridgeError::Disconnected));
    }
}

#[derive(Serialize)]
struct RequestFrame<'a> {
    id: u64,
    command: &'a str,
    #[serde(skip_serializing_if = "Value::is_null")]
    params: Value,
}

#[derive(Deserialize)]
struct RawResponse {
    id: u64,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug)]
pub(crate) enum InboundFrame {
    Response {
        id: u64,
        result: Result<Value, BridgeError>,
    },
    Event(BackendEvent),
}

/// Classifies one inbound line: anything with an `id` is a response,
/// anything else must parse as an event.
pub(crate) fn decode_frame(line: &str) -> Result<InboundFrame, serde_json::Error> {
    let value: Value = serde_json::from_str(line)?;
    if value.get("id").is_some() {
        let raw: RawResponse = serde_json::from_value(value)?;
        let result = match raw.error {
            Some(message) => Err(BridgeError::Backend(message)),
            None => Ok(raw.result.unwrap_or(Value::Null)),
        };
        Ok(InboundFrame::Response { id: raw.id, result })
    } else {
        let event: BackendEvent = serde_json::from_value(value)?;
        Ok(InboundFrame::Event(event))
    }
}

fn decode_result<T: serde::de::DeserializeOwned>(
    command: &str,
    value: Value,
) -> Result<T, BridgeError> {
    serde_json::from_value(value)
        .map_err(|e| BridgeError::Transport(format!("{} response: {}", command, e)))
}

#[async_trait]
impl Backend for SocketBackend {
    async fn get_settings(&self) -> Result<SettingsRecord, BridgeError> {
        let value = self.request("get_settings", Value::Null).await?;
        decode_result("get_settings", value)
    }

    async fn save_settings(&self, record: &SettingsRecord) -> Result<(), BridgeError> {
        let params = serde_json::to_value(record)
            .map_err(|e| BridgeError::Transport(format!("encode settings: {}", e)))?;
        self.request("save_settings", params).await?;
        Ok(())
    }

    async fn dependency_report(&self) -> Result<DependencyReport, BridgeError> {
        let value = self.request("dependency_report", Value::Null).await?;
        decode_result("dependency_report", value)
    }

    async fn check_tool(&self, tool: ToolKind) -> Result<ToolStatus, BridgeError> {
        let value = self
            .request("check_tool", serde_json::json!({ "tool": tool }))
            .await?;
        decode_result("check_tool", value)
    }

    async fn install_tool(&self, tool: ToolKind) -> Result<(), BridgeError> {
        self.request("install_tool", serde_json::json!({ "tool": tool }))
            .await?;
        Ok(())
    }

    async fn validate_cookies(&self) -> Result<CookieStatus, BridgeError> {
        let value = self.request("validate_cookies", Value::Null).await?;
        decode_result("validate_cookies", value)
    }

    async fn import_cookies(&self, path: &str) -> Result<CookieStatus, BridgeError> {
        let value = self
            .request("import_cookies", serde_json::json!({ "path": path }))
            .await?;
        decode_result("import_cookies", value)
    }

    async fn enqueue_download(&self, url: &str) -> Result<DownloadId, BridgeError> {
        let value = self
            .request("enqueue_download", serde_json::json!({ "url": url }))
            .await?;
        decode_result("enqueue_download", value)
    }

    async fn is_setup_complete(&self) -> Result<bool, BridgeError> {
        let value = self.request("is_setup_complete", Value::Null).await?;
        decode_result("is_setup_complete", value)
    }

    async fn mark_setup_complete(&self) -> Result<(), BridgeError> {
        self.request("mark_setup_complete", Value::Null).await?;
        Ok(())
    }

    fn subscribe(&self) -> EventSubscription {
        EventSubscription::new(self.inner.events.subscribe())
    }
}
