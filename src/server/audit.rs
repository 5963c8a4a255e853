//! Append-only request/connection audit log.
//!
//! One line per event at `{root}/log.txt`, timestamped, never truncated
//! or rotated. Appends are serialized across connection tasks; a failed
//! append is reported on the console and never aborts the request that
//! triggered it.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::http::request::Method;

pub const LOG_FILE_NAME: &str = "log.txt";

#[derive(Debug, Clone)]
pub struct AuditLog {
    file: Arc<Mutex<File>>,
}

impl AuditLog {
    /// Opens (or creates) the log file under the given root directory.
    pub async fn open(root: &Path) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(root.join(LOG_FILE_NAME))
            .await?;

        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }

    pub async fn connection_opened(&self, peer: SocketAddr, active: usize) {
        self.append(format!(
            "New Connection <Active Connections: {}> | Client Address: {} | Client Port: {}",
            active,
            peer.ip(),
            peer.port()
        ))
        .await;
    }

    pub async fn request_received(&self, peer: SocketAddr, method: Method) {
        self.append(format!(
            "INFO | Request received | Method: {} | Client Address: {} | Client Port: {}",
            method.as_str(),
            peer.ip(),
            peer.port()
        ))
        .await;
    }

    pub async fn connection_timeout(&self, peer: SocketAddr, active: usize) {
        self.append(format!(
            "Connection Timeout <Active Connections: {}> | Client Address: {} | Client Port: {}",
            active,
            peer.ip(),
            peer.port()
        ))
        .await;
    }

    pub async fn connection_closed(&self, peer: SocketAddr, active: usize) {
        self.append(format!(
            "Connection Closed <Active Connections: {}> | Client Address: {} | Client Port: {}",
            active,
            peer.ip(),
            peer.port()
        ))
        .await;
    }

    // Best-effort: the caller has already awaited the append by the time
    // its response goes out, but an I/O failure here only warns.
    async fn append(&self, event: String) {
        let line = format!("{} | {}\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f"), event);

        let mut file = self.file.lock().await;
        if let Err(e) = file.write_all(line.as_bytes()).await {
            tracing::warn!("audit log write failed: {}", e);
            return;
        }
        if let Err(e) = file.flush().await {
            tracing::warn!("audit log flush failed: {}", e);
        }
    }
}
