use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::audit::AuditLog;
use crate::server::tracker::ConnectionTracker;
use crate::storage::FileStore;

/// Shared handles every connection task carries.
#[derive(Clone)]
pub struct ServerState {
    pub tracker: ConnectionTracker,
    pub store: FileStore,
    pub audit: AuditLog,
}

pub struct Server {
    listener: TcpListener,
    state: ServerState,
}

impl Server {
    /// Binds the listening socket and prepares the file root, audit log
    /// and connection tracker.
    pub async fn bind(cfg: &Config) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&cfg.storage.root).await?;

        let state = ServerState {
            tracker: ConnectionTracker::new(cfg.timeouts.idle_budget()),
            store: FileStore::new(&cfg.storage.root),
            audit: AuditLog::open(&cfg.storage.root).await?,
        };

        let listener = TcpListener::bind(cfg.listen_addr()).await?;
        info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared state, cloneable; lets callers observe the active count.
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// Accepts connections forever, one supervisor task per connection.
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            let (socket, peer) = self.listener.accept().await?;

            // Acquired before the supervisor's first read, so even the
            // first timeout computation counts this connection.
            let permit = self.state.tracker.acquire();
            info!("Accepted connection from {}", peer);
            self.state
                .audit
                .connection_opened(peer, self.state.tracker.active())
                .await;

            let state = self.state.clone();
            tokio::spawn(async move {
                let mut conn = Connection::new(socket, peer, permit, state);
                conn.run().await;
            });
        }
    }
}
