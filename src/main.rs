use std::path::PathBuf;

use clap::Parser;

use thunder::config::Config;
use thunder::server::Server;

/// Minimal HTTP/1.1 file server.
#[derive(Parser)]
#[command(name = "thunder", version)]
struct Cli {
    /// Port to listen on (binds all interfaces)
    port: u16,

    /// Directory served as the file root
    #[arg(long, env = "THUNDER_ROOT")]
    root: Option<PathBuf>,

    /// Optional YAML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    cfg.server.port = cli.port;
    if let Some(root) = cli.root {
        cfg.storage.root = root;
    }

    let server = Server::bind(&cfg).await?;

    tokio::select! {
        res = server.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
