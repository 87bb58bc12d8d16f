use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use chapter_server::{start_server, Config};

/// Self-hosted book-club coordinator
#[derive(Debug, Parser)]
#[command(name = "chapter-server", version)]
struct Args {
    /// Address to listen on (overrides CHAPTER_LISTEN)
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Snapshot file (overrides CHAPTER_DATA)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Keep all state in memory, never touch disk
    #[arg(long)]
    ephemeral: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = Config::load();
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if args.ephemeral {
        config.data_path = None;
    } else if let Some(data) = args.data {
        config.data_path = Some(data);
    }

    start_server(config).await
}
