use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use dirlens::core::config::ServerConfig;
use dirlens::core::telemetry::logging::init_logging;
use dirlens::models::{SortKey, SortOrder};
use dirlens::server::Server;

/// Serves directory listings with recursive sizes over HTTP.
#[derive(Debug, Parser)]
#[command(name = "dirlens", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "DIRLENS_ADDR", default_value = "127.0.0.1:5000")]
    addr: SocketAddr,

    /// Directory listed when a request has no `path` parameter.
    #[arg(long, env = "DIRLENS_DEFAULT_PATH", default_value = ".")]
    default_path: PathBuf,

    #[arg(long, env = "DIRLENS_SORT", value_enum, default_value_t = SortKey::Name)]
    sort: SortKey,

    #[arg(long, env = "DIRLENS_ORDER", value_enum, default_value_t = SortOrder::Asc)]
    order: SortOrder,

    /// Log filter directives, e.g. `dirlens=debug`. `RUST_LOG` takes precedence.
    #[arg(long, env = "DIRLENS_LOG")]
    log: Option<String>,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig::new(self.addr, self.default_path).with_sort(self.sort, self.order)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());

    let config = cli.into_config();
    let addr = config.addr;

    Server::new(config)
        .run(shutdown_signal())
        .await
        .with_context(|| format!("server on {} failed", addr))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
