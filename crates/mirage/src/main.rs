use anyhow::Context;
use clap::Parser;
use mirage::backends::create_backend;
use mirage::config::{Config, LogFormat, Overrides};
use mirage::{AppState, MirageServer, MockStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mirage - mock HTTP server
#[derive(Parser, Debug)]
#[command(name = "mirage")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Port to listen on [default: 8080]
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long, env = "MIRAGE_HOST")]
    host: Option<String>,

    /// Serve mocks per workspace under /api/workspaces and /sarab/:workspaceId
    /// (`--workspaces` alone enables it, `--workspaces=false` disables it)
    #[arg(
        long,
        env = "WORKSPACE_ENABLED",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    workspaces: Option<bool>,

    /// Snapshot file for durable storage; ':memory:' keeps everything in memory
    #[arg(long, env = "MIRAGE_STORE_PATH")]
    store_path: Option<String>,

    /// Log line format
    #[arg(long, value_enum, env = "MIRAGE_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mirage=info".into());
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => Config::default(),
    };
    let config = base.with_overrides(Overrides {
        host: args.host,
        port: args.port,
        workspaces: args.workspaces,
        store_path: args.store_path,
        log_format: args.log_format,
    })?;

    init_tracing(config.logging.format);
    info!("mirage v{} starting", env!("CARGO_PKG_VERSION"));

    let backend = create_backend(&config.storage);
    let store = Arc::new(MockStore::open(backend).context("opening mock store")?);

    let state = Arc::new(AppState::new(store, config.workspaces.enabled));
    if !config.workspaces.enabled {
        state
            .manager
            .ensure_default_workspace()
            .context("creating default workspace")?;
    }

    let addr: SocketAddr = config
        .listen
        .address()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.listen.address()))?;
    let server = MirageServer::bind(addr, state).await?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Shutdown complete");
    Ok(())
}
