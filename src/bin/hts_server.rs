//! Signal transpiler HTTP server
//!
//! Serves POST /transpile and the highlighting front end.
//!
//! Settings come from the environment (PORT, HTS_BIND_ADDR, HTS_STATIC_DIR,
//! HTS_CONFIG, optionally via a .env file) and can be overridden on the
//! command line.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use signal_transpiler::api::{create_router, AppState};
use signal_transpiler::{ServerConfig, SignalTranspiler};

#[derive(Parser)]
#[command(name = "hts_server")]
#[command(version)]
#[command(about = "HTTP front end for the signal transpiler")]
struct Args {
    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// YAML file overriding the exchange registries and defaults
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Directory holding the front end
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signal_transpiler=info,tower_http=debug".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(path) = args.config {
        config.transpiler_config = Some(path);
    }
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }

    let transpiler_config = config
        .load_transpiler_config()
        .context("loading transpiler config")?;
    info!(
        supported = transpiler_config.supported_exchanges.len(),
        default_exchange = %transpiler_config.defaults.exchange,
        "transpiler config loaded"
    );

    let state = AppState::new(SignalTranspiler::new(transpiler_config));
    let app = create_router(state, &config.static_dir);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Signal transpiler listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
