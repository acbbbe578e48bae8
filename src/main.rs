use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use isoserve::config;
use isoserve::lifecycle::Shutdown;
use isoserve::observability::{logging, metrics};
use isoserve::{pages, HttpServer};

#[derive(Parser)]
#[command(name = "web")]
#[command(about = "Universal SPA app server", long_about = None)]
struct Cli {
    /// Path to a TOML config file; environment variables still win.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::loader::from_env()?,
    };

    logging::init(&config.observability);

    tracing::info!(
        bind_address = %config.server.bind_address(),
        api = %config.api.base_url(),
        ssr_disabled = config.ssr.disabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.server.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, pages::routes(), pages::registry());
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
