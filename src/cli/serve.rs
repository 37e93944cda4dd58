//! Serve command handler
//!
//! Starts the HTTP server in foreground mode.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

/// Run the serve command
pub async fn run(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!(
        "Starting route-planner server v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.server_addr()
    );
    info!(
        photon = %config.providers.photon_url,
        nominatim = %config.providers.nominatim_url,
        osrm = %config.providers.osrm_url,
        max_fallback = config.resolver.max_fallback,
        fallback_delay_ms = config.resolver.fallback_delay_ms,
        "providers configured"
    );

    server::run(config).await
}
