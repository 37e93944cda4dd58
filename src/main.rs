//! route-planner CLI entry point
//!
//! Place resolver and route computer - CLI + web API

use route_planner::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
