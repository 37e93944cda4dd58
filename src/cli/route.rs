//! Route command handler
//!
//! Computes a route through literal coordinates and prints a summary.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::latlng::parse_literal;
use crate::route::{HttpRoutePlanner, RouteResult};
use clap::Args;

/// Route command arguments
#[derive(Args)]
pub struct RouteArgs {
    /// Waypoints as "lat,lng", in travel order
    #[arg(required = true, allow_hyphen_values = true)]
    pub points: Vec<String>,

    /// OSRM profile (overrides route.profile)
    #[arg(long)]
    pub profile: Option<String>,

    /// Print JSON (including geometry) instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Run the route command
pub async fn run(args: RouteArgs, mut config: Config) -> Result<()> {
    if let Some(profile) = args.profile {
        config.route.profile = profile;
    }

    let points = args
        .points
        .iter()
        .map(|p| {
            parse_literal(p)
                .ok_or_else(|| Error::InvalidCoordinates(format!("Not a lat,lng pair: {}", p)))
        })
        .collect::<Result<Vec<_>>>()?;

    let planner = HttpRoutePlanner::from_config(&config)?;
    let route = planner.plan(&points).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&route)?);
    } else {
        println!("{}", summary(&route));
    }

    Ok(())
}

fn summary(route: &RouteResult) -> String {
    format!(
        "Distance: {:.1} km\nDuration: {}",
        route.distance_m / 1000.0,
        format_duration(route.duration_s)
    )
}

/// "1 h 05 min" or "42 min"
fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round() as u64;
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if hours > 0 {
        format!("{} h {:02} min", hours, minutes)
    } else {
        format!("{} min", minutes)
    }
}
