//! Resolve command handler
//!
//! Runs the place resolver once and prints the result.

use crate::config::Config;
use crate::error::Result;
use crate::geo::Region;
use crate::resolve::{HttpResolver, ResolvedPlace};
use clap::Args;

/// Resolve command arguments
#[derive(Args)]
pub struct ResolveArgs {
    /// Place names or "lat,lng" literals, in order
    #[arg(required = true, allow_hyphen_values = true)]
    pub queries: Vec<String>,

    /// Region hint: "il" biases toward Israel, anything else searches worldwide
    #[arg(long, short = 'r', default_value = "any")]
    pub region: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the resolve command
pub async fn run(args: ResolveArgs, config: Config) -> Result<()> {
    let resolver = HttpResolver::from_config(&config)?;
    let places = resolver
        .resolve(&args.queries, Region::from_hint(&args.region))
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&places)?);
    } else {
        for (i, place) in places.iter().enumerate() {
            println!("{}", format_place(i + 1, place));
        }
    }

    Ok(())
}

fn format_place(n: usize, place: &ResolvedPlace) -> String {
    format!(
        "{:>2}. {} ({:.6}, {:.6}) [{}]",
        n, place.display, place.lat, place.lng, place.provider
    )
}
