//! nominatim-locator - Nominatim lookups from the command line
//!
//! This is the composition root that wires together all the components.

use anyhow::{bail, Context};
use nominatim_locator::infrastructure::MonotonicClock;
use nominatim_locator::{
    load_config, DashMapLocationCache, Location, LocationService, Namespace, NominatimClient,
    NominatimResolver,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

const USAGE: &str = "usage: nominatim-locator <name TEXT | id OSM_ID | latlon LAT LON>";

/// One lookup requested on the command line.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Name(String),
    Id(String),
    LatLon(String, String),
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    match args {
        [cmd, rest @ ..] if cmd == "name" && !rest.is_empty() => Ok(Command::Name(rest.join(" "))),
        [cmd, id] if cmd == "id" => Ok(Command::Id(id.clone())),
        [cmd, lat, lon] if cmd == "latlon" => Ok(Command::LatLon(lat.clone(), lon.clone())),
        _ => bail!(USAGE),
    }
}

fn render(service: &LocationService, location: &Location) -> serde_json::Value {
    serde_json::json!({
        "location": location,
        "url": service.url_for(location),
        "linked_data_url": service.linked_data_url_for(location),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "starting nominatim-locator host={} language={}",
        cfg.host,
        cfg.language
    );

    // ===== COMPOSITION ROOT =====

    // 1. Create outbound adapters
    let client = NominatimClient::from_config(&cfg, Arc::new(MonotonicClock::new()))
        .context("failed to build HTTP client")?;

    let cache = Arc::new(DashMapLocationCache::new());
    cache.start_gc(Duration::from_secs(cfg.cache_gc_interval_secs));

    // 2. Create application services
    let resolver = Arc::new(NominatimResolver::from_config(&cfg, Arc::new(client), cache));
    let service = LocationService::default().with_provider(resolver.clone());

    // 3. Run the requested lookup
    let location = match &command {
        Command::Name(name) => service.location_from_name(name, &cfg.language).await,
        Command::Id(id) => {
            service
                .location_from_id(id, Namespace::NOMINATIM, &cfg.language)
                .await
        }
        Command::LatLon(lat, lon) => service.location_from_lat_lon(lat, lon, &cfg.language).await,
    };

    match location {
        Some(location) => {
            println!("{}", serde_json::to_string_pretty(&render(&service, &location))?);
            tracing::info!("{}", resolver.credits());
            Ok(())
        }
        None => bail!("no location found for {:?}", command),
    }
}
