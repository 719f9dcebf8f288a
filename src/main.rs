//! CLI entry point for the ISR network extractor.
//!
//! Turns a track export of the infrastructure register into the JSON
//! network consumed by the flow solver, locating stations along the way.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use isr_network::geocode::{CacheOnly, GeoPoint, Geocoder, GoogleGeocoder};
use isr_network::network::{Vertex, build_network};
use isr_network::output::{print_pretty, write_network, write_segments};
use isr_network::parser::parse_tracks_file;
use isr_network::stats::NetworkStats;
use isr_network::track::TrackSegment;
use isr_network::vertices::{
    CsvVertexStore, NoOperator, Operator, Projection, StdinOperator, VertexResolver,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "isr_network")]
#[command(about = "Build flow-solver networks from ISR track exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a track export, locate its stations and write the network
    Build {
        /// CSV track export produced by the scraper
        #[arg(short, long)]
        tracks: String,

        /// JSON file to write the network to
        #[arg(short, long, default_value = "output/network.json")]
        output: String,

        /// Indent the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,

        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Normalize a track export and write the segments as CSV
    Normalize {
        /// CSV track export produced by the scraper
        #[arg(short, long)]
        tracks: String,

        /// CSV file to write the segments to
        #[arg(short, long, default_value = "output/segments.csv")]
        output: String,
    },
    /// Locate all stations of a track export into the vertex cache
    Locate {
        /// CSV track export produced by the scraper
        #[arg(short, long)]
        tracks: String,

        #[command(flatten)]
        resolve: ResolveArgs,
    },
}

#[derive(Args)]
struct ResolveArgs {
    /// Vertex cache file
    #[arg(long, default_value = "output/vertices.csv")]
    vertices: String,

    /// Reference point preset to center coordinates on
    #[arg(short, long, value_enum)]
    region: Option<Region>,

    /// Longitude of the reference point, overrides the region preset
    #[arg(long, requires = "center_y")]
    center_x: Option<f64>,

    /// Latitude of the reference point, overrides the region preset
    #[arg(long, requires = "center_x")]
    center_y: Option<f64>,

    /// Factor applied to coordinates after centering
    #[arg(long, default_value_t = 100.0)]
    scale: f64,

    /// Only use cached vertices, never query the geocoder
    #[arg(long, default_value_t = false)]
    offline: bool,

    /// Fail instead of asking for a search term when a lookup finds nothing
    #[arg(long, default_value_t = false)]
    no_prompt: bool,
}

/// Export regions with their reference points.
#[derive(Clone, Copy, ValueEnum)]
enum Region {
    Full,
    AachenNeuss,
}

impl Region {
    fn center(self) -> GeoPoint {
        match self {
            Region::Full => GeoPoint::new(6.7, 51.9),
            Region::AachenNeuss => GeoPoint::new(6.4, 50.9),
        }
    }
}

impl ResolveArgs {
    fn projection(&self) -> Projection {
        let center = match (self.center_x, self.center_y) {
            (Some(x), Some(y)) => Some(GeoPoint::new(x, y)),
            _ => self.region.map(Region::center),
        };
        Projection::new(center, self.scale)
    }

    fn operator(&self) -> Box<dyn Operator> {
        if self.no_prompt {
            Box::new(NoOperator)
        } else {
            Box::new(StdinOperator)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/isr_network.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("isr_network.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            tracks,
            output,
            pretty,
            resolve,
        } => {
            let parsed = parse_tracks_file(&tracks)?;
            let vertices = resolve_vertices(&parsed.segments, &resolve).await?;

            let network = build_network(&parsed.segments, vertices)
                .context("failed to build network")?;

            let stats = NetworkStats::from_network(&network);
            info!(
                vertices = stats.vertex_count,
                arcs = stats.arc_count,
                arc_density = stats.arc_density,
                capacity_total = stats.capacity_total,
                cost_max = stats.cost_max,
                cost_mean = stats.cost_mean,
                rejected_rows = parsed.rejected.len(),
                "Network built"
            );
            print_pretty(&stats);

            write_network(&output, &network, pretty)?;
        }
        Commands::Normalize { tracks, output } => {
            let parsed = parse_tracks_file(&tracks)?;
            write_segments(&output, &parsed.segments)?;
        }
        Commands::Locate { tracks, resolve } => {
            let parsed = parse_tracks_file(&tracks)?;
            let vertices = resolve_vertices(&parsed.segments, &resolve).await?;
            info!(vertices = vertices.len(), cache = %resolve.vertices, "All vertices located");
        }
    }

    Ok(())
}

/// Resolves the vertices of `segments` online or from the cache alone.
#[tracing::instrument(skip_all, fields(cache = %args.vertices, offline = args.offline))]
async fn resolve_vertices(segments: &[TrackSegment], args: &ResolveArgs) -> Result<Vec<Vertex>> {
    if args.offline {
        resolve_with(CacheOnly, segments, args).await
    } else {
        let api_key = std::env::var("GMAPS_API_KEY")
            .context("GMAPS_API_KEY must be set to geocode vertices (or pass --offline)")?;
        resolve_with(GoogleGeocoder::with_api_key(api_key)?, segments, args).await
    }
}

async fn resolve_with<G: Geocoder>(
    geocoder: G,
    segments: &[TrackSegment],
    args: &ResolveArgs,
) -> Result<Vec<Vertex>> {
    let store = CsvVertexStore::new(&args.vertices);
    let mut resolver = VertexResolver::new(geocoder, store, args.operator(), args.projection());

    Ok(resolver.resolve(segments).await?)
}
