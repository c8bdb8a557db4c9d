use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// ASTER GDEM elevation CLI tool
#[derive(Parser)]
#[command(name = "gdem")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing ASTGTMV003 GeoTIFF tiles
    #[arg(short, long, env = "GDEM_TILE_DIR", global = true)]
    tile_dir: Option<PathBuf>,

    /// Abort tile reads after this many seconds
    #[arg(long, env = "GDEM_READ_TIMEOUT_SECS", global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query elevation for a single coordinate
    Query {
        /// Latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long)]
        lng: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Annotate coordinates from a file with elevations
    Batch {
        /// Input file (CSV or JSON)
        input: PathBuf,

        /// Output file (derived from the input name if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude (CSV only)
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude (CSV only)
        #[arg(long, default_value = "lng")]
        lng_col: String,

        /// Points per elevation request
        #[arg(long, default_value = "1000")]
        chunk_size: usize,
    },

    /// Show which tile and raster pixel cover a coordinate
    Locate {
        /// Latitude in decimal degrees
        #[arg(long)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long)]
        lng: f64,
    },

    /// List available GDEM tiles
    Tiles,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query { lat, lng, json } => {
            commands::query::run(cli.tile_dir, cli.timeout, lat, lng, json).await
        }
        Commands::Batch {
            input,
            output,
            lat_col,
            lng_col,
            chunk_size,
        } => {
            commands::batch::run(
                cli.tile_dir,
                cli.timeout,
                input,
                output,
                lat_col,
                lng_col,
                chunk_size,
            )
            .await
        }
        Commands::Locate { lat, lng } => commands::locate::run(cli.tile_dir, lat, lng),
        Commands::Tiles => commands::tiles::run(cli.tile_dir),
    }
}
