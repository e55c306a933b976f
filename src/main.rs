//! Table Chart CLI
//!
//! - `serve`: host the browser bundle and its client configuration
//! - `preview`: run the load pipeline against the in-process example backend
//! - `init-config`: print a commented default configuration

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use table_chart::config::{generate_default_config, Config, LoggingConfig};
use table_chart::pipeline::{self, LoadRequest, LoadStatus};
use table_chart::server::{serve, ServerState};
use table_chart::session::MemoryConnection;
use table_chart::{CellValue, ChartPoint};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "table-chart")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render a table from an analytics session server as a bar chart")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the UI bundle and /config.json
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(short, long)]
        port: Option<u16>,
        /// Directory holding the built UI bundle
        #[arg(long)]
        dist_dir: Option<PathBuf>,
    },

    /// Load chart points from the in-process example backend
    Preview {
        /// Table to look up instead of creating the example table
        #[arg(short, long)]
        table: Option<String>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,
    },

    /// Print a default configuration file
    InitConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    init_logging(&config.logging);

    match cli.command {
        Commands::Serve {
            host,
            port,
            dist_dir,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dist_dir) = dist_dir {
                config.server.dist_dir = dist_dir;
            }

            tracing::info!("Starting Table Chart v{}", env!("CARGO_PKG_VERSION"));
            tracing::info!("UI bundle: {:?}", config.server.dist_dir);
            match &config.backend.core_api_url {
                Some(url) => tracing::info!("Analytics server: {}", url),
                None => tracing::info!("Analytics server: page origin"),
            }

            serve(ServerState::from_config(&config)).await?;
        }
        Commands::Preview { table, format } => {
            let connection = MemoryConnection::example();
            let request = config.backend.request(table.as_deref());

            match pipeline::run(&connection, &request).await {
                LoadStatus::Loaded(points) => print_points(&points, format)?,
                LoadStatus::Failed(message) => bail!("Unable to load table: {}", message),
                LoadStatus::Loading => bail!("Pipeline did not settle"),
            }
        }
        Commands::InitConfig => {
            print!("{}", generate_default_config());
        }
    }

    Ok(())
}

/// Install the tracing subscriber described by `[logging]`
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("table_chart={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so preview output stays clean on stdout
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_points(points: &[ChartPoint], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(points)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            if let Some(first) = points.first() {
                writer.write_record(first.keys())?;
            }
            for point in points {
                writer.write_record(point.iter().map(|(_, v)| csv_field(v)))?;
            }
            writer.flush().context("Failed to write CSV")?;
        }
    }
    Ok(())
}

fn csv_field(value: &CellValue) -> String {
    match value {
        CellValue::Number(n) => n.to_string(),
        CellValue::Text(s) => s.clone(),
        CellValue::Null => String::new(),
    }
}
