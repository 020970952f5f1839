//! `scan` - sitemap-driven accessibility auditing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

mod commands;

#[derive(Parser)]
#[command(name = "scan")]
#[command(about = "Audit web pages for WCAG 2 A/AA issues with axe-core")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a single page and write its report pair
    #[command(alias = "one-page")]
    Page {
        /// Page to audit
        url: String,

        /// Reports directory (overrides config)
        output_dir: Option<PathBuf>,
    },

    /// Audit every page listed in a sitemap
    Sitemap {
        /// Sitemap URL or local file path
        sitemap: String,

        /// Reports directory (overrides config)
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Pages audited at once (overrides config)
        #[arg(long, value_name = "N")]
        concurrency: Option<usize>,
    },

    /// Serve the report catalog over HTTP
    Serve {
        /// Listen port (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sweep=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit with status 2 before anything else happens
    let cli = Cli::parse();
    init_tracing();

    info!("Starting Sweep v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Page { url, output_dir } => {
            commands::scan_page(cli.config.as_deref(), &url, output_dir).await
        }
        Commands::Sitemap {
            sitemap,
            output_dir,
            concurrency,
        } => commands::scan_sitemap(cli.config.as_deref(), &sitemap, output_dir, concurrency).await,
        Commands::Serve { port } => commands::serve(cli.config.as_deref(), port).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
