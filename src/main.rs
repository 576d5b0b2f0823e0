use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod axis;
mod charts;
mod config;
mod error;
#[cfg(test)]
mod fixtures;
mod loader;
mod models;
mod page;
mod report;
mod server;
mod state;
mod summary;
mod variants;
mod view;

use config::{DashboardConfig, DEFAULT_HOST, DEFAULT_MARK_EVERY, DEFAULT_PORT, DEFAULT_SOURCE_URL};
use state::AppState;

#[derive(Parser)]
#[command(name = "ontario-covid-dashboard")]
#[command(about = "Interactive dashboard for Ontario COVID-19 case and variant data", long_about = None)]
struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the feed and serve the dashboard
    Serve(ServeArgs),
    /// Download the feed and print the headline metrics and weekly variant table
    Summary {
        #[arg(long, default_value = DEFAULT_SOURCE_URL)]
        source_url: String,
    },
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, default_value = DEFAULT_SOURCE_URL)]
    source_url: String,
    #[arg(long, default_value_t = DEFAULT_HOST)]
    host: IpAddr,
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Days between slider tick labels
    #[arg(long, default_value_t = DEFAULT_MARK_EVERY)]
    mark_every: usize,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            mark_every: DEFAULT_MARK_EVERY,
        }
    }
}

async fn build_state(config: &DashboardConfig) -> anyhow::Result<AppState> {
    let records = loader::load(&config.source_url)
        .await
        .context("failed to load the case feed")?;
    AppState::build(records, config).context("failed to derive dashboard tables")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli
        .command
        .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    {
        Commands::Serve(args) => {
            let config = DashboardConfig {
                source_url: args.source_url,
                mark_every_nth: args.mark_every,
                ..DashboardConfig::default()
            };
            let state = build_state(&config).await?;
            server::serve(Arc::new(state), SocketAddr::new(args.host, args.port)).await?;
        }
        Commands::Summary { source_url } => {
            let config = DashboardConfig {
                source_url,
                ..DashboardConfig::default()
            };
            let state = build_state(&config).await?;
            info!(weeks = state.variants.len(), "summary ready");
            print!("{}", report::build_report(&state));
        }
    }

    Ok(())
}
