mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placefinder-cli")]
#[command(about = "Search, rank, and page through places from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one search and print the requested page as JSON.
    Search {
        /// Free-text query, e.g. "ramen near Union Square".
        query: String,
        /// Results per page.
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=60))]
        top_n: u32,
        /// 1-based page number.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// Search the query as typed even when a rewrite model is configured.
        #[arg(long)]
        no_rewrite: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = placefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search {
            query,
            top_n,
            page,
            no_rewrite,
        } => search::run_search_command(&config, query, top_n, page, no_rewrite).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
