use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use cinematch_enrich::Config;

mod commands;
mod tui;

#[derive(Debug, Parser)]
#[command(name = "cinematch", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the movie catalog CSV (default: ~/.local/share/cinematch/imdb_top_1000.csv)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Recommend movies similar to a title
    ///
    /// Looks the title up in the catalog (case-insensitive, exact match) and
    /// ranks every other movie by how close its genre, director, cast and
    /// overview are to it. The query movie itself is never recommended.
    ///
    /// When an OMDb API key is configured, each recommendation is decorated
    /// with poster, plot, year, cast, director and box office figures from
    /// OMDb. Anything OMDb cannot supply falls back to the catalog, and then
    /// to a placeholder.
    ///
    /// An unknown title is not an error: a short message is printed along
    /// with any catalog titles containing the query.
    Recommend {
        /// Title to find recommendations for
        title: String,

        /// Number of recommendations (default: 5, or `recommendations` in config)
        #[arg(short = 'k', long)]
        count: Option<usize>,

        /// Skip OMDb and use catalog data only
        #[arg(long)]
        offline: bool,

        /// Print recommendations as JSON
        #[arg(long)]
        json: bool,
    },
    /// List catalog titles
    Titles {
        /// Only show titles containing this text (case-insensitive)
        filter: Option<String>,
    },
    /// Browse the catalog and its recommendations interactively
    Browse {
        /// Skip OMDb and use catalog data only
        #[arg(long)]
        offline: bool,
    },
    /// Show catalog, index and enrichment status
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the current effective configuration
    Show,
    /// Get a config value, or print the whole config file
    Get {
        /// Config key (e.g. omdb_api_key)
        key: Option<String>,
    },
    /// Set a config value in the config file
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Recommend {
            title,
            count,
            offline,
            json,
        } => {
            let config = Config::load_with_catalog_path(cli.catalog)?;
            let k = count.unwrap_or(config.recommendations);
            commands::run_recommend(&config, &title, k, offline, json).await?;
        }
        Commands::Titles { filter } => {
            let config = Config::load_with_catalog_path(cli.catalog)?;
            commands::list_titles(&config, filter.as_deref())?;
        }
        Commands::Browse { offline } => {
            let config = Config::load_with_catalog_path(cli.catalog)?;
            commands::run_browse(&config, offline)?;
        }
        Commands::Status => {
            let config = Config::load_with_catalog_path(cli.catalog)?;
            commands::show_status(&config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config()?,
            ConfigAction::Get { key } => commands::config::get_config(key)?,
            ConfigAction::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigAction::Path => commands::config::show_path(),
            ConfigAction::Example => commands::config::show_example(),
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
