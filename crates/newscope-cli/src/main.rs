use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod run;

#[derive(Debug, Parser)]
#[command(name = "newscope")]
#[command(about = "Collect news articles across sources and analyze the corpus")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every requested source and optionally export/analyze the results.
    Search {
        /// Keyword to search for.
        keyword: String,

        /// Maximum number of results per source.
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Comma-separated source names; defaults to every configured source.
        #[arg(long, value_delimiter = ',')]
        sources: Vec<String>,

        /// Recency bound: day|week|month|quarter|half-year|year.
        #[arg(long)]
        window: Option<String>,

        /// Write one JSON export file per source under the export directory.
        #[arg(long)]
        export: bool,

        /// Run the analysis pipeline over the collected articles.
        #[arg(long)]
        analyze: bool,
    },

    /// List the sources available with the current configuration.
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = newscope_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            keyword,
            limit,
            sources,
            window,
            export,
            analyze,
        } => {
            run::search(&config, &keyword, limit, sources, window.as_deref(), export, analyze)
                .await
        }
        Commands::Sources => run::list_sources(&config),
    }
}
