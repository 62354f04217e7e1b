use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cropagent_core::selection::Language;

mod commands;

#[derive(Parser)]
#[command(name = "cropagent")]
#[command(about = "CropAgent CLI - crop yield dashboard and advisory chat", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config file and CROPAGENT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Region/crop/language overrides shared by the panel commands.
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Region (Indian state), e.g. "Punjab"
    #[arg(long)]
    pub region: Option<String>,

    /// Crop grown in the region, e.g. "Wheat"
    #[arg(long)]
    pub crop: Option<String>,

    /// Response language: en, hi or mr
    #[arg(long, value_parser = parse_language)]
    pub language: Option<Language>,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported regions and their crops
    Regions,
    /// Refresh the dashboard and print every panel as JSON
    Dashboard {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Ask a question and print the chat timeline and panels
    Ask {
        /// The question, e.g. "Will rice yield be good this season?"
        query: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Show stored predictions
    History {
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        crop: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Check backend health
    Health,
    /// Follow real-time reports and print the panels on each update
    Watch {
        #[command(flatten)]
        selection: SelectionArgs,
        /// Seconds between re-publishing the dashboard request
        #[arg(long, default_value_t = 60)]
        every: u64,
    },
}

fn parse_language(code: &str) -> std::result::Result<Language, String> {
    Language::parse(code).map_err(|e| e.to_string())
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
    let ctx = commands::Context::load(cli.api_url, cli.timeout)?;

    match cli.command {
        Commands::Regions => commands::info::regions(&ctx).await?,
        Commands::Dashboard { selection } => commands::dashboard::show(&ctx, &selection).await?,
        Commands::Ask { query, selection } => {
            commands::dashboard::ask(&ctx, &selection, &query).await?
        }
        Commands::History { region, crop, limit } => {
            commands::info::history(&ctx, region, crop, limit).await?
        }
        Commands::Health => commands::info::health(&ctx).await?,
        Commands::Watch { selection, every } => {
            commands::watch::run(&ctx, &selection, every).await?
        }
    }

    Ok(())
}
