mod news;
mod speak;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "echolens-cli")]
#[command(about = "EchoLens news insights from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a company's recent news with topics and sentiment
    Fetch {
        /// Company name to search for
        #[arg(long)]
        company: String,

        /// Maximum number of articles (defaults to `ECHOLENS_ARTICLE_LIMIT`)
        #[arg(long)]
        limit: Option<usize>,

        /// Print the enriched articles as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a comparative coverage report for a company
    Analyze {
        /// Company name to search for
        #[arg(long)]
        company: String,

        /// Maximum number of articles (defaults to `ECHOLENS_ARTICLE_LIMIT`)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Translate text and save it as spoken audio
    Speak {
        /// Text to narrate
        #[arg(long)]
        text: String,

        /// Target language code (defaults to `ECHOLENS_SPEECH_LANG`)
        #[arg(long)]
        lang: Option<String>,

        /// Output file (defaults to a generated name under `ECHOLENS_AUDIO_DIR`)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("echolens-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = echolens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Fetch {
            company,
            limit,
            json,
        } => news::run_fetch(&config, &company, limit, json).await,
        Commands::Analyze { company, limit } => news::run_analyze(&config, &company, limit).await,
        Commands::Speak { text, lang, out } => {
            speak::run_speak(&config, &text, lang.as_deref(), out.as_deref()).await
        }
    }
}
