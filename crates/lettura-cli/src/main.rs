//! lettura CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use lettura_core::Language;

mod commands;

#[derive(Parser)]
#[command(
    name = "lettura",
    version,
    about = "Read Italian news and quiz yourself on its vocabulary"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split an article into numbered sentences
    Segment {
        /// Text file to segment
        #[arg(long)]
        input: PathBuf,
    },

    /// Sample quiz words from an article
    Sample {
        /// Text file to sample from
        #[arg(long)]
        input: PathBuf,

        /// Number of words
        #[arg(long, default_value = "10")]
        count: usize,

        /// Article language: italian, french
        #[arg(long, default_value = "italian")]
        language: Language,

        /// Seed for a reproducible sample
        #[arg(long)]
        seed: Option<u64>,

        /// Also consider capitalized words
        #[arg(long)]
        keep_capitalized: bool,
    },

    /// Read an article and take today's quiz
    Study {
        /// Learner identifier
        #[arg(long)]
        user: String,

        /// Read the article from a local file instead of the news site
        #[arg(long)]
        article: Option<PathBuf>,

        /// Result store path (overrides the config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Seed for the quiz word sample
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show a learner's past results
    History {
        /// Learner identifier
        #[arg(long)]
        user: String,

        /// Result store path (overrides the config)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lettura=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Segment { input } => commands::segment::execute(input),
        Commands::Sample {
            input,
            count,
            language,
            seed,
            keep_capitalized,
        } => commands::sample::execute(input, count, language, seed, keep_capitalized),
        Commands::Study {
            user,
            article,
            store,
            seed,
            config,
        } => commands::study::execute(user, article, store, seed, config).await,
        Commands::History {
            user,
            store,
            config,
        } => commands::history::execute(user, store, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
