//! Ricewise CLI - Rice research assistant and leaf disease classifier

mod commands;
mod server;

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ricewise - Rice research assistant and leaf disease classifier
#[derive(Parser)]
#[command(name = "ricewise")]
#[command(version)]
#[command(about = "Answers rice farming questions from research papers and classifies leaf diseases", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(short, long, global = true, env = "RICEWISE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the chat backend (question answering over research papers)
    Chat {
        /// Address to bind (default: from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the image classification backend
    Classifier {
        /// Address to bind (default: from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Answer one question from the research papers
    Ask {
        /// Your question
        question: String,

        /// Number of chunks to retrieve (default: from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Hide source excerpts
        #[arg(long)]
        no_sources: bool,
    },

    /// Classify a rice leaf photo
    Predict {
        /// Image file (PNG, JPEG, WebP or BMP)
        image: PathBuf,
    },

    /// Create the default config file
    Init,

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Print the config file location
    Path,

    /// Validate configuration, credentials, documents and model files
    Check,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ricewise=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ricewise=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Report the outcome of loading `.env`; a missing file is fine.
fn report_dotenv(result: dotenvy::Result<PathBuf>) {
    match result {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to read .env file: {}", e),
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = commands::get_paths(cli.config.as_deref())?;

    match cli.command {
        Commands::Chat { host, port } => {
            commands::chat::run(commands::load_config(&paths)?, host, port)
        }
        Commands::Classifier { host, port } => {
            commands::classifier::run(commands::load_config(&paths)?, host, port)
        }
        Commands::Ask {
            question,
            top_k,
            no_sources,
        } => commands::ask::run(commands::load_config(&paths)?, &question, top_k, !no_sources),
        Commands::Predict { image } => commands::predict::run(&commands::load_config(&paths)?, &image),
        Commands::Init => commands::init::run(&paths),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::show(&paths),
            ConfigCommands::Path => commands::config::path(&paths),
            ConfigCommands::Check => commands::config::check(&paths),
        },
    }
}

fn main() {
    // Loaded before parsing so RICEWISE_CONFIG may come from the file.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);
    report_dotenv(dotenv);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
