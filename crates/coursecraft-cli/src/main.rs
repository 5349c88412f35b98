//! coursecraft CLI: generate, play and browse courses from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod browser;
mod commands;
mod player;
mod render;

#[derive(Parser)]
#[command(
    name = "coursecraft",
    version,
    about = "Turn any text into a gamified mini-course"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a course from text and play it
    Learn {
        /// Read the source text from a file
        #[arg(long, conflicts_with = "text")]
        input: Option<PathBuf>,

        /// Source text given inline
        #[arg(long)]
        text: Option<String>,

        /// Provider to use (defaults to the configured default)
        #[arg(long)]
        provider: Option<String>,

        /// Model to use
        #[arg(long)]
        model: Option<String>,

        /// Also save each generated course to this file
        #[arg(long)]
        save: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate a course and save it as JSON
    Generate {
        /// Read the source text from a file
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        input: Option<PathBuf>,

        /// Source text given inline
        #[arg(long)]
        text: Option<String>,

        /// Where to write the course
        #[arg(long)]
        output: PathBuf,

        #[arg(long)]
        provider: Option<String>,

        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Play a saved course
    Play {
        /// Course JSON file
        #[arg(long)]
        course: PathBuf,
    },

    /// Check a saved course for problems
    Validate {
        /// Course JSON file
        #[arg(long)]
        course: PathBuf,
    },

    /// Browse the university course catalog
    Catalog {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Explain a catalog course in plain language
    Explain {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        course: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Suggest how to prepare for a catalog course
    Prereqs {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        course: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and an example course
    Init,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so the interactive screens on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("coursecraft=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Learn {
            input,
            text,
            provider,
            model,
            save,
            config,
        } => commands::learn::execute(input, text, provider, model, save, config).await,
        Commands::Generate {
            input,
            text,
            output,
            provider,
            model,
            config,
        } => commands::generate::execute(input, text, output, provider, model, config).await,
        Commands::Play { course } => commands::play::execute(course),
        Commands::Validate { course } => commands::validate::execute(course),
        Commands::Catalog { config } => commands::catalog::execute(config).await,
        Commands::Explain {
            subject,
            course,
            config,
        } => commands::assist::execute(commands::assist::Ask::Explain, subject, course, config).await,
        Commands::Prereqs {
            subject,
            course,
            config,
        } => {
            commands::assist::execute(commands::assist::Ask::Prerequisites, subject, course, config)
                .await
        }
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
