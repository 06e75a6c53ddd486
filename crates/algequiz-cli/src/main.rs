//! algequiz CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "algequiz", version, about = "Algebra quiz with LLM tutor feedback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a quiz session
    Run {
        /// Path to the question bank JSON file (defaults to the configured one)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Number of questions to draw (defaults to the configured count)
        #[arg(long)]
        take: Option<usize>,

        /// Model identifier override
        #[arg(long)]
        model: Option<String>,

        /// Tutor provider name override
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip the tutor feedback step entirely
        #[arg(long)]
        no_feedback: bool,
    },

    /// Validate a question bank file
    Validate {
        /// Path to the question bank JSON file
        #[arg(long)]
        questions: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("algequiz=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            questions,
            take,
            model,
            provider,
            config,
            no_feedback,
        } => commands::run::execute(questions, take, model, provider, config, no_feedback).await,
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
