//! quizsmith CLI: generate, take and score LLM-written quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use quizsmith_core::model::Difficulty;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(
    name = "quizsmith",
    version,
    about = "Generate, take and score multiple-select quizzes written by LLMs"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the quiz and attempt store (overrides the config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User that owns generated quizzes and attempts
    #[arg(long, global = true, default_value = "local")]
    user: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and an example answers file
    Init,

    /// Generate a quiz with an LLM and store it
    Generate {
        /// Subject to write questions about
        #[arg(long, required_unless_present = "file", conflicts_with = "file")]
        subject: Option<String>,

        /// Text file to write questions from
        #[arg(long)]
        file: Option<PathBuf>,

        /// Number of questions (default from config)
        #[arg(long)]
        num_questions: Option<u32>,

        /// easy, medium or hard (default from config)
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Model as "provider/model" or "model" (default provider)
        #[arg(long)]
        model: Option<String>,
    },

    /// Store a quiz from a completion saved to a file
    Import {
        /// File with the raw completion text
        #[arg(long)]
        raw: PathBuf,

        /// Quiz title (default: file name)
        #[arg(long)]
        title: Option<String>,

        /// easy, medium or hard
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,
    },

    /// Parse a completion file and print the questions as JSON
    Parse {
        /// File with the raw completion text
        #[arg(long)]
        raw: PathBuf,
    },

    /// Show a stored quiz
    Show {
        /// Quiz id
        #[arg(long)]
        quiz: String,

        /// Also show the correct answers
        #[arg(long)]
        reveal: bool,
    },

    /// List stored quizzes
    Quizzes {
        /// Only quizzes generated by --user
        #[arg(long)]
        mine: bool,
    },

    /// Score answers to a quiz and record the attempt
    Submit {
        /// Quiz id
        #[arg(long)]
        quiz: String,

        /// JSON file mapping question id (or number) to selected options
        #[arg(long)]
        answers: PathBuf,

        /// Seconds spent on the quiz
        #[arg(long)]
        time_taken: Option<f64>,
    },

    /// Review an attempt question by question
    Review {
        /// Attempt id
        #[arg(long)]
        attempt: String,

        /// Also write a self-contained HTML report to this path
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print the review as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show past attempts and overall statistics
    History {
        /// Print history and statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a recorded attempt
    DeleteAttempt {
        /// Attempt id
        #[arg(long)]
        attempt: String,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizsmith=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::new(cli.config, cli.data_dir, cli.user);

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Generate {
            subject,
            file,
            num_questions,
            difficulty,
            model,
        } => commands::generate::execute(&ctx, subject, file, num_questions, difficulty, model).await,
        Commands::Import {
            raw,
            title,
            difficulty,
        } => commands::import::execute(&ctx, &raw, title, difficulty).await,
        Commands::Parse { raw } => commands::parse::execute(&raw),
        Commands::Show { quiz, reveal } => commands::show::execute(&ctx, &quiz, reveal).await,
        Commands::Quizzes { mine } => commands::quizzes::execute(&ctx, mine).await,
        Commands::Submit {
            quiz,
            answers,
            time_taken,
        } => commands::submit::execute(&ctx, &quiz, &answers, time_taken).await,
        Commands::Review {
            attempt,
            html,
            json,
        } => commands::review::execute(&ctx, &attempt, html, json).await,
        Commands::History { json } => commands::history::execute(&ctx, json).await,
        Commands::DeleteAttempt { attempt } => {
            commands::delete_attempt::execute(&ctx, &attempt).await
        }
        Commands::ListModels { provider } => commands::list_models::execute(&ctx, provider).await,
    }
}
