//! trivia CLI: play quizzes in the terminal and manage local data.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use trivia_core::model::Difficulty;

mod commands;

#[derive(Parser)]
#[command(name = "trivia", version, about = "Terminal trivia quiz")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz
    Play {
        /// Category id (see `trivia categories`)
        #[arg(long)]
        category: Option<String>,

        /// easy, medium, or hard
        #[arg(long)]
        difficulty: Option<Difficulty>,

        /// Number of questions
        #[arg(long)]
        amount: Option<u32>,
    },

    /// Show past quiz results
    History {
        /// Maximum rows to show
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Delete the result with this id
        #[arg(long)]
        delete: Option<Uuid>,
    },

    /// Show lifetime statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List question categories
    Categories,

    /// Manage custom questions
    Questions {
        #[command(subcommand)]
        action: commands::questions::QuestionsAction,
    },

    /// Show or update the player profile
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        avatar: Option<String>,

        /// Default category id; pass an empty string to clear
        #[arg(long)]
        default_category: Option<String>,

        /// Default difficulty
        #[arg(long)]
        default_difficulty: Option<Difficulty>,

        /// Default number of questions
        #[arg(long)]
        default_questions: Option<u32>,
    },

    /// Export all stored data as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Import data exported with `trivia export`
    Import {
        #[arg(long)]
        input: PathBuf,
    },

    /// Delete all stored data
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Create a starter config and data directory
    Init {
        /// Add demonstration quiz results to an empty history
        #[arg(long)]
        with_samples: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trivia=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::Context {
        config_path: cli.config,
        data_dir: cli.data_dir,
    };

    let result = match cli.command {
        Commands::Play {
            category,
            difficulty,
            amount,
        } => commands::play::execute(&ctx, category, difficulty, amount).await,
        Commands::History { limit, delete } => commands::history::execute(&ctx, limit, delete),
        Commands::Stats { json } => commands::stats::execute(&ctx, json),
        Commands::Categories => commands::categories::execute(),
        Commands::Questions { action } => commands::questions::execute(&ctx, action),
        Commands::Profile {
            name,
            avatar,
            default_category,
            default_difficulty,
            default_questions,
        } => commands::profile::execute(
            &ctx,
            name,
            avatar,
            default_category,
            default_difficulty,
            default_questions,
        ),
        Commands::Export { output } => commands::transfer::export(&ctx, output),
        Commands::Import { input } => commands::transfer::import(&ctx, input),
        Commands::Clear { yes } => commands::transfer::clear(&ctx, yes),
        Commands::Init { with_samples } => commands::init::execute(&ctx, with_samples),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
