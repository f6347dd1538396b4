//! Parley CLI - parley command

use clap::{Parser, Subcommand};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;
use web::ClockStyle;

mod cmd;
mod logging;
mod session;
mod system_config;
mod util;

use system_config::SystemConfig;

/// Parley - terminal companion for the chat front end
#[derive(Parser)]
#[command(name = "parley")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown (bold, italic, code, line breaks) to HTML
    Render {
        /// Input file (default: stdin)
        file: Option<PathBuf>,
        /// Escape HTML in the input before rendering
        #[arg(long)]
        escape: bool,
        /// Wrap the output in a div with this class
        #[arg(long)]
        class: Option<String>,
    },
    /// Format a timestamp as hour:minute:second
    Time {
        /// Unix time in milliseconds (default: now)
        #[arg(long, allow_negative_numbers = true)]
        unix_ms: Option<i64>,
        /// Use UTC instead of local time
        #[arg(long)]
        utc: bool,
        /// Clock style: 12 or 24 (default: from config)
        #[arg(long)]
        clock: Option<ClockStyle>,
    },
    /// Send a JSON request and print the response
    Fetch {
        /// Absolute URL or path relative to api.base_url
        endpoint: String,
        /// HTTP method
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        /// JSON request body
        #[arg(short = 'd', long)]
        data: Option<String>,
        /// Extra header, `Name: value` (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
    },
    /// Send a chat message to a leader
    Chat {
        /// Leader name
        leader: String,
        /// Message text
        message: String,
    },
    /// Manage chat history
    #[command(subcommand)]
    History(HistoryCommands),
    /// Live markdown preview of stdin, re-rendered once typing pauses
    Preview {
        /// Quiet period in milliseconds (default: preview.debounce_ms)
        #[arg(long, allow_negative_numbers = true)]
        wait_ms: Option<i64>,
    },
    /// View or edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Show the conversation with a leader
    Show {
        leader: String,
    },
    /// Replace the conversation with a JSON array of entries
    Save {
        leader: String,
        /// JSON file (default: stdin)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Delete the conversation with a leader
    Clear {
        leader: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Print one value
    Get {
        /// Key, e.g. preview.debounce_ms
        key: String,
    },
    /// Set one value
    Set {
        key: String,
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if missing
        #[arg(long)]
        create: bool,
    },
    /// Print an example configuration
    Example,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = system_config::load();
    let _log_guard = logging::init(config.as_ref().ok().map(|c| &c.logging));
    let logs_to_file = config.as_ref().is_ok_and(|c| c.logging.file.is_some());

    let result = match config {
        Ok(config) => run(cli.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let rendered = format!("{:#}", e);
            // Logged only when the log is not already stderr
            let message = if logs_to_file {
                web::handle_error(&rendered)
            } else {
                web::error_message(&rendered)
            };
            eprintln!("{} {}", "error:".red().bold(), message);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: SystemConfig) -> Result<()> {
    match command {
        Commands::Render { file, escape, class } => {
            cmd::render::run(file.as_deref(), escape, class.as_deref()).await
        }
        Commands::Time { unix_ms, utc, clock } => {
            cmd::time::run(unix_ms, utc, clock.unwrap_or(config.display.clock)).await
        }
        Commands::Fetch { endpoint, method, data, headers } => {
            cmd::fetch::run(&config, &endpoint, &method, data.as_deref(), &headers).await
        }
        Commands::Chat { leader, message } => cmd::chat::run(&config, &leader, &message).await,
        Commands::History(history_cmd) => match history_cmd {
            HistoryCommands::Show { leader } => cmd::history::run_show(&config, &leader).await,
            HistoryCommands::Save { leader, file } => {
                cmd::history::run_save(&config, &leader, file.as_deref()).await
            }
            HistoryCommands::Clear { leader } => cmd::history::run_clear(&config, &leader).await,
        },
        Commands::Preview { wait_ms } => cmd::preview::run(&config, wait_ms).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(&config).await,
            ConfigCommands::Get { key } => cmd::config::run_get(&config, &key).await,
            ConfigCommands::Set { key, value } => cmd::config::run_set(config, &key, &value).await,
            ConfigCommands::Path { create } => cmd::config::run_path(create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        },
    }
}
