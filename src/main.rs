use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::error;

use yt_sheet::commands;
use yt_sheet::commands::search::SearchArgs;
use yt_sheet::config::load_env;
use yt_sheet::models::{DEFAULT_FILE_PREFIX, SearchMode};

#[derive(Parser)]
#[command(name = "yt-sheet")]
#[command(about = "Search YouTube by keyword or channel and export video metadata to a spreadsheet")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect videos and write {prefix}_{YYYY-MM-DD}.xlsx
    Search {
        /// Search keyword, or a channel ID with --channel
        value: String,

        /// Treat VALUE as a channel ID (e.g., UC_x5XG1OV2P6uZZ5FSM9Ttw)
        #[arg(short, long)]
        channel: bool,

        /// Earliest publish date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest publish date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// File name prefix, without extension
        #[arg(short, long, default_value = DEFAULT_FILE_PREFIX)]
        prefix: String,

        /// Directory to write the workbook to (default: $YT_SHEET_OUTPUT_DIR or .)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Maximum number of search results to collect (0 for no limit)
        #[arg(short = 'n', long, default_value = "200")]
        limit: usize,
    },

    /// Save the YouTube Data API key
    Init {
        /// YouTube Data API key
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load environment variables
    load_env();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search {
            value,
            channel,
            from,
            to,
            prefix,
            out,
            limit,
        } => {
            let args = SearchArgs {
                value,
                mode: if channel { SearchMode::ChannelId } else { SearchMode::Keyword },
                from,
                to,
                prefix,
                out,
                limit: (limit > 0).then_some(limit),
            };
            commands::search::run(args).await
        }
        Commands::Init { api_key, force } => commands::init::run(api_key, force),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
