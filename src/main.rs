//! Skirmish CLI - play, script and self-play tactical wargame matches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

/// Skirmish - a deterministic turn-based tactical wargame engine
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log every executed action and turn transition
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that loads a map.
#[derive(clap::Args, Debug)]
struct MapArgs {
    /// Map file (JSON)
    #[arg(required = true)]
    map: PathBuf,

    /// Luck seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Starting funds for every player
    #[arg(long, default_value = "0")]
    funds: u32,

    /// Commander per player, in player order (default: None)
    #[arg(short, long = "commander")]
    commanders: Vec<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Play a game interactively, one action per line on stdin
    Play {
        #[command(flatten)]
        map: MapArgs,

        /// Skip invalid actions instead of reporting them as errors
        #[arg(long)]
        lenient: bool,
    },

    /// Apply a script of actions and report the outcome
    Run {
        #[command(flatten)]
        map: MapArgs,

        /// Action script, one action per line (`#` starts a comment)
        #[arg(required = true)]
        script: PathBuf,

        /// Skip invalid actions instead of stopping at the first one
        #[arg(long)]
        lenient: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Suppress the final board
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run many random-agent games in parallel and aggregate statistics
    Selfplay {
        #[command(flatten)]
        map: MapArgs,

        /// Number of games to run
        #[arg(short, long, default_value = "100")]
        games: u64,

        /// Day after which an undecided game is a draw
        #[arg(long, default_value = "40")]
        max_days: u32,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },

    /// Print a map, optionally with a shortest path
    Show {
        #[command(flatten)]
        map: MapArgs,

        /// Path start as row,col
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Path end as row,col
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Mobility class for the path
        #[arg(long, default_value = "foot")]
        mobility: cli::Mobility,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("skirmish=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish=info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Play { map, lenient } => cli::play::execute(&map.into(), lenient),

        Commands::Run {
            map,
            script,
            lenient,
            format,
            quiet,
        } => cli::run::execute(&map.into(), &script, lenient, format, quiet),

        Commands::Selfplay {
            map,
            games,
            max_days,
            threads,
            format,
            progress,
        } => cli::selfplay::execute(&map.into(), games, max_days, threads, format, progress),

        Commands::Show {
            map,
            from,
            to,
            mobility,
        } => cli::show::execute(&map.into(), from.zip(to), mobility),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

impl From<MapArgs> for cli::MapSource {
    fn from(args: MapArgs) -> Self {
        Self {
            path: args.map,
            seed: args.seed,
            funds: args.funds,
            commanders: args.commanders,
        }
    }
}
