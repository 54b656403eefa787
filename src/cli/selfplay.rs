//! Selfplay command implementation.

use super::output::{JsonSelfPlayResult, format_selfplay_text};
use super::{CliError, MapSource, OutputFormat};
use indicatif::{ProgressBar, ProgressStyle};
use skirmish::selfplay::{SelfPlayConfig, run_batch_with_progress};
use std::collections::BTreeMap;
use std::time::Instant;

/// Execute the selfplay command.
///
/// # Errors
///
/// Returns an error if the map fails to load.
pub(crate) fn execute(
    source: &MapSource,
    games: u64,
    max_days: u32,
    threads: Option<usize>,
    format: OutputFormat,
    progress: bool,
) -> Result<(), CliError> {
    let seed = source.seed();
    let field = source.load(seed)?;
    let players = field.players().to_vec();

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }

    let config = SelfPlayConfig {
        games,
        max_days,
        seed,
        commanders: BTreeMap::new(),
    };

    let pb = if progress {
        let pb = ProgressBar::new(games);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games ({per_sec})")
                .map_err(|e| CliError::new(format!("Invalid progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let stats = run_batch_with_progress(&field, &config, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    });
    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }
    let duration = start.elapsed();

    match format {
        OutputFormat::Text => {
            println!();
            print!("{}", format_selfplay_text(&stats, &players));
            println!();
            println!("Seed: {seed}  Duration: {:.2}s", duration.as_secs_f64());
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonSelfPlayResult::from_stats(&stats, &players))?;
            println!("{json}");
        }
    }

    Ok(())
}
