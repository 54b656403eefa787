//! Run command implementation.

use super::output::{JsonRunResult, format_run_text};
use super::{CliError, MapSource, OutputFormat};
use skirmish::{GameSession, SessionConfig, parse_action, render_ascii};
use std::fs;
use std::path::Path;

/// Execute the run command.
///
/// # Errors
///
/// Returns an error if the map or script fails to load, a line of the script
/// is not valid notation, or (unless lenient) an action is invalid.
pub(crate) fn execute(
    source: &MapSource,
    script: &Path,
    lenient: bool,
    format: OutputFormat,
    quiet: bool,
) -> Result<(), CliError> {
    let text = fs::read_to_string(script)
        .map_err(|e| CliError::new(format!("Failed to read {}: {e}", script.display())))?;

    let seed = source.seed();
    let field = source.load(seed)?;
    let config = SessionConfig {
        strict: !lenient,
        record_history: false,
    };
    let mut session = GameSession::new(field, config);

    for (number, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let mut action = parse_action(line)
            .map_err(|e| CliError::new(format!("line {}: {e}", number + 1)))?;
        let winner = session
            .execute_action(&mut action)
            .map_err(|e| CliError::new(format!("line {}: {e}", number + 1)))?;
        if winner.is_some() {
            break;
        }
    }

    match format {
        OutputFormat::Text => {
            println!("Seed {seed}");
            if !quiet {
                print!("{}", render_ascii(session.battlefield()));
                println!();
            }
            print!("{}", format_run_text(&session));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&JsonRunResult::from_session(&session))?;
            println!("{json}");
        }
    }

    Ok(())
}
