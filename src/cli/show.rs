//! Show command implementation.

use super::{CliError, MapSource, Mobility, parse_coord};
use skirmish::render_ascii;

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the map fails to load or a path endpoint is malformed.
pub(crate) fn execute(
    source: &MapSource,
    path: Option<(String, String)>,
    mobility: Mobility,
) -> Result<(), CliError> {
    let field = source.load(source.seed())?;
    print!("{}", render_ascii(&field));

    if let Some((from, to)) = path {
        let (from, to) = (parse_coord(&from)?, parse_coord(&to)?);
        match field.shortest_path(from, to, mobility.into()) {
            Some(steps) => {
                let steps: Vec<String> = steps.iter().map(ToString::to_string).collect();
                println!("\nPath ({} tiles): {}", steps.len(), steps.join(" -> "));
            }
            None => println!("\nNo path from {from} to {to} for {mobility:?}"),
        }
    }

    Ok(())
}
