//! Play command implementation.

use super::{CliError, MapSource};
use skirmish::{GameSession, SessionConfig, SessionError, parse_action, render_ascii};
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Actions (positions are row,col; other pairs are offsets):
  end                         end the turn
  move r,c dr,dc              move (0,0 waits); combines or loads on arrival
  attack r,c dr,dc tr,tc      move, then attack the target offset
  capture r,c dr,dc           move, then capture
  repair r,c dr,dc tr,tc      move, then repair the target offset
  build r,c CODE              build a unit on an owned property
  unload r,c dr,dc tr,tc idx  move, then drop cargo slot idx
  cop | scop                  activate a commander power
Other commands: show, help, quit";

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the map fails to load or stdin cannot be read.
pub(crate) fn execute(source: &MapSource, lenient: bool) -> Result<(), CliError> {
    let seed = source.seed();
    let field = source.load(seed)?;
    let config = SessionConfig {
        strict: !lenient,
        record_history: false,
    };
    let mut session = GameSession::new(field, config);

    println!("Seed {seed}. Type `help` for the action notation.");
    print!("{}", render_ascii(session.battlefield()));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{}> ", session.battlefield().current_player());
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;

        match line.trim() {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("{HELP}");
                continue;
            }
            "show" => {
                print!("{}", render_ascii(session.battlefield()));
                continue;
            }
            _ => {}
        }

        let mut action = match parse_action(&line) {
            Ok(action) => action,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match session.execute_action(&mut action) {
            Ok(winner) => {
                if let Some(reason) = action.invalid_reason() {
                    println!("Invalid: {reason}");
                    continue;
                }
                println!("{action}");
                print!("{}", render_ascii(session.battlefield()));
                if let Some(winner) = winner {
                    println!("Player {winner} wins on day {}", session.battlefield().day());
                    break;
                }
            }
            Err(SessionError::InvalidAction { reason, .. }) => println!("Invalid: {reason}"),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
