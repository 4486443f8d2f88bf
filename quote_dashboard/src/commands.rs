//! Interactive commands read from stdin.
//!
//! Plain text is treated as typing into the search box. A line starting with
//! `:` is a command:
//!
//! - `:go` (or an empty line) — search for the current input
//! - `:pick N` — choose the N-th suggestion (1-based)
//! - `:state` — print the current snapshot
//! - `:quit` — exit
use std::io::BufRead;
use std::thread;

use crossbeam_channel::Sender;
use log::{debug, error, warn};
use quote_common::{QuoteError, Result};

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// New search box content.
    Input(String),
    /// Search for the current input.
    Submit,
    /// Choose a suggestion by 1-based position.
    Pick(usize),
    /// Print the snapshot.
    Show,
    /// Leave the dashboard.
    Quit,
}

/// Parse one stdin line.
pub fn parse_command(line: &str) -> Result<UserCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix(':') else {
        if line.trim().is_empty() {
            return Ok(UserCommand::Submit);
        }
        return Ok(UserCommand::Input(line.trim().to_string()));
    };

    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("go"), None) => Ok(UserCommand::Submit),
        (Some("state"), None) => Ok(UserCommand::Show),
        (Some("quit") | Some("q"), None) => Ok(UserCommand::Quit),
        (Some("pick"), Some(n)) => match n.parse::<usize>() {
            Ok(index) if index >= 1 => Ok(UserCommand::Pick(index)),
            _ => Err(QuoteError::InvalidInput(format!("bad suggestion number {:?}", n))),
        },
        _ => Err(QuoteError::InvalidInput(format!("unknown command {:?}", line))),
    }
}

/// Spawn a thread feeding parsed stdin lines into `tx` until EOF.
///
/// Dropping the sender on EOF tells the event loop input is finished.
pub fn spawn_stdin_reader<R>(reader: R, tx: Sender<UserCommand>)
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            };
            match parse_command(&line) {
                Ok(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            }
        }
        debug!("Stdin reader stopping...");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::io::Cursor;

    #[test]
    fn plain_text_is_input() {
        assert_eq!(parse_command("appl\n").unwrap(), UserCommand::Input("appl".into()));
        assert_eq!(parse_command("AAPL, MSFT").unwrap(), UserCommand::Input("AAPL, MSFT".into()));
    }

    #[test]
    fn blank_line_submits() {
        assert_eq!(parse_command("").unwrap(), UserCommand::Submit);
        assert_eq!(parse_command(":go").unwrap(), UserCommand::Submit);
    }

    #[test]
    fn pick_requires_positive_number() {
        assert_eq!(parse_command(":pick 2").unwrap(), UserCommand::Pick(2));
        assert!(parse_command(":pick 0").is_err());
        assert!(parse_command(":pick x").is_err());
        assert!(parse_command(":dance").is_err());
    }

    #[test]
    fn reader_skips_bad_lines_and_closes_on_eof() {
        let (tx, rx) = unbounded();
        spawn_stdin_reader(Cursor::new("msft\n:bogus\n:quit\n"), tx);
        let received: Vec<UserCommand> = rx.iter().collect();
        assert_eq!(received, vec![UserCommand::Input("msft".into()), UserCommand::Quit]);
    }
}
